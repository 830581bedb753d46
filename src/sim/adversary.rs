//! Adversary snake
//!
//! A second snake that wanders the arena on its own timer. Unlike the player it
//! wraps around the arena edges, and obstacles stall it instead of killing it.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, GridWorld, Position};
use super::obstacles::ObstacleField;
use super::snake::PlayerSnake;
use super::spawner::{Placeable, PlacementError, sample_anchor};
use crate::consts::*;

/// Outcome of one adversary update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdversaryStep {
    /// Move interval not yet elapsed
    Waiting,
    /// Next head overlapped an obstacle; nothing changed, retry next tick
    Stalled,
    Moved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversarySnake {
    body: VecDeque<Position>,
    heading: Direction,
    last_move_ms: u64,
    move_interval_ms: u64,
    active: bool,
}

impl AdversarySnake {
    /// Lay out a fresh, inactive adversary horizontally from a random anchor,
    /// keeping clear of the player
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        grid: &GridWorld,
        player: &PlayerSnake,
        now: u64,
    ) -> Result<Self, PlacementError> {
        let anchor = sample_anchor(rng, grid, grid.cell, Placeable::Adversary, |anchor| {
            body_layout(grid, anchor).all(|segment| !player.occupies(segment))
        })?;
        let heading = Direction::random(rng);

        let mut segments = body_layout(grid, anchor);
        let head = segments.next().unwrap_or(anchor);
        Ok(Self::from_segments(head, segments, heading, now))
    }

    /// Adversary with an explicit body, head first
    pub fn from_segments(
        head: Position,
        tail: impl IntoIterator<Item = Position>,
        heading: Direction,
        last_move_ms: u64,
    ) -> Self {
        let mut body = VecDeque::from([head]);
        body.extend(tail);
        Self {
            body,
            heading,
            last_move_ms,
            move_interval_ms: ADVERSARY_MOVE_INTERVAL_MS,
            active: false,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn last_move_ms(&self) -> u64 {
        self.last_move_ms
    }

    pub fn move_interval_ms(&self) -> u64 {
        self.move_interval_ms
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Advance once the move interval has strictly elapsed. Each eligible tick
    /// re-rolls the heading with the configured chance; a blocked move leaves the
    /// body and `last_move_ms` untouched so the next tick tries again.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        grid: &GridWorld,
        obstacles: &ObstacleField,
        now: u64,
    ) -> AdversaryStep {
        if now.saturating_sub(self.last_move_ms) <= self.move_interval_ms {
            return AdversaryStep::Waiting;
        }

        let (numerator, denominator) = ADVERSARY_TURN_CHANCE;
        if rng.random_ratio(numerator, denominator) {
            self.heading = Direction::random(rng);
        }

        let next = grid.wrap(grid.step(self.head(), self.heading));
        if obstacles.blocks(&grid.cell_rect(next)) {
            log::debug!(
                "Adversary stalled at ({}, {}) heading {:?}",
                next.x,
                next.y,
                self.heading
            );
            return AdversaryStep::Stalled;
        }

        self.body.push_front(next);
        self.body.pop_back();
        self.last_move_ms = now;
        AdversaryStep::Moved
    }
}

/// Horizontal run of segments starting at `anchor`, wrapped into the arena
fn body_layout(grid: &GridWorld, anchor: Position) -> impl Iterator<Item = Position> + '_ {
    (0..ADVERSARY_LENGTH).map(move |i| grid.wrap(anchor + IVec2::new(i * grid.cell, 0)))
}
