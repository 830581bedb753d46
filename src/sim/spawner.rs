//! Item placement
//!
//! Food and Bonus items are dropped on a uniformly random free cell. Sampling
//! is bounded: after a fixed number of misses the spawner scans every anchor
//! and picks among the free ones, and reports `PlacementError::Exhausted` when
//! nothing is free instead of spinning forever.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::adversary::AdversarySnake;
use super::grid::{GridWorld, Position};
use super::obstacles::ObstacleField;
use super::snake::PlayerSnake;
use crate::consts::*;

/// Anything the placement routine can drop into the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placeable {
    Food,
    Bonus,
    Obstacle,
    Adversary,
}

impl fmt::Display for Placeable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Food => write!(f, "food"),
            Self::Bonus => write!(f, "bonus"),
            Self::Obstacle => write!(f, "obstacle"),
            Self::Adversary => write!(f, "adversary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("no free cell left for {what} after {attempts} random samples and a full scan")]
    Exhausted { what: Placeable, attempts: u32 },
}

/// Short-lived bonus item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub position: Position,
    pub spawned_at: u64,
    pub lifetime_ms: u64,
}

impl Bonus {
    pub fn new(position: Position, spawned_at: u64) -> Self {
        Self {
            position,
            spawned_at,
            lifetime_ms: BONUS_LIFETIME_MS,
        }
    }

    /// Expired once `now - spawned_at >= lifetime`
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.spawned_at) >= self.lifetime_ms
    }

    pub fn remaining_ms(&self, now: u64) -> u64 {
        self.lifetime_ms
            .saturating_sub(now.saturating_sub(self.spawned_at))
    }
}

/// Cells taken for placement purposes
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    pub player: &'a PlayerSnake,
    pub obstacles: &'a ObstacleField,
    pub adversary: &'a AdversarySnake,
}

impl Occupancy<'_> {
    /// A cell is free when no snake segment sits on it and no obstacle box
    /// overlaps it
    pub fn is_free(&self, grid: &GridWorld, pos: Position) -> bool {
        !self.player.occupies(pos)
            && !self.adversary.occupies(pos)
            && !self.obstacles.blocks(&grid.cell_rect(pos))
    }
}

/// Drops items on free cells of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpawner {
    grid: GridWorld,
}

impl ItemSpawner {
    pub fn new(grid: GridWorld) -> Self {
        Self { grid }
    }

    /// Pick a random cell-aligned position that is free in `occupancy`
    pub fn place<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        occupancy: &Occupancy<'_>,
        what: Placeable,
    ) -> Result<Position, PlacementError> {
        let grid = self.grid;
        sample_anchor(rng, &grid, grid.cell, what, |pos| {
            occupancy.is_free(&grid, pos)
        })
    }
}

/// Bounded rejection sampling over anchors aligned to `granularity`
pub(crate) fn sample_anchor<R, F>(
    rng: &mut R,
    grid: &GridWorld,
    granularity: i32,
    what: Placeable,
    is_free: F,
) -> Result<Position, PlacementError>
where
    R: Rng + ?Sized,
    F: Fn(Position) -> bool,
{
    let attempts = grid.anchor_count(granularity) as u32 * PLACEMENT_ATTEMPTS_PER_CELL;
    for _ in 0..attempts {
        let candidate = grid.random_anchor(rng, granularity);
        if is_free(candidate) {
            return Ok(candidate);
        }
    }

    log::warn!(
        "{} placement missed {} random samples, scanning all anchors",
        what,
        attempts
    );
    let free: Vec<Position> = grid.anchors(granularity).filter(|&p| is_free(p)).collect();
    if free.is_empty() {
        return Err(PlacementError::Exhausted { what, attempts });
    }
    Ok(free[rng.random_range(0..free.len())])
}
