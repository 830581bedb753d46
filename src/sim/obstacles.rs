//! Static obstacles (stones)
//!
//! Obstacles live on a coarser grid than snake cells. The set never changes
//! between regenerations; a regeneration replaces it wholesale.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{GridWorld, Position, Rect};
use super::snake::PlayerSnake;
use super::spawner::{Placeable, PlacementError, sample_anchor};
use crate::consts::*;

/// One square obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub anchor: Position,
    pub size: i32,
}

impl Obstacle {
    pub fn new(anchor: Position) -> Self {
        Self {
            anchor,
            size: OBSTACLE_SIZE,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.anchor, self.size)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// True when `rect` overlaps any obstacle (strict, edge contact is fine)
    pub fn blocks(&self, rect: &Rect) -> bool {
        self.obstacles.iter().any(|o| o.rect().overlaps(rect))
    }

    /// Replace the whole set with `count` fresh obstacles. Candidates covering a
    /// player segment or an already placed obstacle are rejected. On error the
    /// current set is left untouched.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        grid: &GridWorld,
        count: usize,
        player: &PlayerSnake,
    ) -> Result<(), PlacementError> {
        let mut placed: Vec<Obstacle> = Vec::with_capacity(count);
        for _ in 0..count {
            let anchor = sample_anchor(rng, grid, OBSTACLE_SIZE, Placeable::Obstacle, |candidate| {
                let rect = Obstacle::new(candidate).rect();
                !player.segments().any(|s| grid.cell_rect(s).overlaps(&rect))
                    && !placed.iter().any(|o| o.rect().overlaps(&rect))
            })?;
            placed.push(Obstacle::new(anchor));
        }

        log::info!(
            "Obstacles regenerated: {:?}",
            placed.iter().map(|o| (o.anchor.x, o.anchor.y)).collect::<Vec<_>>()
        );
        self.obstacles = placed;
        Ok(())
    }
}

/// Snake-sized cells covered by an obstacle
pub fn obstacle_cells(obstacle: &Obstacle, cell: i32) -> impl Iterator<Item = Position> {
    let per_side = (obstacle.size / cell).max(1);
    let anchor = obstacle.anchor;
    (0..per_side).flat_map(move |dy| {
        (0..per_side).map(move |dx| anchor + IVec2::new(dx * cell, dy * cell))
    })
}
