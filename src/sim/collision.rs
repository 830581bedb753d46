//! Collision detection
//!
//! Pure checks of the player's head against the arena, its own body, the
//! obstacle field and the adversary. Item pickup is a separate, non-fatal
//! exact-position test.

use serde::{Deserialize, Serialize};

use super::adversary::AdversarySnake;
use super::grid::{GridWorld, Position};
use super::obstacles::ObstacleField;
use super::snake::PlayerSnake;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    /// Head left the arena
    Boundary,
    /// Head ran into the player's own body
    OwnBody,
    Obstacle,
    Adversary,
}

pub fn hits_boundary(head: Position, grid: &GridWorld) -> bool {
    !grid.contains(head)
}

pub fn hits_self(snake: &PlayerSnake) -> bool {
    snake.hits_itself()
}

/// Head cell box overlaps an obstacle box (strict on all four edges)
pub fn hits_obstacle(head: Position, grid: &GridWorld, obstacles: &ObstacleField) -> bool {
    obstacles.blocks(&grid.cell_rect(head))
}

pub fn hits_adversary(head: Position, adversary: &AdversarySnake) -> bool {
    adversary.occupies(head)
}

/// Item pickup: exact position match
pub fn eats(head: Position, item: Position) -> bool {
    head == item
}

/// Run the fatal checks in order: boundary, self, obstacle, adversary.
/// `adversary` is `None` while the adversary is inactive.
pub fn detect_fatal(
    snake: &PlayerSnake,
    grid: &GridWorld,
    obstacles: &ObstacleField,
    adversary: Option<&AdversarySnake>,
) -> Option<CollisionKind> {
    let head = snake.head();
    if hits_boundary(head, grid) {
        Some(CollisionKind::Boundary)
    } else if hits_self(snake) {
        Some(CollisionKind::OwnBody)
    } else if hits_obstacle(head, grid, obstacles) {
        Some(CollisionKind::Obstacle)
    } else if adversary.is_some_and(|a| hits_adversary(head, a)) {
        Some(CollisionKind::Adversary)
    } else {
        None
    }
}
