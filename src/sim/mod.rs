//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as millisecond samples, never read from the system
//! - Seeded RNG only
//! - Stable iteration order (snake bodies head first, anchors row-major)
//! - No rendering or platform dependencies

pub mod adversary;
pub mod clock;
pub mod collision;
pub mod grid;
pub mod obstacles;
pub mod progression;
pub mod snake;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use adversary::{AdversarySnake, AdversaryStep};
pub use clock::GameClock;
pub use collision::{CollisionKind, detect_fatal};
pub use grid::{Direction, GridWorld, Position, Rect};
pub use obstacles::{Obstacle, ObstacleField};
pub use progression::{Level, Progression, speed_for_length};
pub use snake::PlayerSnake;
pub use snapshot::{BonusView, Snapshot};
pub use spawner::{Bonus, ItemSpawner, Placeable, PlacementError};
pub use state::{GamePhase, PhaseEvent, Session, transition};
pub use tick::{Command, LoopControl, tick};
