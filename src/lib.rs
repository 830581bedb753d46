//! Snake Arena - a grid arena snake game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, placement, progression, lifecycle)
//! - `renderer`: Read-only snapshot sinks (terminal, JSON trace)
//! - `platform`: Wall clock and input sources
//! - `runner`: The outer tick loop tying the three together
//! - `settings`: Runner preferences

pub mod platform;
pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;

pub use runner::{RunError, RunSummary, StopReason, run};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: i32 = 800;
    pub const ARENA_HEIGHT: i32 = 600;
    /// Snake cell edge; every snake and item position is a multiple of this
    pub const CELL_SIZE: i32 = 25;

    /// Obstacles sit on a coarser grid than snake cells
    pub const OBSTACLE_SIZE: i32 = 50;
    pub const OBSTACLE_COUNT: usize = 3;

    /// Tick pacing (ms). Smaller is faster.
    pub const INITIAL_SPEED_MS: u64 = 130;
    /// Fastest pacing the speed curve may reach
    pub const MAX_SPEED_MS: u64 = 50;
    /// Pacing gained per extra body segment
    pub const SPEED_STEP_MS: u64 = 5;

    /// Scoring
    pub const FOOD_POINTS: u32 = 1;
    pub const BONUS_POINTS: u32 = 3;

    /// Bonus item rules
    pub const BONUS_LIFETIME_MS: u64 = 5000;
    pub const BONUS_MIN_SCORE: u32 = 5;
    pub const BONUS_POINTS_GAP: u32 = 3;

    /// Level thresholds
    pub const LEVEL_TWO_SCORE: u32 = 8;
    pub const LEVEL_THREE_SCORE: u32 = 15;

    /// Timed sub-state dwell (ms)
    pub const LEVEL_UP_DWELL_MS: u64 = 3000;
    pub const COUNTDOWN_DWELL_MS: u64 = 3000;

    /// Adversary snake
    pub const ADVERSARY_LENGTH: i32 = 3;
    pub const ADVERSARY_MOVE_INTERVAL_MS: u64 = 500;
    /// Chance (numerator, denominator) of re-rolling heading on an eligible tick
    pub const ADVERSARY_TURN_CHANCE: (u32, u32) = (1, 4);

    /// Random samples per candidate anchor before falling back to a full scan
    pub const PLACEMENT_ATTEMPTS_PER_CELL: u32 = 4;
}
