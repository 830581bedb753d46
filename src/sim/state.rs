//! Game lifecycle and session state
//!
//! Everything one session owns lives in [`Session`]; the lifecycle itself is a
//! tagged enum driven by the pure [`transition`] function.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::adversary::AdversarySnake;
use super::clock::GameClock;
use super::collision::CollisionKind;
use super::grid::{Direction, GridWorld, Position};
use super::obstacles::ObstacleField;
use super::progression::{Progression, speed_for_length};
use super::snake::PlayerSnake;
use super::spawner::{Bonus, ItemSpawner, Occupancy, Placeable, PlacementError};
use crate::consts::*;

/// Current phase of the session. Timed phases carry their start time (game ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, waiting for Start
    Menu,
    Playing,
    Paused,
    /// Run ended (terminal)
    GameOver,
    /// Level-up banner
    LevelUp { started_at: u64 },
    /// "Resuming in" countdown before play continues
    Countdown { started_at: u64 },
}

impl GamePhase {
    /// Phases in which game time advances
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            GamePhase::Playing | GamePhase::LevelUp { .. } | GamePhase::Countdown { .. }
        )
    }

    /// Time left in a timed phase
    pub fn remaining_ms(&self, now: u64) -> Option<u64> {
        let (started_at, dwell) = match *self {
            GamePhase::LevelUp { started_at } => (started_at, LEVEL_UP_DWELL_MS),
            GamePhase::Countdown { started_at } => (started_at, COUNTDOWN_DWELL_MS),
            _ => return None,
        };
        Some(dwell.saturating_sub(now.saturating_sub(started_at)))
    }
}

/// Inputs to the lifecycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    TogglePause,
    FatalCollision,
    LevelReached,
    /// Time passed; lets timed phases expire
    Clock,
}

/// Lifecycle transition. Pairs that have no rule leave the phase unchanged.
pub fn transition(phase: GamePhase, now: u64, event: PhaseEvent) -> GamePhase {
    match (phase, event) {
        (GamePhase::Menu, PhaseEvent::Start) => GamePhase::Playing,
        (GamePhase::Playing, PhaseEvent::TogglePause) => GamePhase::Paused,
        (GamePhase::Paused, PhaseEvent::TogglePause) => GamePhase::Playing,
        (GamePhase::Playing, PhaseEvent::FatalCollision) => GamePhase::GameOver,
        (GamePhase::Playing, PhaseEvent::LevelReached) => GamePhase::LevelUp { started_at: now },
        (GamePhase::LevelUp { started_at }, PhaseEvent::Clock)
            if now.saturating_sub(started_at) >= LEVEL_UP_DWELL_MS =>
        {
            GamePhase::Countdown { started_at: now }
        }
        (GamePhase::Countdown { started_at }, PhaseEvent::Clock)
            if now.saturating_sub(started_at) >= COUNTDOWN_DWELL_MS =>
        {
            GamePhase::Playing
        }
        (phase, _) => phase,
    }
}

/// One game session: every entity plus the seeded RNG and game clock
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub grid: GridWorld,
    pub spawner: ItemSpawner,
    pub player: PlayerSnake,
    /// Heading to use on the next advance (already reversal-filtered)
    pub pending_heading: Direction,
    pub adversary: AdversarySnake,
    pub obstacles: ObstacleField,
    pub food: Position,
    pub bonus: Option<Bonus>,
    pub progression: Progression,
    /// Set once on Playing -> GameOver
    pub game_over_cause: Option<CollisionKind>,
    /// Loop iterations seen
    pub ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) clock: GameClock,
}

impl Session {
    /// Fresh session in the Menu: centred snake heading right, food on the
    /// board, a dormant adversary and no obstacles yet
    pub fn new(seed: u64) -> Result<Self, PlacementError> {
        let grid = GridWorld::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = PlayerSnake::new(grid.center(), Direction::Right);
        let adversary = AdversarySnake::spawn(&mut rng, &grid, &player, 0)?;
        let obstacles = ObstacleField::default();
        let spawner = ItemSpawner::new(grid);
        let food = spawner.place(
            &mut rng,
            &Occupancy {
                player: &player,
                obstacles: &obstacles,
                adversary: &adversary,
            },
            Placeable::Food,
        )?;

        log::info!("Session started with seed {}", seed);
        log::debug!("Initial food at ({}, {})", food.x, food.y);

        Ok(Self {
            seed,
            phase: GamePhase::Menu,
            grid,
            spawner,
            pending_heading: player.heading(),
            player,
            adversary,
            obstacles,
            food,
            bonus: None,
            progression: Progression::new(),
            game_over_cause: None,
            ticks: 0,
            rng,
            clock: GameClock::new(),
        })
    }

    /// Current game time (ms)
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Tick pacing for the current snake length
    pub fn speed_ms(&self) -> u64 {
        speed_for_length(self.player.len())
    }

    /// Drop an item on a cell free of both snakes and every obstacle
    pub(crate) fn place_item(&mut self, what: Placeable) -> Result<Position, PlacementError> {
        let occupancy = Occupancy {
            player: &self.player,
            obstacles: &self.obstacles,
            adversary: &self.adversary,
        };
        self.spawner.place(&mut self.rng, &occupancy, what)
    }
}
