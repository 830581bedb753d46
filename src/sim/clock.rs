//! Game clock
//!
//! Converts wall-clock milliseconds into simulation time. Simulation time only
//! advances while the session is running, so pausing freezes every timer
//! (bonus lifetime, dwell timers, adversary interval) without touching them.

use serde::{Deserialize, Serialize};

/// Monotonic millisecond clock driven by wall-clock samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    now_ms: u64,
    last_wall_ms: Option<u64>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time (ms)
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Feed a wall-clock sample. The elapsed wall time since the previous
    /// sample is added only when `running`. Returns the new simulation time.
    pub fn sync(&mut self, wall_ms: u64, running: bool) -> u64 {
        if let Some(last) = self.last_wall_ms {
            if running {
                self.now_ms += wall_ms.saturating_sub(last);
            }
        }
        self.last_wall_ms = Some(wall_ms);
        self.now_ms
    }
}
