//! Platform abstraction layer
//!
//! Handles terminal/test differences for:
//! - Wall-clock time and pacing
//! - Input events

pub mod input;
pub mod time;

use std::io;

use crate::sim::Command;

pub use input::{ScriptedInput, TerminalInput, map_key};
pub use time::{ManualClock, SystemClock};

/// Monotonic wall clock plus the pacing delay between ticks
pub trait WallClock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
    fn sleep_ms(&mut self, ms: u64);
}

/// Source of discrete input commands
pub trait InputSource {
    /// Drain everything buffered since the last call, in arrival order
    fn poll(&mut self) -> io::Result<Vec<Command>>;
}
