//! Outer game loop
//!
//! Poll input, tick the session, hand a snapshot to the renderer, then sleep
//! for the current speed. The snake's speed curve therefore sets the real tick
//! rate.

use std::io;

use thiserror::Error;

use crate::platform::{InputSource, WallClock};
use crate::renderer::Renderer;
use crate::sim::{CollisionKind, GamePhase, Level, LoopControl, PlacementError, Session, tick};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    TickLimit,
}

/// Outcome of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub score: u32,
    pub level: Level,
    pub phase: GamePhase,
    pub game_over_cause: Option<CollisionKind>,
    pub stopped_by: StopReason,
}

impl RunSummary {
    fn of(session: &Session, stopped_by: StopReason) -> Self {
        Self {
            ticks: session.ticks,
            score: session.progression.score(),
            level: session.progression.level(),
            phase: session.phase,
            game_over_cause: session.game_over_cause,
            stopped_by,
        }
    }
}

/// Drive `session` until Quit, or until `max_ticks` iterations have run.
/// The renderer is flushed before returning so write errors surface here.
pub fn run<C, I, R>(
    session: &mut Session,
    clock: &mut C,
    input: &mut I,
    renderer: &mut R,
    max_ticks: Option<u64>,
) -> Result<RunSummary, RunError>
where
    C: WallClock + ?Sized,
    I: InputSource + ?Sized,
    R: Renderer + ?Sized,
{
    renderer.render(&session.snapshot())?;

    let stopped_by = loop {
        if max_ticks.is_some_and(|limit| session.ticks >= limit) {
            log::info!("Tick limit reached after {} ticks", session.ticks);
            break StopReason::TickLimit;
        }

        let commands = input.poll()?;
        if tick(session, &commands, clock.now_ms())? == LoopControl::Quit {
            break StopReason::Quit;
        }

        renderer.render(&session.snapshot())?;
        clock.sleep_ms(session.speed_ms());
    };

    renderer.flush()?;
    Ok(RunSummary::of(session, stopped_by))
}
