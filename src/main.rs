//! Snake Arena entry point
//!
//! Loads settings, sets up logging and the terminal, then runs the game loop.

use std::fs::File;
use std::io::{self, BufWriter};
use std::time::{SystemTime, UNIX_EPOCH};

use snake_arena::platform::{SystemClock, TerminalInput};
use snake_arena::renderer::{Fanout, TerminalGuard, TerminalRenderer, TraceRenderer};
use snake_arena::sim::Session;
use snake_arena::{RunError, Settings, run};

fn init_logging(settings: &Settings) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // The terminal renderer owns the screen, so logs go to a file when possible
    if let Some(path) = &settings.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(err) => eprintln!("cannot open log file {}: {}", path.display(), err),
        }
    }
    builder.init();
}

fn seed_from_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<(), RunError> {
    let (settings, source) = Settings::load(&Settings::default_path());

    init_logging(&settings);
    log::info!("Snake Arena starting...");
    source.log();

    let seed = settings.seed.unwrap_or_else(seed_from_time);
    let mut session = Session::new(seed)?;

    let mut renderer = Fanout::new();
    if let Some(trace_path) = &settings.trace_file {
        let file = File::create(trace_path)?;
        renderer.push(Box::new(TraceRenderer::new(BufWriter::new(file))));
        log::info!("Tracing frames to {}", trace_path.display());
    }

    let summary = {
        let _guard = TerminalGuard::enter()?;
        renderer.push(Box::new(TerminalRenderer::new(BufWriter::new(io::stdout()))));
        run(
            &mut session,
            &mut SystemClock::new(),
            &mut TerminalInput::new(),
            &mut renderer,
            settings.max_ticks,
        )
    };

    match &summary {
        Ok(summary) => {
            log::info!(
                "Run finished after {} ticks: score {}, {}, {:?}",
                summary.ticks,
                summary.score,
                summary.level,
                summary.phase
            );
            println!("Final score: {} ({}, seed {})", summary.score, summary.level, seed);
        }
        Err(err) => log::error!("Run aborted: {}", err),
    }
    summary.map(|_| ())
}
