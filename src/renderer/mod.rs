//! Rendering module
//!
//! Renderers only read [`Snapshot`]s; nothing here can touch the simulation.

pub mod terminal;
pub mod trace;

use std::io;

use crate::sim::Snapshot;

pub use terminal::{TerminalGuard, TerminalRenderer};
pub use trace::TraceRenderer;

/// Sink for one frame per tick
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()>;

    /// Push out anything still buffered; called once when the loop stops
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        (**self).render(snapshot)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Sends every frame to several renderers in order
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn Renderer>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn Renderer>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Renderer for Fanout {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.render(snapshot)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}
