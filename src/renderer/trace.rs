//! JSON-lines trace of every frame

use std::io::{self, Write};

use super::Renderer;
use crate::sim::Snapshot;

/// Writes each snapshot as one line of JSON
pub struct TraceRenderer<W: Write> {
    out: W,
    frames: u64,
}

impl<W: Write> TraceRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TraceRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        self.frames += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
