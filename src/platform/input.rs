//! Input sources
//!
//! Terminal key events are mapped to [`Command`]s; a scripted source replays a
//! fixed list of per-tick batches for tests and demos.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::InputSource;
use crate::sim::{Command, Direction};

/// Key binding: arrows/WASD steer, P pauses, Enter starts, Q/Esc/Ctrl-C quit.
/// Only key presses count; repeats and releases are ignored.
pub fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Command::Move(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Command::Move(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Command::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Command::Move(Direction::Right))
        }
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::TogglePause),
        KeyCode::Enter => Some(Command::Start),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Reads crossterm events without blocking
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> io::Result<Vec<Command>> {
        let mut commands = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = map_key(&key) {
                    commands.push(command);
                }
            }
        }
        Ok(commands)
    }
}

/// Replays one batch per poll, then yields nothing
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    batches: VecDeque<Vec<Command>>,
}

impl ScriptedInput {
    pub fn new(batches: impl IntoIterator<Item = Vec<Command>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> io::Result<Vec<Command>> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
