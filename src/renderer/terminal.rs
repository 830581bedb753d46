//! Terminal renderer
//!
//! Draws the arena as a character grid with crossterm. Each snake cell is two
//! columns wide so the board keeps roughly square proportions. Layout:
//! row 0 is the HUD, the arena sits inside a box border starting on row 1,
//! and the controls hint goes on the last row.

use std::io::{self, Write};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};

use super::Renderer;
use crate::sim::obstacles::{Obstacle, obstacle_cells};
use crate::sim::{GamePhase, Position, Snapshot};

// Colour palette

const C_BORDER: Color = Color::DarkGreen;
const C_HUD: Color = Color::Yellow;
const C_HUD_BONUS: Color = Color::Magenta;
const C_SNAKE_HEAD: Color = Color::Green;
const C_SNAKE_BODY: Color = Color::DarkGreen;
const C_ADVERSARY: Color = Color::DarkYellow;
const C_STONE: Color = Color::Grey;
const C_FOOD: Color = Color::Red;
const C_BONUS: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_BANNER: Color = Color::Cyan;

/// Terminal columns per arena cell
const CELL_COLUMNS: u16 = 2;
/// First terminal row inside the border
const ARENA_TOP: u16 = 2;
const ARENA_LEFT: u16 = 1;

/// Raw mode + alternate screen for the lifetime of the guard
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        draw_frame(&mut self.out, snapshot)
    }
}

/// Board size in terminal cells (columns, rows), border included
fn board_size(snapshot: &Snapshot) -> (u16, u16) {
    let columns = snapshot.grid.columns(snapshot.grid.cell) as u16;
    let rows = snapshot.grid.rows(snapshot.grid.cell) as u16;
    (columns * CELL_COLUMNS + 2, rows + 2)
}

/// Terminal position of an arena cell, or None when it lies off the board
fn screen_pos(snapshot: &Snapshot, pos: Position) -> Option<(u16, u16)> {
    if !snapshot.grid.contains(pos) {
        return None;
    }
    let cell = snapshot.grid.cell;
    let column = (pos.x / cell) as u16;
    let row = (pos.y / cell) as u16;
    Some((ARENA_LEFT + column * CELL_COLUMNS, ARENA_TOP + row))
}

fn draw_frame<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, snapshot)?;
    draw_hud(out, snapshot)?;

    match snapshot.phase {
        GamePhase::Menu => draw_overlay(
            out,
            snapshot,
            &[
                ("S N A K E   A R E N A", C_BANNER),
                ("Press Enter to Start", Color::White),
            ],
        )?,
        GamePhase::LevelUp { .. } => {
            let title = format!("Well done! You reached {}", snapshot.level);
            let banner = snapshot.banner().unwrap_or_default();
            draw_overlay(out, snapshot, &[(title.as_str(), C_BANNER), (banner, Color::White)])?;
        }
        _ => {
            draw_world(out, snapshot)?;
            draw_phase_overlay(out, snapshot)?;
        }
    }

    draw_controls_hint(out, snapshot)?;

    out.queue(style::ResetColor)?;
    let (_, rows) = board_size(snapshot);
    out.queue(cursor::MoveTo(0, rows + 2))?;
    out.flush()
}

fn draw_border<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    let (width, height) = board_size(snapshot);
    let inner = width.saturating_sub(2) as usize;
    let bottom = 1 + height.saturating_sub(1);

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;
    for row in ARENA_TOP..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Score:{:>4}  {}  Speed:{:>4}ms",
        snapshot.score, snapshot.level, snapshot.speed_ms
    )))?;

    if let Some(bonus) = snapshot.bonus {
        let text = format!("Bonus disappears in: {}s", bonus.remaining_ms / 1000);
        let (width, _) = board_size(snapshot);
        let column = width.saturating_sub(text.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(column, 0))?;
        out.queue(style::SetForegroundColor(C_HUD_BONUS))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

fn draw_cell<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    pos: Position,
    glyph: &str,
    color: Color,
) -> io::Result<()> {
    if let Some((column, row)) = screen_pos(snapshot, pos) {
        out.queue(cursor::MoveTo(column, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_world<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    let cell = snapshot.grid.cell;
    for rect in &snapshot.obstacles {
        let stone = Obstacle {
            anchor: rect.origin,
            size: rect.size.x,
        };
        for pos in obstacle_cells(&stone, cell) {
            draw_cell(out, snapshot, pos, "▓▓", C_STONE)?;
        }
    }

    draw_cell(out, snapshot, snapshot.food, "()", C_FOOD)?;
    if let Some(bonus) = snapshot.bonus {
        draw_cell(out, snapshot, bonus.position, "<>", C_BONUS)?;
    }

    if let Some(adversary) = &snapshot.adversary {
        for (i, &pos) in adversary.iter().enumerate() {
            let glyph = if i == 0 { "@@" } else { "%%" };
            draw_cell(out, snapshot, pos, glyph, C_ADVERSARY)?;
        }
    }

    // Body first so the head is always visible on top
    for &pos in snapshot.snake.iter().skip(1) {
        draw_cell(out, snapshot, pos, "██", C_SNAKE_BODY)?;
    }
    if let Some(&head) = snapshot.snake.first() {
        draw_cell(out, snapshot, head, "▒▒", C_SNAKE_HEAD)?;
    }
    Ok(())
}

fn draw_phase_overlay<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    match snapshot.phase {
        GamePhase::Paused => draw_overlay(
            out,
            snapshot,
            &[("PAUSED", Color::White), ("Press P to resume", C_HINT)],
        ),
        GamePhase::Countdown { .. } => {
            let seconds = snapshot.timer_remaining_ms.unwrap_or(0) / 1000;
            let text = format!("Resuming in: {}s", seconds);
            draw_overlay(out, snapshot, &[(text.as_str(), C_BANNER)])
        }
        GamePhase::GameOver => {
            let score = format!("Final Score: {}", snapshot.score);
            let cause = match snapshot.game_over_cause {
                Some(kind) => format!("Cause: {:?}", kind),
                None => String::new(),
            };
            draw_overlay(
                out,
                snapshot,
                &[
                    ("G A M E   O V E R", Color::Red),
                    (score.as_str(), C_HUD),
                    (cause.as_str(), C_HINT),
                    ("Press Q to quit", Color::White),
                ],
            )
        }
        _ => Ok(()),
    }
}

/// Centered block of text lines inside the arena
fn draw_overlay<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    lines: &[(&str, Color)],
) -> io::Result<()> {
    let (width, height) = board_size(snapshot);
    let center_column = width / 2;
    let first_row = 1 + (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (text, color)) in lines.iter().enumerate() {
        if text.is_empty() {
            continue;
        }
        let column = center_column.saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(column, first_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    let (_, height) = board_size(snapshot);
    out.queue(cursor::MoveTo(1, height + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "Arrows / WASD : Move   P : Pause   Enter : Start   Q : Quit",
    ))?;
    Ok(())
}
