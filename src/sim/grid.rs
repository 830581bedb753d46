//! Arena geometry: grid-aligned positions, headings and box overlap

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Pixel position of a cell's top-left corner (always a multiple of the cell size)
pub type Position = IVec2;

/// Heading of a snake. Screen coordinates, so `Up` decreases y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step in grid space
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Apply a requested turn: an exact reversal is discarded and the
    /// current heading kept.
    pub fn filter(self, requested: Direction) -> Direction {
        if requested == self.opposite() {
            self
        } else {
            requested
        }
    }

    /// Uniform pick over all four headings (may repeat the current one)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Axis-aligned box in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Position,
    pub size: IVec2,
}

impl Rect {
    pub fn new(origin: Position, size: IVec2) -> Self {
        Self { origin, size }
    }

    /// Square box with the given edge
    pub fn square(origin: Position, edge: i32) -> Self {
        Self::new(origin, IVec2::splat(edge))
    }

    pub fn max(&self) -> Position {
        self.origin + self.size
    }

    /// Strict overlap: boxes that only share an edge or corner do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.origin, self.max());
        let (b_min, b_max) = (other.origin, other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

/// The arena: pixel dimensions plus the snake cell size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWorld {
    pub width: i32,
    pub height: i32,
    pub cell: i32,
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT, CELL_SIZE)
    }
}

impl GridWorld {
    pub fn new(width: i32, height: i32, cell: i32) -> Self {
        Self {
            width,
            height,
            cell,
        }
    }

    /// Boundary test: true when `pos` lies inside `[0, width) x [0, height)`
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Shift by one cell, no bounds handling
    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        pos + direction.delta() * self.cell
    }

    /// Toroidal wrap: out-of-range coordinates re-enter from the opposite edge
    pub fn wrap(&self, pos: Position) -> Position {
        IVec2::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
    }

    /// Cell-aligned centre of the arena
    pub fn center(&self) -> Position {
        IVec2::new(
            (self.width / 2 / self.cell) * self.cell,
            (self.height / 2 / self.cell) * self.cell,
        )
    }

    /// Bounding box of the snake cell at `pos`
    pub fn cell_rect(&self, pos: Position) -> Rect {
        Rect::square(pos, self.cell)
    }

    pub fn columns(&self, granularity: i32) -> i32 {
        self.width / granularity
    }

    pub fn rows(&self, granularity: i32) -> i32 {
        self.height / granularity
    }

    /// Number of anchors at the given granularity
    pub fn anchor_count(&self, granularity: i32) -> usize {
        (self.columns(granularity) * self.rows(granularity)).max(0) as usize
    }

    /// Uniformly random anchor aligned to `granularity`
    pub fn random_anchor<R: Rng + ?Sized>(&self, rng: &mut R, granularity: i32) -> Position {
        let col = rng.random_range(0..self.columns(granularity));
        let row = rng.random_range(0..self.rows(granularity));
        IVec2::new(col * granularity, row * granularity)
    }

    /// Every anchor aligned to `granularity`, row-major
    pub fn anchors(&self, granularity: i32) -> impl Iterator<Item = Position> {
        let columns = self.columns(granularity);
        (0..self.rows(granularity)).flat_map(move |row| {
            (0..columns).map(move |col| IVec2::new(col * granularity, row * granularity))
        })
    }
}
