//! The player's snake

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::{Direction, GridWorld, Position};

/// Ordered body (head first) plus a pending-growth flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnake {
    body: VecDeque<Position>,
    heading: Direction,
    growing: bool,
}

impl PlayerSnake {
    /// Single-segment snake
    pub fn new(head: Position, heading: Direction) -> Self {
        Self::from_segments(head, std::iter::empty(), heading)
    }

    /// Snake with an explicit body, head first
    pub fn from_segments(
        head: Position,
        tail: impl IntoIterator<Item = Position>,
        heading: Direction,
    ) -> Self {
        let mut body = VecDeque::from([head]);
        body.extend(tail);
        Self {
            body,
            heading,
            growing: false,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Heading used by the most recent `advance`
    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_growing(&self) -> bool {
        self.growing
    }

    /// Keep the tail on the next advance
    pub fn grow(&mut self) {
        self.growing = true;
    }

    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Head equals one of the other segments
    pub fn hits_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&segment| segment == head)
    }

    /// Push a new head one cell along `direction`. The tail is dropped unless
    /// growth is pending, in which case length grows by one and the flag clears.
    /// No bounds or self checks here.
    pub fn advance(&mut self, direction: Direction, grid: &GridWorld) {
        let new_head = grid.step(self.head(), direction);
        self.heading = direction;
        self.body.push_front(new_head);
        if self.growing {
            self.growing = false;
        } else {
            self.body.pop_back();
        }
    }
}
