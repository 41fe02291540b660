use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body plus its steering state.
///
/// `heading` is the direction applied on the most recent tick; `pending` is
/// the last direction accepted from input and the one the next tick uses.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    heading: Direction,
    pending: Direction,
}

impl Snake {
    /// Creates the fixed start layout: a vertical three-segment column at the
    /// grid centre, head on top, heading right.
    #[must_use]
    pub fn initial(bounds: GridSize) -> Self {
        let x = i32::from(bounds.width / 2);
        let y = i32::from(bounds.height / 2);

        Self::from_segments(
            vec![
                Position::new(x, y),
                Position::new(x, y + 1),
                Position::new(x, y + 2),
            ],
            Direction::Right,
        )
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        debug_assert!(!segments.is_empty());

        Self {
            body: VecDeque::from(segments),
            heading: direction,
            pending: direction,
        }
    }

    /// Records a requested turn. Returns `false` when it is rejected.
    ///
    /// A turn is rejected when it reverses either the last accepted
    /// direction or the direction the snake actually moved on its last tick.
    /// Several accepted turns between ticks collapse to the last one.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.pending, direction)
            || !direction_change_is_valid(self.heading, direction)
        {
            return false;
        }

        self.pending = direction;
        true
    }

    /// Returns where the head lands on the next tick.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().step(self.pending)
    }

    /// Moves the head to `new_head`, dropping the tail unless `grow` is set.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.heading = self.pending;
        self.body.push_front(new_head);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when the body has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the last accepted direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.pending
    }

    /// Returns the direction applied on the most recent tick.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &Position> + ExactSizeIterator {
        self.body.iter()
    }
}
