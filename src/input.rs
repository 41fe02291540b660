use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::{GameCommand, GameStatus};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step `(dx, dy)` for this direction; y grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Physical input events after key mapping.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Space/Enter: start a game or resume a paused one.
    Confirm,
    Pause,
    TogglePause,
    Quit,
}

/// Translates an input into a game command given the current status.
///
/// Returns `None` for inputs that have no meaning in `status`, and for
/// [`GameInput::Quit`], which the event loop handles itself.
#[must_use]
pub fn command_for(input: GameInput, status: GameStatus) -> Option<GameCommand> {
    match input {
        GameInput::Direction(direction) => Some(GameCommand::Turn(direction)),
        GameInput::Confirm => match status {
            GameStatus::Idle | GameStatus::GameOver => Some(GameCommand::Start),
            GameStatus::Paused => Some(GameCommand::Resume),
            GameStatus::Playing => None,
        },
        GameInput::Pause => Some(GameCommand::Pause),
        GameInput::TogglePause => Some(GameCommand::TogglePause),
        GameInput::Quit => None,
    }
}

/// Maps a terminal key press to a game input.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => GameInput::Direction(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => GameInput::Confirm,
        KeyCode::Esc => GameInput::Pause,
        KeyCode::Char('p' | 'P') => GameInput::TogglePause,
        KeyCode::Char('q' | 'Q') => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

/// Waits up to `timeout` for one mapped key press.
pub fn poll_input(timeout: Duration) -> io::Result<Option<GameInput>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) => Ok(map_key(key)),
        _ => Ok(None),
    }
}
