//! Operator commentary: semantic game events and the chat history they produce.
//!
//! The game core only ever calls [`EventNotifier::notify`]; replies come back
//! asynchronously as [`OperatorMessage`]s and are consumed by the UI alone.

use std::collections::VecDeque;

pub mod gemini;
pub mod operator;

pub use gemini::{CommentaryError, GeminiClient};
pub use operator::{Backend, Operator};

/// Semantic events the operator reacts to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    Start,
    Eat,
    GameOver,
    HighScore,
    IdleChat,
}

impl GameEvent {
    /// Label used in operator prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Eat => "EAT",
            Self::GameOver => "GAME_OVER",
            Self::HighScore => "HIGH_SCORE",
            Self::IdleChat => "IDLE_CHAT",
        }
    }
}

/// Receiver of game events. Implementations must return immediately.
pub trait EventNotifier {
    fn notify(&mut self, event: GameEvent, score: u32, context: Option<&str>);
}

/// One line of operator chat.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OperatorMessage {
    pub event: GameEvent,
    pub text: String,
}

/// Most messages the chat panel keeps.
pub const OPERATOR_LOG_CAPACITY: usize = 32;

/// Bounded chat history, oldest first.
#[derive(Debug, Clone)]
pub struct OperatorLog {
    messages: VecDeque<OperatorMessage>,
    capacity: usize,
}

impl Default for OperatorLog {
    fn default() -> Self {
        Self::with_capacity(OPERATOR_LOG_CAPACITY)
    }
}

impl OperatorLog {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Appends a message, evicting the oldest when full.
    pub fn push(&mut self, message: OperatorMessage) {
        if self.messages.len() == self.capacity {
            let _ = self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OperatorMessage> {
        self.messages.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
