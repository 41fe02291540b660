//! Terminal Snake with an LLM-backed commentary operator.
//!
//! The game core ([`game`], [`snake`], [`food`], [`scheduler`], [`controller`])
//! is deterministic given its RNG and performs no I/O apart from the high
//! score file. Commentary runs on a tokio runtime and never blocks the loop.

pub mod commentary;
pub mod config;
pub mod controller;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod scheduler;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
