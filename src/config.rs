use ratatui::style::Color;
use thiserror::Error;

/// Side length of the square grid in the reference configuration.
pub const DEFAULT_GRID_SIZE: u16 = 20;

/// Smallest grid that still fits the initial three-segment layout.
pub const MIN_GRID_SIZE: u16 = 5;

/// Largest grid the board renderer lays out.
pub const MAX_GRID_SIZE: u16 = 64;

/// Tick interval at the start of every session, in milliseconds.
pub const DEFAULT_INITIAL_SPEED_MS: u64 = 150;

/// Interval reduction applied per food eaten, in milliseconds.
pub const DEFAULT_SPEED_DECREMENT_MS: u64 = 2;

/// Fastest allowed tick interval, in milliseconds.
pub const DEFAULT_MIN_SPEED_MS: u64 = 60;

/// Score multiple that triggers an `EAT` commentary request.
pub const DEFAULT_MILESTONE_INTERVAL: u32 = 5;

/// Logical grid dimensions. The board is always square.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Creates an `n` by `n` grid.
    #[must_use]
    pub fn square(n: u16) -> Self {
        Self {
            width: n,
            height: n,
        }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Tunables for one game process.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameConfig {
    pub grid_size: u16,
    pub initial_speed_ms: u64,
    pub speed_decrement_ms: u64,
    pub min_speed_ms: u64,
    pub milestone_interval: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            initial_speed_ms: DEFAULT_INITIAL_SPEED_MS,
            speed_decrement_ms: DEFAULT_SPEED_DECREMENT_MS,
            min_speed_ms: DEFAULT_MIN_SPEED_MS,
            milestone_interval: DEFAULT_MILESTONE_INTERVAL,
        }
    }
}

impl GameConfig {
    /// Returns the grid bounds described by this configuration.
    #[must_use]
    pub fn bounds(&self) -> GridSize {
        GridSize::square(self.grid_size)
    }

    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if self.min_speed_ms == 0 {
            return Err(ConfigError::ZeroMinSpeed);
        }
        if self.initial_speed_ms < self.min_speed_ms {
            return Err(ConfigError::SpeedRange {
                initial: self.initial_speed_ms,
                min: self.min_speed_ms,
            });
        }
        if self.milestone_interval == 0 {
            return Err(ConfigError::ZeroMilestone);
        }
        Ok(())
    }
}

/// Invalid startup configuration.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("grid size {0} is outside {}..={}", MIN_GRID_SIZE, MAX_GRID_SIZE)]
    GridSize(u16),
    #[error("minimum tick interval must be greater than zero")]
    ZeroMinSpeed,
    #[error("initial tick interval {initial}ms is faster than the minimum {min}ms")]
    SpeedRange { initial: u64, min: u64 },
    #[error("milestone interval must be greater than zero")]
    ZeroMilestone,
}

// Board and panel palette.
pub const COLOR_SNAKE_HEAD: Color = Color::White;
pub const COLOR_SNAKE_BODY: Color = Color::Magenta;
pub const COLOR_SNAKE_TAIL: Color = Color::Rgb(120, 40, 140);
pub const COLOR_FOOD: Color = Color::Cyan;
pub const COLOR_BORDER: Color = Color::Magenta;
pub const COLOR_ACCENT: Color = Color::LightMagenta;
pub const COLOR_MUTED: Color = Color::DarkGray;
pub const COLOR_OPERATOR: Color = Color::LightCyan;

/// Each logical cell is two terminal columns wide so the board looks square.
pub const CELL_WIDTH: u16 = 2;

pub const GLYPH_SNAKE_HEAD: &str = "██";
pub const GLYPH_SNAKE_BODY: &str = "▓▓";
pub const GLYPH_SNAKE_TAIL: &str = "▒▒";
pub const GLYPH_FOOD: &str = "◆ ";

/// Display name of the commentary operator.
pub const OPERATOR_NAME: &str = "Lumina";
