use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{GameConfig, GridSize};
use crate::food::spawn_position;
use crate::input::Direction;
use crate::scheduler::Speed;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Commands accepted by the state machine.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameCommand {
    Start,
    Pause,
    Resume,
    TogglePause,
    Turn(Direction),
}

/// Why the last session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so no food can be placed.
    BoardFull,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The game was not playing; nothing changed.
    Skipped,
    /// The snake translated by one cell.
    Moved,
    /// The snake ate and grew; `milestone` marks a score on the milestone interval.
    Ate { score: u32, milestone: bool },
    GameOver(DeathReason),
}

/// Complete mutable game state, one instance per process.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only after the snake has filled the board.
    pub food: Option<Position>,
    pub score: u32,
    pub speed: Speed,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    config: GameConfig,
    rng: StdRng,
}

/// Read-only view handed to the presentation layer after every mutation.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub food: Option<Position>,
    pub status: GameStatus,
    pub score: u32,
    pub direction: Direction,
    pub speed: Speed,
    pub death_reason: Option<DeathReason>,
    pub bounds: GridSize,
}

impl GameState {
    /// Creates an idle state with the initial layout on screen.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests.
    #[must_use]
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let bounds = config.bounds();
        let snake = Snake::initial(bounds);
        let food = spawn_position(&mut rng, bounds, &snake);

        Self {
            snake,
            food,
            score: 0,
            speed: Speed::initial(&config),
            status: GameStatus::Idle,
            death_reason: None,
            config,
            rng,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.config.bounds()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Applies one command. Returns `false` when the command is a no-op in
    /// the current status.
    pub fn apply(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::Start => self.start(),
            GameCommand::Pause => self.pause(),
            GameCommand::Resume => self.resume(),
            GameCommand::TogglePause => self.pause() || self.resume(),
            GameCommand::Turn(direction) => self.turn(direction),
        }
    }

    /// Idle/GameOver -> Playing with a fully reset session.
    pub fn start(&mut self) -> bool {
        if !matches!(self.status, GameStatus::Idle | GameStatus::GameOver) {
            return false;
        }

        let bounds = self.bounds();
        self.snake = Snake::initial(bounds);
        self.food = spawn_position(&mut self.rng, bounds, &self.snake);
        self.score = 0;
        self.speed = Speed::initial(&self.config);
        self.death_reason = None;
        self.status = GameStatus::Playing;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.status = GameStatus::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Playing;
        true
    }

    /// Updates the pending direction; ignored unless playing.
    pub fn turn(&mut self, direction: Direction) -> bool {
        self.status == GameStatus::Playing && self.snake.steer(direction)
    }

    /// Advances simulation by one gameplay tick.
    ///
    /// Collisions are checked against the snake as it stands before the
    /// move, tail included, so the head may not enter the cell the tail is
    /// about to leave.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Playing {
            return TickOutcome::Skipped;
        }

        let bounds = self.bounds();
        let new_head = self.snake.next_head_position();

        if !new_head.is_within_bounds(bounds) {
            return self.end(DeathReason::WallCollision);
        }

        if self.snake.occupies(new_head) {
            return self.end(DeathReason::SelfCollision);
        }

        let ate = self.food == Some(new_head);
        self.snake.advance(new_head, ate);
        if !ate {
            return TickOutcome::Moved;
        }

        self.score += 1;
        self.speed = self.speed.accelerated(&self.config);

        self.food = spawn_position(&mut self.rng, bounds, &self.snake);
        if self.food.is_none() {
            return self.end(DeathReason::BoardFull);
        }

        TickOutcome::Ate {
            score: self.score,
            milestone: self.score.checked_rem(self.config.milestone_interval) == Some(0),
        }
    }

    fn end(&mut self, reason: DeathReason) -> TickOutcome {
        self.status = GameStatus::GameOver;
        self.death_reason = Some(reason);
        TickOutcome::GameOver(reason)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake,
            food: self.food,
            status: self.status,
            score: self.score,
            direction: self.snake.direction(),
            speed: self.speed,
            death_reason: self.death_reason,
            bounds: self.bounds(),
        }
    }
}
