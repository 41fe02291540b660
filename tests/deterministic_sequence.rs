use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use neon_snake::commentary::{EventNotifier, GameEvent};
use neon_snake::config::GameConfig;
use neon_snake::controller::GameController;
use neon_snake::game::{DeathReason, GameCommand, GameState, GameStatus, TickOutcome};
use neon_snake::input::Direction;
use neon_snake::score::ScoreStore;
use neon_snake::snake::{Position, Snake};

#[derive(Debug, Default)]
struct Events(Vec<GameEvent>);

impl EventNotifier for Events {
    fn notify(&mut self, event: GameEvent, _score: u32, _context: Option<&str>) {
        self.0.push(event);
    }
}

fn started(seed: u64) -> GameState {
    let mut state = GameState::new_with_seed(GameConfig::default(), seed);
    assert!(state.apply(GameCommand::Start));
    state
}

#[test]
fn eating_from_the_initial_layout() {
    let mut state = started(42);
    state.food = Some(Position::new(11, 10));

    state.tick();

    let segments: Vec<_> = state.snake.segments().copied().collect();
    assert_eq!(
        segments,
        vec![
            Position::new(11, 10),
            Position::new(10, 10),
            Position::new(10, 11),
            Position::new(10, 12),
        ]
    );
    assert_eq!(state.score, 1);
    assert_ne!(state.food, Some(Position::new(11, 10)));
    assert!(state.food.is_some_and(|food| !state.snake.occupies(food)));
    assert_eq!(state.status, GameStatus::Playing);
}

#[test]
fn right_wall_ends_the_game_without_moving() {
    let mut state = started(1);
    state.snake = Snake::from_segments(
        vec![
            Position::new(19, 10),
            Position::new(18, 10),
            Position::new(17, 10),
        ],
        Direction::Right,
    );
    let before: Vec<_> = state.snake.segments().copied().collect();

    assert_eq!(
        state.tick(),
        TickOutcome::GameOver(DeathReason::WallCollision)
    );

    let after: Vec<_> = state.snake.segments().copied().collect();
    assert_eq!(state.status, GameStatus::GameOver);
    assert_eq!(before, after);
}

#[test]
fn reversal_request_is_ignored() {
    let mut state = started(2);
    state.food = Some(Position::new(0, 0));

    assert!(!state.apply(GameCommand::Turn(Direction::Left)));
    state.tick();

    assert_eq!(state.snake.head(), Position::new(11, 10));
    assert_eq!(state.snake.direction(), Direction::Right);
}

#[test]
fn idempotent_commands_leave_state_alone() {
    let mut state = GameState::new_with_seed(GameConfig::default(), 3);
    assert!(!state.apply(GameCommand::Turn(Direction::Up)));
    assert_eq!(state.snake.direction(), Direction::Right);

    assert!(state.apply(GameCommand::Start));
    assert!(state.apply(GameCommand::Pause));
    let head = state.snake.head();
    assert!(!state.apply(GameCommand::Pause));
    assert_eq!(state.status, GameStatus::Paused);
    assert_eq!(state.snake.head(), head);
}

#[test]
fn long_random_walk_keeps_invariants() {
    let mut state = started(7);
    let mut rng = StdRng::seed_from_u64(99);
    let turns = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];
    let mut games = 0;

    for _ in 0..5_000 {
        if state.status == GameStatus::GameOver {
            games += 1;
            assert!(state.apply(GameCommand::Start));
        }

        if rng.gen_bool(0.3) {
            let _ = state.apply(GameCommand::Turn(turns[rng.gen_range(0..turns.len())]));
        }

        let before_len = state.snake.len();
        let before_score = state.score;
        let before_heading = state.snake.heading();

        match state.tick() {
            TickOutcome::Moved => assert_eq!(state.snake.len(), before_len),
            TickOutcome::Ate { score, .. } => {
                assert_eq!(score, before_score + 1);
                assert_eq!(state.snake.len(), before_len + 1);
            }
            TickOutcome::GameOver(_) => assert_eq!(state.snake.len(), before_len),
            TickOutcome::Skipped => panic!("a playing game never skips a tick"),
        }

        assert_ne!(state.snake.heading(), before_heading.opposite());

        let bounds = state.bounds();
        let mut seen = HashSet::new();
        for segment in state.snake.segments() {
            assert!(segment.is_within_bounds(bounds));
            if state.status == GameStatus::Playing {
                assert!(seen.insert(*segment), "duplicate segment {segment:?}");
            }
        }
        if state.status == GameStatus::Playing {
            assert!(state.food.is_some_and(|food| !state.snake.occupies(food)));
        }
    }

    assert!(games > 0);
}

#[test]
fn high_score_session_through_the_controller() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let store = ScoreStore::at(dir.path().join("highscore.json"));
    store.save(2).expect("seed high score");

    let mut state = GameState::new_with_seed(GameConfig::default(), 9);
    assert!(state.apply(GameCommand::Start));
    state.score = 2;
    state.snake = Snake::from_segments(
        vec![Position::new(18, 10), Position::new(17, 10)],
        Direction::Right,
    );
    state.food = Some(Position::new(19, 10));

    let mut controller = GameController::with_state(state, store.clone(), Events::default());
    assert_eq!(controller.high_score(), 2);
    controller.greet();
    assert!(!controller.handle(GameCommand::Start, Instant::now()));

    let mut now = Instant::now() + Duration::from_millis(150);
    assert!(matches!(controller.update(now), TickOutcome::Ate { score: 3, .. }));

    now += Duration::from_millis(148);
    assert_eq!(
        controller.update(now),
        TickOutcome::GameOver(DeathReason::WallCollision)
    );

    assert_eq!(controller.status(), GameStatus::GameOver);
    assert_eq!(controller.high_score(), 3);
    assert_eq!(store.load().expect("high score should be saved"), 3);
    assert_eq!(
        controller.notifier().0,
        vec![GameEvent::IdleChat, GameEvent::HighScore]
    );
    assert_eq!(controller.time_until_tick(now), None);
}
