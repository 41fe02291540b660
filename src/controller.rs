use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::commentary::{EventNotifier, GameEvent};
use crate::config::GameConfig;
use crate::game::{GameCommand, GameState, GameStatus, Snapshot, TickOutcome};
use crate::scheduler::TickScheduler;
use crate::score::ScoreStore;

/// Context sent with the greeting when the game first opens.
pub const GREETING_CONTEXT: &str = "The player has just opened the game. Greet them.";

/// Owns the authoritative game state and drives it from commands and time.
///
/// All mutation happens through [`GameController::handle`] and
/// [`GameController::update`], both called from the single event loop.
#[derive(Debug)]
pub struct GameController<N> {
    state: GameState,
    high_score: u32,
    store: ScoreStore,
    scheduler: TickScheduler,
    notifier: N,
}

impl<N: EventNotifier> GameController<N> {
    /// Creates an idle controller, reading the persisted high score.
    pub fn new(config: GameConfig, store: ScoreStore, notifier: N) -> Self {
        Self::with_state(GameState::new(config), store, notifier)
    }

    /// Creates a controller around an existing state. A state that is
    /// already playing gets its first tick armed from `Instant::now()`.
    pub fn with_state(state: GameState, store: ScoreStore, notifier: N) -> Self {
        let high_score = store.load().unwrap_or_else(|error| {
            warn!(%error, path = %store.path().display(), "could not read high score, starting from 0");
            0
        });

        let mut controller = Self {
            state,
            high_score,
            store,
            scheduler: TickScheduler::new(),
            notifier,
        };
        if controller.state.status == GameStatus::Playing {
            controller.arm(Instant::now());
        }
        controller
    }

    /// Emits the opening `IDLE_CHAT` event.
    pub fn greet(&mut self) {
        self.notifier
            .notify(GameEvent::IdleChat, 0, Some(GREETING_CONTEXT));
    }

    /// Applies one command at `now`. Returns `false` for no-ops.
    pub fn handle(&mut self, command: GameCommand, now: Instant) -> bool {
        if !self.state.apply(command) {
            return false;
        }

        match command {
            GameCommand::Start => {
                info!(high_score = self.high_score, "session started");
                self.arm(now);
                self.notifier.notify(GameEvent::Start, 0, None);
            }
            GameCommand::Pause | GameCommand::Resume | GameCommand::TogglePause => {
                if self.state.status == GameStatus::Playing {
                    self.arm(now);
                } else {
                    self.scheduler.disarm();
                }
            }
            GameCommand::Turn(_) => {}
        }

        true
    }

    /// Runs the tick that is due at `now`, if any.
    pub fn update(&mut self, now: Instant) -> TickOutcome {
        if !self.scheduler.fire(now) {
            return TickOutcome::Skipped;
        }

        let outcome = self.state.tick();
        match outcome {
            TickOutcome::Ate { score, milestone } => {
                if milestone {
                    self.notifier.notify(GameEvent::Eat, score, None);
                }
                self.arm(now);
            }
            TickOutcome::Moved => self.arm(now),
            TickOutcome::GameOver(reason) => {
                info!(score = self.state.score, ?reason, "session over");
                self.finish_session();
            }
            TickOutcome::Skipped => {}
        }

        outcome
    }

    fn arm(&mut self, now: Instant) {
        let period = self.state.speed.interval();
        self.scheduler.arm(now, period);
        debug!(period_ms = self.state.speed.as_millis(), "tick armed");
    }

    fn finish_session(&mut self) {
        self.scheduler.disarm();
        let score = self.state.score;

        if score <= self.high_score {
            self.notifier.notify(GameEvent::GameOver, score, None);
            return;
        }

        self.high_score = score;
        info!(high_score = score, "new high score");
        if let Err(error) = self.store.save(score) {
            warn!(%error, path = %self.store.path().display(), "failed to save high score");
        }
        self.notifier.notify(GameEvent::HighScore, score, None);
    }

    /// Read-only view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Time until the next tick, for the event loop's poll timeout.
    #[must_use]
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until(now)
    }

    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    #[cfg(test)]
    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::commentary::{EventNotifier, GameEvent};
    use crate::config::GameConfig;
    use crate::game::{DeathReason, GameCommand, GameState, GameStatus, TickOutcome};
    use crate::input::Direction;
    use crate::score::ScoreStore;
    use crate::snake::{Position, Snake};

    use super::{GREETING_CONTEXT, GameController};

    #[derive(Debug, Default)]
    struct Recorder(Vec<(GameEvent, u32, Option<String>)>);

    impl EventNotifier for Recorder {
        fn notify(&mut self, event: GameEvent, score: u32, context: Option<&str>) {
            self.0.push((event, score, context.map(str::to_owned)));
        }
    }

    fn controller(dir: &tempfile::TempDir) -> GameController<Recorder> {
        let state = GameState::new_with_seed(GameConfig::default(), 17);
        let store = ScoreStore::at(dir.path().join("highscore.json"));
        GameController::with_state(state, store, Recorder::default())
    }

    fn events(controller: &GameController<Recorder>) -> Vec<GameEvent> {
        controller.notifier().0.iter().map(|(event, ..)| *event).collect()
    }

    #[test]
    fn greeting_carries_context() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut controller = controller(&dir);

        controller.greet();

        assert_eq!(
            controller.notifier().0,
            vec![(GameEvent::IdleChat, 0, Some(GREETING_CONTEXT.to_owned()))]
        );
    }

    #[test]
    fn start_arms_first_tick_at_initial_speed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut controller = controller(&dir);
        let now = Instant::now();

        assert!(controller.handle(GameCommand::Start, now));

        assert_eq!(events(&controller), vec![GameEvent::Start]);
        assert_eq!(
            controller.time_until_tick(now),
            Some(Duration::from_millis(150))
        );
        assert_eq!(
            controller.update(now + Duration::from_millis(100)),
            TickOutcome::Skipped
        );
        assert_ne!(
            controller.update(now + Duration::from_millis(150)),
            TickOutcome::Skipped
        );
    }

    #[test]
    fn eating_rearms_with_faster_period() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut controller = controller(&dir);
        let now = Instant::now();
        controller.handle(GameCommand::Start, now);
        controller.state_mut().food = Some(Position::new(11, 10));

        let tick_at = now + Duration::from_millis(150);
        assert_eq!(
            controller.update(tick_at),
            TickOutcome::Ate {
                score: 1,
                milestone: false
            }
        );
        assert_eq!(
            controller.time_until_tick(tick_at),
            Some(Duration::from_millis(148))
        );
    }

    #[test]
    fn milestone_food_requests_eat_commentary() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut controller = controller(&dir);
        let now = Instant::now();
        controller.handle(GameCommand::Start, now);
        controller.state_mut().score = 4;
        controller.state_mut().food = Some(Position::new(11, 10));

        controller.update(now + Duration::from_secs(1));

        assert_eq!(controller.notifier().0.last().map(|e| (e.0, e.1)), Some((GameEvent::Eat, 5)));
    }

    #[test]
    fn pause_cancels_tick_and_resume_rearms() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut controller = controller(&dir);
        let now = Instant::now();
        controller.handle(GameCommand::Start, now);

        assert!(controller.handle(GameCommand::Pause, now));
        assert!(!controller.handle(GameCommand::Pause, now));
        assert_eq!(controller.time_until_tick(now), None);
        assert_eq!(
            controller.update(now + Duration::from_secs(5)),
            TickOutcome::Skipped
        );

        let later = now + Duration::from_secs(5);
        assert!(controller.handle(GameCommand::TogglePause, later));
        assert_eq!(controller.status(), GameStatus::Playing);
        assert_eq!(
            controller.time_until_tick(later),
            Some(Duration::from_millis(150))
        );
    }

    #[test]
    fn new_high_score_is_persisted_and_announced() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ScoreStore::at(dir.path().join("highscore.json"));
        store.save(3).expect("seed high score");
        let mut controller = controller(&dir);
        assert_eq!(controller.high_score(), 3);

        let now = Instant::now();
        controller.handle(GameCommand::Start, now);
        controller.state_mut().score = 7;
        controller.state_mut().snake =
            Snake::from_segments(vec![Position::new(19, 10)], Direction::Right);

        assert_eq!(
            controller.update(now + Duration::from_secs(1)),
            TickOutcome::GameOver(DeathReason::WallCollision)
        );

        assert_eq!(controller.high_score(), 7);
        assert_eq!(store.load().expect("saved score"), 7);
        assert_eq!(
            events(&controller),
            vec![GameEvent::Start, GameEvent::HighScore]
        );
        assert_eq!(controller.time_until_tick(now), None);
    }

    #[test]
    fn ordinary_game_over_keeps_high_score() {
        let dir = tempfile::tempdir().expect("temp dir");
        ScoreStore::at(dir.path().join("highscore.json"))
            .save(10)
            .expect("seed high score");
        let mut controller = controller(&dir);

        let now = Instant::now();
        controller.handle(GameCommand::Start, now);
        controller.state_mut().score = 10;
        controller.state_mut().snake =
            Snake::from_segments(vec![Position::new(19, 10)], Direction::Right);
        controller.update(now + Duration::from_secs(1));

        assert_eq!(controller.high_score(), 10);
        assert_eq!(
            controller.notifier().0.last(),
            Some(&(GameEvent::GameOver, 10, None))
        );
    }

    #[test]
    fn adopting_a_playing_state_arms_the_first_tick() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut state = GameState::new_with_seed(GameConfig::default(), 17);
        assert!(state.start());
        let store = ScoreStore::at(dir.path().join("highscore.json"));

        let before = Instant::now();
        let controller = GameController::with_state(state, store, Recorder::default());

        let until = controller
            .time_until_tick(before)
            .expect("playing state should be armed");
        assert!(until >= Duration::from_millis(150));
        assert!(events(&controller).is_empty());
    }

    #[test]
    fn unreadable_high_score_starts_from_zero() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("highscore.json"), "{").expect("write garbage");

        assert_eq!(controller(&dir).high_score(), 0);
    }
}
