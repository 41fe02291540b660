use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use neon_snake::commentary::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use neon_snake::commentary::{Backend, GeminiClient, Operator, OperatorLog, OperatorMessage};
use neon_snake::config::{
    DEFAULT_GRID_SIZE, DEFAULT_INITIAL_SPEED_MS, DEFAULT_MILESTONE_INTERVAL, DEFAULT_MIN_SPEED_MS,
    DEFAULT_SPEED_DECREMENT_MS, GameConfig,
};
use neon_snake::controller::GameController;
use neon_snake::game::{GameCommand, TickOutcome};
use neon_snake::input::{self, GameInput, command_for};
use neon_snake::logging;
use neon_snake::renderer;
use neon_snake::score::ScoreStore;
use neon_snake::terminal_runtime::TerminalSession;
use neon_snake::ui::hud::HudInfo;
use neon_snake::ui::operator::OperatorView;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

/// Longest the loop waits for input before redrawing.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Side length of the square board.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: u16,

    /// Tick interval at the start of a game, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_INITIAL_SPEED_MS)]
    initial_speed_ms: u64,

    /// Tick interval reduction per food eaten, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_SPEED_DECREMENT_MS)]
    speed_decrement_ms: u64,

    /// Fastest tick interval, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_MIN_SPEED_MS)]
    min_speed_ms: u64,

    /// Never contact the commentary API.
    #[arg(long)]
    offline: bool,

    /// Commentary API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Commentary model name.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the commentary API.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    operator_endpoint: String,

    /// Log file path (defaults to the local data directory).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            grid_size: self.grid_size,
            initial_speed_ms: self.initial_speed_ms,
            speed_decrement_ms: self.speed_decrement_ms,
            min_speed_ms: self.min_speed_ms,
            milestone_interval: DEFAULT_MILESTONE_INTERVAL,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = cli.game_config();
    if let Err(error) = config.validate() {
        eprintln!("Invalid configuration: {error}");
        return ExitCode::from(2);
    }

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    if let Err(error) = logging::init(&log_path, &cli.log_level) {
        eprintln!("Logging disabled ({}): {error}", log_path.display());
    }

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("neon-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: GameConfig) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("operator")
        .enable_all()
        .build()?;

    let (operator, mut replies) = Operator::new(operator_backend(cli), runtime.handle().clone());
    let mut controller = GameController::new(config, ScoreStore::default(), operator);

    info!(grid_size = config.grid_size, "neon-snake starting");
    controller.greet();

    let result = event_loop(&mut controller, &mut replies);

    runtime.shutdown_background();
    result
}

fn event_loop(
    controller: &mut GameController<Operator>,
    replies: &mut UnboundedReceiver<OperatorMessage>,
) -> io::Result<()> {
    let mut session = TerminalSession::enter()?;
    let mut log = OperatorLog::default();
    let mut new_high_score = false;

    loop {
        while let Ok(message) = replies.try_recv() {
            log.push(message);
        }

        let hud = HudInfo {
            high_score: controller.high_score(),
            new_high_score,
        };
        let typing = controller.notifier().in_flight() > 0;
        session.terminal_mut().draw(|frame| {
            renderer::render(
                frame,
                &controller.snapshot(),
                hud,
                OperatorView { log: &log, typing },
            );
        })?;

        let timeout = controller
            .time_until_tick(Instant::now())
            .map_or(FRAME_INTERVAL, |until| until.min(FRAME_INTERVAL));

        if let Some(game_input) = input::poll_input(timeout)? {
            if game_input == GameInput::Quit {
                break;
            }

            if let Some(command) = command_for(game_input, controller.status()) {
                let accepted = controller.handle(command, Instant::now());
                if accepted && command == GameCommand::Start {
                    log.clear();
                    new_high_score = false;
                }
            }
        }

        let previous_high_score = controller.high_score();
        if let TickOutcome::GameOver(_) = controller.update(Instant::now()) {
            new_high_score = controller.high_score() > previous_high_score;
        }
    }

    info!("neon-snake exiting");
    Ok(())
}

fn operator_backend(cli: &Cli) -> Backend {
    if cli.offline {
        return Backend::Offline;
    }

    let Some(api_key) = cli.api_key.as_deref().filter(|key| !key.is_empty()) else {
        warn!("no commentary API key configured, operator is offline");
        return Backend::Offline;
    };

    match GeminiClient::new(&cli.operator_endpoint, cli.model.as_str(), api_key) {
        Ok(client) => Backend::Gemini(client),
        Err(error) => {
            warn!(%error, "commentary client unavailable, operator is offline");
            Backend::Offline
        }
    }
}
