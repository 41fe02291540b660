use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::score::data_dir;

const LOG_FILE_NAME: &str = "neon-snake.log";

/// Default log file location next to the high score.
#[must_use]
pub fn default_log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

/// Installs the global `tracing` subscriber, appending to `path`.
///
/// The terminal belongs to the UI, so logs never go to stdout/stderr.
/// `RUST_LOG` overrides `default_directive`.
pub fn init(path: &Path, default_directive: &str) -> io::Result<()> {
    let file = open_log_file(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(io::Error::other)
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
