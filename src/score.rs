use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "neon-snake";
const SCORE_FILE_NAME: &str = "highscore.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u32,
}

/// Returns the platform-correct directory for game data.
#[must_use]
pub fn data_dir() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base
}

/// The single persisted scalar: the best score ever reached.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScoreStore {
    path: PathBuf,
}

impl Default for ScoreStore {
    fn default() -> Self {
        Self::at(data_dir().join(SCORE_FILE_NAME))
    }
}

impl ScoreStore {
    /// A store backed by the JSON file at `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the high score.
    ///
    /// Returns `Ok(0)` when the file does not exist yet (first run) and
    /// `Err` when it exists but cannot be read or parsed.
    pub fn load(&self) -> io::Result<u32> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        serde_json::from_str::<ScoreFile>(&raw)
            .map(|file| file.high_score)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Saves the high score, creating parent directories when needed.
    pub fn save(&self, score: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = ScoreFile { high_score: score };
        let json = serde_json::to_string_pretty(&payload)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

        fs::write(&self.path, json)
    }
}
