//! High scores stored as a small JSON document
//!
//! The file holds one integer per mode, keyed by mode name:
//!
//! ```json
//! { "classic": 120, "obstacles": 40 }
//! ```
//!
//! Every save re-reads the file and keeps the larger value per mode, so a
//! second store on the same file can never lower a record. Writes go to a
//! temporary file that is renamed over the old one. A file that cannot be
//! parsed is moved aside to `<name>.bak` before it is replaced.
//!
//! Read and write failures never reach the game. They are logged and the
//! store carries on with what it has in memory.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::{GameMode, ScoreStore};

#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed score file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw file contents. Keys other than the mode keys are carried through
/// untouched, and a mode whose value is not a valid score reads as 0 without
/// affecting the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
struct ScoreFile {
    entries: Map<String, Value>,
}

impl ScoreFile {
    fn get(&self, mode: GameMode) -> u32 {
        self.entries
            .get(mode.key())
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0)
    }

    /// Store `value` for `mode` if it beats the current one
    fn raise(&mut self, mode: GameMode, value: u32) -> bool {
        let current = self.get(mode);
        self.entries
            .insert(mode.key().to_string(), Value::from(value.max(current)));
        value > current
    }
}

/// Per-user location of the score file.
///
/// `$XDG_DATA_HOME/metal_snake`, then `~/.local/share/metal_snake`, then the
/// working directory.
pub fn default_scores_path() -> PathBuf {
    data_dir().join("highscores.json")
}

/// Per-user application data directory
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_DATA_HOME").filter(|d| !d.is_empty()) {
        return PathBuf::from(dir).join("metal_snake");
    }
    if let Some(home) = std::env::var_os("HOME").filter(|h| !h.is_empty()) {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("metal_snake");
    }
    PathBuf::from(".")
}

pub struct JsonScoreStore {
    path: PathBuf,
    scores: ScoreFile,
}

impl JsonScoreStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match read_scores(&path) {
            Ok(Some(scores)) => {
                info!("Loaded high scores from {:?}", path);
                scores
            }
            Ok(None) => ScoreFile::default(),
            Err(err) => {
                warn!("Ignoring high scores: {}", err);
                ScoreFile::default()
            }
        };
        Self { path, scores }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file contents merged with what this store already knows.
    /// `None` when the file can't be read, so it must not be overwritten.
    fn refresh(&self) -> Option<ScoreFile> {
        let mut latest = match read_scores(&self.path) {
            Ok(found) => found.unwrap_or_default(),
            Err(err @ ScoreStoreError::Parse { .. }) => {
                warn!("{}", err);
                let backup = backup_path(&self.path);
                if let Err(source) = std::fs::rename(&self.path, &backup) {
                    warn!("Could not move {:?} aside: {}", self.path, source);
                    return None;
                }
                warn!("Moved unreadable score file to {:?}", backup);
                ScoreFile::default()
            }
            Err(err) => {
                warn!("{}", err);
                return None;
            }
        };
        for mode in GameMode::ALL {
            latest.raise(mode, self.scores.get(mode));
        }
        Some(latest)
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self, mode: GameMode) -> u32 {
        self.scores.get(mode)
    }

    fn save(&mut self, mode: GameMode, value: u32) -> bool {
        let Some(latest) = self.refresh() else {
            warn!("High score kept in memory only");
            return self.scores.raise(mode, value);
        };
        self.scores = latest;

        if !self.scores.raise(mode, value) {
            return false;
        }
        match write_scores(&self.path, &self.scores) {
            Ok(()) => info!("New {} high score {} saved", mode.key(), value),
            Err(err) => warn!("High score kept in memory only: {}", err),
        }
        true
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

fn read_scores(path: &Path) -> Result<Option<ScoreFile>, ScoreStoreError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ScoreStoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| ScoreStoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Replace the file in one rename so readers see the old or the new scores
fn write_scores(path: &Path, scores: &ScoreFile) -> Result<(), ScoreStoreError> {
    let io_err = |source: std::io::Error| ScoreStoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let json = serde_json::to_string_pretty(scores).map_err(|source| ScoreStoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(json.as_bytes()).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_starts_at_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscores.json");
        let store = JsonScoreStore::open(&path);

        assert_eq!(store.path(), path);
        assert_eq!(store.load(GameMode::Classic), 0);
        assert_eq!(store.load(GameMode::Obstacle), 0);
    }

    #[test]
    fn test_scores_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("highscores.json");

        let mut store = JsonScoreStore::open(&path);
        assert!(store.save(GameMode::Classic, 120));
        assert!(store.save(GameMode::Obstacle, 40));

        let reopened = JsonScoreStore::open(&path);
        assert_eq!(reopened.load(GameMode::Classic), 120);
        assert_eq!(reopened.load(GameMode::Obstacle), 40);
    }

    #[test]
    fn test_lower_score_leaves_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscores.json");

        let mut store = JsonScoreStore::open(&path);
        store.save(GameMode::Classic, 100);
        assert!(store.save(GameMode::Classic, 120));
        assert!(!store.save(GameMode::Classic, 80));

        let reopened = JsonScoreStore::open(&path);
        assert_eq!(reopened.load(GameMode::Classic), 120);
    }

    #[test]
    fn test_file_format_is_keyed_by_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscores.json");

        let mut store = JsonScoreStore::open(&path);
        store.save(GameMode::Obstacle, 7);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["obstacles"], 7);
        assert_eq!(value["classic"], 0);
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscores.json");
        std::fs::write(&path, "not json").unwrap();

        let mut store = JsonScoreStore::open(&path);
        assert_eq!(store.load(GameMode::Classic), 0);

        // Saving moves the broken file aside before replacing it
        assert!(store.save(GameMode::Classic, 5));
        assert_eq!(JsonScoreStore::open(&path).load(GameMode::Classic), 5);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("highscores.json.bak")).unwrap(),
            "not json"
        );
    }

    #[test]
    fn test_second_store_cannot_lower_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscores.json");
        std::fs::write(&path, r#"{"classic": 100}"#).unwrap();

        let mut first = JsonScoreStore::open(&path);
        let mut second = JsonScoreStore::open(&path);

        assert!(first.save(GameMode::Classic, 150));
        assert!(!second.save(GameMode::Classic, 120));
        assert_eq!(second.load(GameMode::Classic), 150);
        assert_eq!(JsonScoreStore::open(&path).load(GameMode::Classic), 150);
    }

    #[test]
    fn test_bad_value_leaves_other_mode_intact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscores.json");
        std::fs::write(&path, r#"{"classic": 120, "obstacles": -1}"#).unwrap();

        let mut store = JsonScoreStore::open(&path);
        assert_eq!(store.load(GameMode::Classic), 120);
        assert_eq!(store.load(GameMode::Obstacle), 0);

        assert!(store.save(GameMode::Obstacle, 5));
        let reopened = JsonScoreStore::open(&path);
        assert_eq!(reopened.load(GameMode::Classic), 120);
        assert_eq!(reopened.load(GameMode::Obstacle), 5);
    }

    #[test]
    fn test_save_keeps_unknown_keys_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscores.json");
        std::fs::write(&path, r#"{"classic": 33, "legacy": [1, 2]}"#).unwrap();

        let mut store = JsonScoreStore::open(&path);
        assert!(store.save(GameMode::Obstacle, 4));

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["legacy"], serde_json::json!([1, 2]));
        assert_eq!(value["classic"], 33);
        assert_eq!(value["obstacles"], 4);

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_partial_file_defaults_missing_modes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscores.json");
        std::fs::write(&path, r#"{"classic": 33, "legacy": [1, 2]}"#).unwrap();

        let store = JsonScoreStore::open(&path);
        assert_eq!(store.load(GameMode::Classic), 33);
        assert_eq!(store.load(GameMode::Obstacle), 0);
    }

    #[test]
    fn test_unwritable_path_keeps_memory_score() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let mut store = JsonScoreStore::open(blocker.join("highscores.json"));
        assert!(store.save(GameMode::Classic, 12));
        assert_eq!(store.load(GameMode::Classic), 12);
    }
}
