//! High score leaderboard and its persisted store
//!
//! The table keeps the top 10 scores, highest first. On disk it is a bare
//! JSON array of integers in `high_scores.json`, read whole and rewritten
//! whole. Persistence problems are logged and never reach gameplay.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;

use crate::consts::HIGH_SCORE_FILE;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// High score leaderboard, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HighScores {
    scores: Vec<u32>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from arbitrary scores, keeping the best 10
    pub fn from_scores(mut scores: Vec<u32>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { scores }
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if a score would make the table
    pub fn qualifies(&self, score: u32) -> bool {
        if self.scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.scores.last().is_none_or(|&lowest| score > lowest)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let pos = self.scores.iter().position(|&s| score > s);
        Some(pos.unwrap_or(self.scores.len()) + 1)
    }

    /// Add a score if it qualifies.
    /// Returns the rank achieved (1-indexed) or None if it didn't.
    pub fn add_score(&mut self, score: u32) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.scores.insert(rank - 1, score);
        self.scores.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.scores.first().copied()
    }
}

/// Failure reading or writing the score file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed high score file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Where the leaderboard lives.
///
/// Both calls are infallible for the caller: implementations log and fall
/// back to an empty table.
pub trait ScoreStore: Send + Sync {
    /// Current table
    fn load(&self) -> HighScores;

    /// Insert `score` if it ranks and persist. Returns the updated table.
    fn save_score(&self, score: u32) -> HighScores;
}

/// JSON file store
#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
    /// Held across read-modify-write
    lock: Mutex<()>,
}

impl FileScoreStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store for `high_scores.json` inside `dir`, creating the directory.
    ///
    /// Fails when the directory cannot be created or the file exists but
    /// cannot be read.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        if !dir.is_dir() {
            return Err(StoreError::NotADirectory(dir.to_path_buf()));
        }

        let store = Self::new(dir.join(HIGH_SCORE_FILE));
        match store.read() {
            Ok(table) => log::info!(
                "High score store at {} ({} entries)",
                store.path.display(),
                table.len()
            ),
            Err(StoreError::Parse { .. }) => {
                log::warn!("Ignoring malformed {}", store.path.display())
            }
            Err(e) => return Err(e),
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table. A missing file is an empty table.
    pub fn read(&self) -> Result<HighScores, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HighScores::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if json.trim().is_empty() {
            return Ok(HighScores::new());
        }
        let scores: Vec<u32> = serde_json::from_str(&json).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(HighScores::from_scores(scores))
    }

    /// Replace the file with `table`
    pub fn write(&self, table: &HighScores) -> Result<(), StoreError> {
        let json = serde_json::to_string(table).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn read_or_empty(&self) -> HighScores {
        self.read().unwrap_or_else(|e| {
            log::warn!("{e}; starting with an empty table");
            HighScores::new()
        })
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> HighScores {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let table = self.read_or_empty();
        log::info!("Loaded {} high scores", table.len());
        table
    }

    fn save_score(&self, score: u32) -> HighScores {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut table = self.read_or_empty();
        match table.add_score(score) {
            Some(rank) => match self.write(&table) {
                Ok(()) => log::info!("Saved high score {score} at rank {rank}"),
                Err(e) => log::error!("Failed to save high score {score}: {e}"),
            },
            None => log::debug!("Score {score} does not make the table"),
        }
        table
    }
}

/// In-process store, for tests and hosts without a disk
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    table: Mutex<HighScores>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(scores: Vec<u32>) -> Self {
        Self {
            table: Mutex::new(HighScores::from_scores(scores)),
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> HighScores {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save_score(&self, score: u32) -> HighScores {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.add_score(score);
        table.clone()
    }
}
