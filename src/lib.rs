//! Alien Invasion - player ship vs. alien fleet
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, movement, collisions, game state)
//! - `highscores`: Top 10 leaderboard and its persisted store
//! - `settings`: Data-driven game balance and screen configuration
//! - `menu`: Button layout and pointer hit-testing
//! - `game`: Session host wiring the simulation to the score store
//! - `audio`: Sound cues from game events, played on a worker thread
//! - `autopilot`: Attract-mode input generator
//! - `bridge`: Command/query surface (and C ABI) for foreign hosts

pub mod audio;
pub mod autopilot;
pub mod bridge;
pub mod game;
pub mod highscores;
pub mod menu;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::{FileScoreStore, HighScores, MemoryScoreStore, ScoreStore};
pub use settings::{DifficultyCurve, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Hard cap on fleet size (also the bridge's alien snapshot bound)
    pub const MAX_ALIENS: usize = 50;
    /// Bound on bullet records returned across the bridge
    pub const MAX_BULLET_RECORDS: usize = 100;

    /// Well-known name of the persisted leaderboard
    pub const HIGH_SCORE_FILE: &str = "high_scores.json";
}
