//! Game settings and balance
//!
//! Loaded from a JSON file next to the game; missing or malformed files fall
//! back to the defaults, which reproduce the classic tuning.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the difficulty multiplier grows with the wave number.
///
/// Drives alien speed, alien shoot cooldown and the
/// `GameStats::difficulty_multiplier` shown to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyCurve {
    /// `1 + (wave - 1) * step`: wave 1 plays at base difficulty
    #[default]
    FromFirstWave,
    /// `1 + wave * step`: wave 1 is already one step harder
    FromWaveZero,
}

impl DifficultyCurve {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyCurve::FromFirstWave => "FromFirstWave",
            DifficultyCurve::FromWaveZero => "FromWaveZero",
        }
    }

    /// Multiplier for a 1-based wave number
    pub fn multiplier(&self, wave: u32, step: f32) -> f32 {
        let steps = match self {
            DifficultyCurve::FromFirstWave => wave.saturating_sub(1),
            DifficultyCurve::FromWaveZero => wave,
        };
        1.0 + steps as f32 * step
    }
}

/// Rejected configuration
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("screen must be at least {min_w}x{min_h}, got {width}x{height}")]
    ScreenTooSmall {
        width: f32,
        height: f32,
        min_w: f32,
        min_h: f32,
    },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} pool capacity must be at least 1")]
    EmptyPool { name: &'static str },
    #[error("ship_limit must be at least 1")]
    NoShips,
    #[error("{name} range is empty ({lo}..={hi})")]
    EmptyRange { name: &'static str, lo: u32, hi: u32 },
    #[error("{name} must be a probability in [0, 1], got {value}")]
    BadProbability { name: &'static str, value: f32 },
    #[error("alien_field_fraction must be in (0, 1], got {0}")]
    BadFieldFraction(f32),
    #[error("fleet layout for {width}x{height} screen fits no aliens")]
    EmptyFleet { width: f32, height: f32 },
}

/// All tunables. Speeds are pixels per second, timers are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Ship ===
    pub ship_width: f32,
    pub ship_height: f32,
    pub ship_speed: f32,
    pub ship_vertical_speed: f32,
    /// Allow up/down movement
    pub vertical_movement: bool,
    /// Lives per session
    pub ship_limit: u32,

    // === Player bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    /// Maximum player bullets in flight
    pub bullets_allowed: usize,

    // === Alien bullets ===
    pub alien_bullet_width: f32,
    pub alien_bullet_height: f32,
    pub alien_bullet_speed: f32,
    /// Maximum enemy bullets in flight
    pub alien_bullets_allowed: usize,
    pub alien_shoot_delay_ms: (u32, u32),

    // === Aliens ===
    pub alien_width: f32,
    pub alien_height: f32,
    /// Base speed before the random factor and difficulty
    pub alien_speed: f32,
    pub alien_points: u32,
    pub alien_redirect_ms: (u32, u32),
    pub alien_flip_chance: f32,
    pub alien_reroll_chance: f32,
    /// Aliens wander within this top fraction of the screen
    pub alien_field_fraction: f32,

    // === Fleet ===
    /// Horizontal grid step in alien widths
    pub fleet_spacing_x: f32,
    /// Vertical grid step in alien heights
    pub fleet_spacing_y: f32,

    // === Difficulty ===
    pub difficulty: DifficultyCurve,
    pub difficulty_step: f32,

    // === Flow ===
    /// Freeze after losing a ship
    pub hit_pause_ms: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 1200.0,
            screen_height: 800.0,

            ship_width: 45.0,
            ship_height: 65.0,
            ship_speed: 90.0,
            ship_vertical_speed: 72.0,
            vertical_movement: true,
            ship_limit: 3,

            bullet_width: 3.0,
            bullet_height: 15.0,
            bullet_speed: 150.0,
            bullets_allowed: 3,

            alien_bullet_width: 3.0,
            alien_bullet_height: 15.0,
            alien_bullet_speed: 120.0,
            alien_bullets_allowed: 5,
            alien_shoot_delay_ms: (800, 2000),

            alien_width: 75.0,
            alien_height: 50.0,
            alien_speed: 150.0,
            alien_points: 10,
            alien_redirect_ms: (1000, 3000),
            alien_flip_chance: 0.3,
            alien_reroll_chance: 0.2,
            alien_field_fraction: 2.0 / 3.0,

            fleet_spacing_x: 2.0,
            fleet_spacing_y: 2.0,

            difficulty: DifficultyCurve::FromFirstWave,
            difficulty_step: 0.1,

            hit_pause_ms: 500,

            master_volume: 0.8,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    pub fn screen(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    pub fn ship_size(&self) -> Vec2 {
        Vec2::new(self.ship_width, self.ship_height)
    }

    pub fn alien_size(&self) -> Vec2 {
        Vec2::new(self.alien_width, self.alien_height)
    }

    pub fn bullet_size(&self) -> Vec2 {
        Vec2::new(self.bullet_width, self.bullet_height)
    }

    pub fn alien_bullet_size(&self) -> Vec2 {
        Vec2::new(self.alien_bullet_width, self.alien_bullet_height)
    }

    /// Lower edge of the band aliens wander in
    pub fn alien_field_bottom(&self) -> f32 {
        self.screen_height * self.alien_field_fraction
    }

    pub fn difficulty_multiplier(&self, wave: u32) -> f32 {
        self.difficulty.multiplier(wave, self.difficulty_step)
    }

    pub fn redirect_range(&self) -> RangeInclusive<u32> {
        self.alien_redirect_ms.0..=self.alien_redirect_ms.1
    }

    pub fn shoot_delay_range(&self) -> RangeInclusive<u32> {
        self.alien_shoot_delay_ms.0..=self.alien_shoot_delay_ms.1
    }

    /// Check that a session can actually be built from these values
    pub fn validate(&self) -> Result<(), SettingsError> {
        let min_w = self.alien_width * 3.0;
        let min_h = self.alien_height * 4.0;
        if self.screen_width < min_w || self.screen_height < min_h {
            return Err(SettingsError::ScreenTooSmall {
                width: self.screen_width,
                height: self.screen_height,
                min_w,
                min_h,
            });
        }

        let positive = [
            ("ship_width", self.ship_width),
            ("ship_height", self.ship_height),
            ("ship_speed", self.ship_speed),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("bullet_speed", self.bullet_speed),
            ("alien_bullet_width", self.alien_bullet_width),
            ("alien_bullet_height", self.alien_bullet_height),
            ("alien_bullet_speed", self.alien_bullet_speed),
            ("alien_width", self.alien_width),
            ("alien_height", self.alien_height),
            ("alien_speed", self.alien_speed),
            ("fleet_spacing_x", self.fleet_spacing_x),
            ("fleet_spacing_y", self.fleet_spacing_y),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(SettingsError::NonPositive { name, value });
            }
        }
        if self.difficulty_step < 0.0 || self.difficulty_step.is_nan() {
            return Err(SettingsError::NonPositive {
                name: "difficulty_step",
                value: self.difficulty_step,
            });
        }

        if self.bullets_allowed == 0 {
            return Err(SettingsError::EmptyPool { name: "player bullet" });
        }
        if self.alien_bullets_allowed == 0 {
            return Err(SettingsError::EmptyPool { name: "alien bullet" });
        }
        if self.ship_limit == 0 {
            return Err(SettingsError::NoShips);
        }

        for (name, (lo, hi)) in [
            ("alien_redirect_ms", self.alien_redirect_ms),
            ("alien_shoot_delay_ms", self.alien_shoot_delay_ms),
        ] {
            if lo > hi {
                return Err(SettingsError::EmptyRange { name, lo, hi });
            }
        }

        for (name, value) in [
            ("alien_flip_chance", self.alien_flip_chance),
            ("alien_reroll_chance", self.alien_reroll_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::BadProbability { name, value });
            }
        }

        let fraction = self.alien_field_fraction;
        if fraction.is_nan() || fraction <= 0.0 || fraction > 1.0 {
            return Err(SettingsError::BadFieldFraction(self.alien_field_fraction));
        }

        if crate::sim::progression::fleet_layout(self).is_empty() {
            return Err(SettingsError::EmptyFleet {
                width: self.screen_width,
                height: self.screen_height,
            });
        }

        Ok(())
    }

    /// Settings file name used by the demo binary
    pub const FILE_NAME: &'static str = "settings.json";

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Malformed settings in {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::error!("Failed to write {}: {e}", path.display()),
            },
            Err(e) => log::error!("Failed to encode settings: {e}"),
        }
    }
}
