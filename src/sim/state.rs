//! Game state and core simulation types
//!
//! A `GameSession` owns everything one game needs: entities, stats, phase,
//! RNG and the per-tick event buffer. Nothing here is global, so several
//! sessions can run side by side.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::EntityPool;
use super::progression;
use super::rect::{PixelRect, Rect};
use crate::settings::Settings;

/// Menu screens the high score overlay can return to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnPhase {
    Start,
    GameOver,
}

impl From<ReturnPhase> for GamePhase {
    fn from(phase: ReturnPhase) -> Self {
        match phase {
            ReturnPhase::Start => GamePhase::Start,
            ReturnPhase::GameOver => GamePhase::GameOver,
        }
    }
}

/// Top-level phase. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for Play
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, simulation frozen until acknowledged
    GameOver,
    /// Leaderboard overlay
    HighScores { back_to: ReturnPhase },
    /// Quit requested; nothing else happens
    Terminated,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "Start",
            GamePhase::Playing => "Playing",
            GamePhase::GameOver => "GameOver",
            GamePhase::HighScores { .. } => "HighScores",
            GamePhase::Terminated => "Terminated",
        }
    }
}

/// Bullet allegiance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub rect: Rect,
}

impl Ship {
    pub fn new(settings: &Settings) -> Self {
        let mut ship = Self {
            rect: Rect::new(Vec2::ZERO, settings.ship_size()),
        };
        ship.center(settings);
        ship
    }

    /// Move to the bottom centre of the screen
    pub fn center(&mut self, settings: &Settings) {
        let midbottom = Vec2::new(settings.screen_width / 2.0, settings.screen_height);
        self.rect = Rect::from_midbottom(midbottom, settings.ship_size());
    }
}

/// One alien of the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub rect: Rect,
    /// Per-axis sign, each component is -1 or +1
    pub direction: Vec2,
    /// Per-axis speed in pixels per second (difficulty applied)
    pub speed: Vec2,
    /// Milliseconds until the next wander re-roll
    pub redirect_ms: f32,
    /// Milliseconds until this alien may fire
    pub shoot_ms: f32,
}

impl Alien {
    /// New alien at `pos` with fresh random direction, speed and timers
    pub fn new(pos: Vec2, settings: &Settings, multiplier: f32, rng: &mut impl Rng) -> Self {
        let mut sign = || if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let direction = Vec2::new(sign(), sign());
        let mut alien = Self {
            rect: Rect::new(pos, settings.alien_size()),
            direction,
            speed: Vec2::ZERO,
            redirect_ms: 0.0,
            shoot_ms: 0.0,
        };
        alien.roll_speed(settings, multiplier, rng);
        alien.roll_redirect(settings, rng);
        alien.roll_shoot_delay(settings, multiplier, rng);
        alien
    }

    /// Random speed, scaled by difficulty
    pub fn roll_speed(&mut self, settings: &Settings, multiplier: f32, rng: &mut impl Rng) {
        let base = settings.alien_speed * multiplier;
        self.speed = Vec2::new(
            base * rng.random_range(0.4f32..=0.7),
            base * rng.random_range(0.3f32..=0.5),
        );
    }

    pub fn roll_redirect(&mut self, settings: &Settings, rng: &mut impl Rng) {
        self.redirect_ms = rng.random_range(settings.redirect_range()) as f32;
    }

    /// Random cooldown, shortened by difficulty
    pub fn roll_shoot_delay(&mut self, settings: &Settings, multiplier: f32, rng: &mut impl Rng) {
        let base = rng.random_range(settings.shoot_delay_range()) as f32;
        self.shoot_ms = (base / multiplier).floor();
    }
}

/// A bullet from either side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub rect: Rect,
    /// Pixels per second, straight up or down
    pub vel: Vec2,
    pub owner: BulletOwner,
}

impl Bullet {
    /// Player bullet leaving the top of the ship
    pub fn player(ship: &Rect, settings: &Settings) -> Self {
        Self {
            rect: Rect::from_midtop(ship.midtop(), settings.bullet_size()),
            vel: Vec2::new(0.0, -settings.bullet_speed),
            owner: BulletOwner::Player,
        }
    }

    /// Enemy bullet dropping from the bottom of an alien
    pub fn enemy(alien: &Rect, settings: &Settings) -> Self {
        Self {
            rect: Rect::from_midbottom(alien.midbottom(), settings.alien_bullet_size()),
            vel: Vec2::new(0.0, settings.alien_bullet_speed),
            owner: BulletOwner::Enemy,
        }
    }
}

/// Score, lives and wave for the running session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u32,
    pub ships_left: u32,
    /// 1-based wave counter
    pub wave: u32,
    pub difficulty_multiplier: f32,
}

impl GameStats {
    pub fn new(settings: &Settings) -> Self {
        Self {
            score: 0,
            ships_left: settings.ship_limit,
            wave: 1,
            difficulty_multiplier: settings.difficulty_multiplier(1),
        }
    }
}

/// Something that happened during a tick, for audio, UI and persistence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    PlayerFired,
    AlienFired,
    AlienDestroyed { pos: Vec2, points: u32 },
    ShipHit { ships_left: u32 },
    /// Fleet cleared; `wave` is the new wave number
    WaveCleared { wave: u32 },
    GameOver { score: u32, wave: u32 },
    /// Final score entered the leaderboard (raised by the host, not the tick)
    HighScore { score: u32, rank: usize },
}

/// Read-only copy of everything a renderer draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub stats: GameStats,
    pub ship: PixelRect,
    pub aliens: Vec<PixelRect>,
    pub player_bullets: Vec<PixelRect>,
    pub enemy_bullets: Vec<PixelRect>,
}

/// One game, from Play to Game Over
#[derive(Debug, Clone)]
pub struct GameSession {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub stats: GameStats,
    pub ship: Ship,
    pub aliens: EntityPool<Alien>,
    pub player_bullets: EntityPool<Bullet>,
    pub enemy_bullets: EntityPool<Bullet>,
    /// Remaining freeze after losing a ship (ms)
    pub pause_ms: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Idle session on the title screen, seeded for reproducibility.
    ///
    /// `settings` are taken as given; run `Settings::validate` first, since
    /// empty random ranges panic once a fleet is rolled.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let stats = GameStats::new(&settings);
        let ship = Ship::new(&settings);
        let player_bullets = EntityPool::new(settings.bullets_allowed);
        let enemy_bullets = EntityPool::new(settings.alien_bullets_allowed);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            stats,
            ship,
            aliens: EntityPool::new(0),
            player_bullets,
            enemy_bullets,
            pause_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            settings,
        }
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        log::debug!("event: {event:?}");
        self.events.push(event);
    }

    /// Switch phase, recording the transition
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        self.phase = to;
        self.push_event(GameEvent::PhaseChanged { from, to });
    }

    /// Fresh stats, fleet and ship for a new run
    pub fn reset_for_play(&mut self) {
        self.stats = GameStats::new(&self.settings);
        self.pause_ms = 0.0;
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        progression::spawn_fleet(self);
        self.ship.center(&self.settings);
    }

    /// Clear the field after losing a ship and freeze briefly
    pub fn reset_after_hit(&mut self) {
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        progression::spawn_fleet(self);
        self.ship.center(&self.settings);
        self.pause_ms = self.settings.hit_pause_ms as f32;
    }

    pub fn is_paused(&self) -> bool {
        self.pause_ms > 0.0
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            stats: self.stats,
            ship: self.ship.rect.to_pixels(),
            aliens: self.aliens.iter_active().map(|(_, a)| a.rect.to_pixels()).collect(),
            player_bullets: self
                .player_bullets
                .iter_active()
                .map(|(_, b)| b.rect.to_pixels())
                .collect(),
            enemy_bullets: self
                .enemy_bullets
                .iter_active()
                .map(|(_, b)| b.rect.to_pixels())
                .collect(),
        }
    }
}
