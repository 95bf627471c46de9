//! Command/query surface for foreign hosts
//!
//! `NativeGame` owns the only copy of the simulation. A host sends
//! commands, advances time with `tick`, and reads value snapshots back every
//! frame; nothing it holds is ever written back. A run that ends with a
//! positive score is persisted by `tick` itself. `ffi` exposes the same
//! surface over the C ABI.

pub mod ffi;

use std::path::Path;

use thiserror::Error;

use crate::consts::{MAX_ALIENS, MAX_BULLET_RECORDS, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{FileScoreStore, ScoreStore, StoreError};
use crate::settings::{Settings, SettingsError};
use crate::sim::movement::{self, Steering};
use crate::sim::progression;
use crate::sim::state::{BulletOwner, GameEvent, GamePhase, GameSession};
use crate::sim::tick::{TickInput, tick};

/// How close a reported hit must be to an alien's corner, per axis
pub const HIT_REPORT_RADIUS: f32 = 30.0;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("score store unavailable: {0}")]
    Store(#[from] StoreError),
}

/// Ship and score summary
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStateSnapshot {
    pub player_x: i32,
    pub player_y: i32,
    /// Ships left
    pub player_health: i32,
    pub score: i32,
    pub game_active: bool,
    pub game_over: bool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlienRecord {
    pub x: i32,
    pub y: i32,
    pub active: bool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulletRecord {
    pub x: i32,
    pub y: i32,
    pub is_player: bool,
    pub active: bool,
}

fn saturate(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

pub struct NativeGame {
    session: GameSession,
    store: Box<dyn ScoreStore>,
    steering: Steering,
    accumulator: f32,
}

impl NativeGame {
    /// Bridge over an existing store. Fails on unusable settings.
    pub fn new(
        settings: Settings,
        store: Box<dyn ScoreStore>,
        seed: u64,
    ) -> Result<Self, BridgeError> {
        settings.validate()?;
        log::info!("Native bridge ready (seed {seed})");
        Ok(Self {
            session: GameSession::new(settings, seed),
            store,
            steering: Steering::default(),
            accumulator: 0.0,
        })
    }

    /// Bridge persisting high scores in `dir`
    pub fn open(dir: impl AsRef<Path>, settings: Settings, seed: u64) -> Result<Self, BridgeError> {
        let store = FileScoreStore::open(dir)?;
        Self::new(settings, Box::new(store), seed)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Begin a fresh run from any screen except after Quit
    pub fn start_game(&mut self) {
        if self.session.phase == GamePhase::Terminated {
            log::warn!("start_game ignored: session has quit");
            return;
        }
        self.session.reset_for_play();
        self.session.set_phase(GamePhase::Playing);
        self.accumulator = 0.0;
    }

    /// Held movement flags, replaced wholesale on every call
    pub fn update_player_movement(&mut self, left: bool, right: bool, up: bool, down: bool) {
        self.steering = Steering {
            left,
            right,
            up,
            down,
        };
    }

    /// Spawn a player bullet now. False when not playing or the pool is full.
    pub fn fire_player_bullet(&mut self) -> bool {
        if self.session.phase != GamePhase::Playing || self.session.is_paused() {
            return false;
        }
        movement::fire_player_bullet(&mut self.session)
    }

    /// A host-side report that the alien at `(x, y)` was hit.
    ///
    /// Only honoured while an active alien within `HIT_REPORT_RADIUS` of
    /// `(x, y)` still overlaps an active player bullet, so reporting a hit
    /// the tick already resolved scores nothing.
    pub fn handle_alien_hit(&mut self, x: i32, y: i32) -> bool {
        if self.session.phase != GamePhase::Playing {
            return false;
        }
        let (x, y) = (x as f32, y as f32);
        let session = &mut self.session;

        let hit = session.aliens.iter_active().find_map(|(handle, alien)| {
            let near = (alien.rect.pos.x - x).abs() < HIT_REPORT_RADIUS
                && (alien.rect.pos.y - y).abs() < HIT_REPORT_RADIUS;
            let struck = session
                .player_bullets
                .iter_active()
                .any(|(_, b)| b.rect.intersects(&alien.rect));
            (near && struck).then_some((handle, alien.rect))
        });
        let Some((handle, rect)) = hit else {
            log::debug!("Ignoring stale hit report at ({x}, {y})");
            return false;
        };

        session.aliens.despawn(handle);
        session.player_bullets.retain(|b| !b.rect.intersects(&rect));
        let points = session.settings.alien_points;
        session.stats.score = session.stats.score.saturating_add(points);
        session.push_event(GameEvent::AlienDestroyed {
            pos: rect.center(),
            points,
        });
        true
    }

    /// Skip to the next wave
    pub fn advance_level(&mut self) {
        if self.session.phase == GamePhase::Playing {
            progression::advance_wave(&mut self.session);
        }
    }

    /// Advance by `dt` seconds in fixed steps. Returns the events produced.
    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        if !dt.is_finite() || dt <= 0.0 {
            return Vec::new();
        }
        self.accumulator += dt.min(0.1);

        let input = TickInput {
            left: self.steering.left,
            right: self.steering.right,
            up: self.steering.up,
            down: self.steering.down,
            ..Default::default()
        };
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.session, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        let events = self.session.drain_events();
        for event in &events {
            if let GameEvent::GameOver { score, wave } = *event {
                self.record_score(score, wave);
            }
        }
        events
    }

    fn record_score(&mut self, score: u32, wave: u32) {
        if score == 0 {
            log::info!("Run ended on wave {wave} without points; nothing to record");
            return;
        }
        let table = self.store.save_score(score);
        log::info!(
            "Recorded score {score} (wave {wave}); best is {}",
            table.top_score().unwrap_or(score)
        );
    }

    /// Insert `score` into the persisted table. Returns the updated table.
    ///
    /// Finished runs are already recorded by `tick`; this is for scores
    /// the host keeps on its own.
    pub fn save_high_score(&mut self, score: u32) -> Vec<u32> {
        self.store.save_score(score).scores().to_vec()
    }

    pub fn load_high_scores(&self) -> Vec<u32> {
        self.store.load().scores().to_vec()
    }

    pub fn game_state(&self) -> GameStateSnapshot {
        let session = &self.session;
        let ship = session.ship.rect.to_pixels();
        GameStateSnapshot {
            player_x: ship.x,
            player_y: ship.y,
            player_health: saturate(session.stats.ships_left),
            score: saturate(session.stats.score),
            game_active: session.phase == GamePhase::Playing,
            game_over: session.phase == GamePhase::GameOver,
        }
    }

    /// Current wave, 1-based
    pub fn level(&self) -> u32 {
        self.session.stats.wave
    }

    /// Active aliens, at most `MAX_ALIENS`
    pub fn alien_positions(&self) -> Vec<AlienRecord> {
        self.session
            .aliens
            .iter_active()
            .take(MAX_ALIENS)
            .map(|(_, a)| {
                let px = a.rect.to_pixels();
                AlienRecord {
                    x: px.x,
                    y: px.y,
                    active: true,
                }
            })
            .collect()
    }

    /// Active bullets, player first, at most `MAX_BULLET_RECORDS`
    pub fn bullet_positions(&self) -> Vec<BulletRecord> {
        let session = &self.session;
        session
            .player_bullets
            .iter_active()
            .chain(session.enemy_bullets.iter_active())
            .take(MAX_BULLET_RECORDS)
            .map(|(_, b)| {
                let px = b.rect.to_pixels();
                BulletRecord {
                    x: px.x,
                    y: px.y,
                    is_player: b.owner == BulletOwner::Player,
                    active: true,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryScoreStore;
    use crate::sim::rect::Rect;
    use crate::sim::state::Bullet;
    use glam::Vec2;

    fn bridge() -> NativeGame {
        NativeGame::new(
            Settings::default(),
            Box::new(MemoryScoreStore::new()),
            21,
        )
        .unwrap()
    }

    /// Park a player bullet inside the first alien, returning its corner
    fn bullet_in_first_alien(game: &mut NativeGame) -> (i32, i32) {
        let rect = game
            .session
            .aliens
            .iter_active()
            .next()
            .map(|(_, a)| a.rect)
            .unwrap();
        game.session.player_bullets.spawn(Bullet {
            rect: Rect::from_center(rect.center(), Vec2::new(3.0, 15.0)),
            vel: Vec2::new(0.0, -150.0),
            owner: BulletOwner::Player,
        });
        let px = rect.to_pixels();
        (px.x, px.y)
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let settings = Settings {
            bullets_allowed: 0,
            ..Default::default()
        };
        let result = NativeGame::new(settings, Box::new(MemoryScoreStore::new()), 1);
        assert!(matches!(result, Err(BridgeError::Settings(_))));
    }

    #[test]
    fn test_start_game_snapshot() {
        let mut game = bridge();
        assert!(!game.game_state().game_active);

        game.start_game();
        let state = game.game_state();
        assert!(state.game_active && !state.game_over);
        assert_eq!(state.player_health, 3);
        assert_eq!(state.score, 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.alien_positions().len(), 35);
        assert!(game.bullet_positions().is_empty());
    }

    #[test]
    fn test_movement_flags_are_held() {
        let mut game = bridge();
        game.start_game();
        let x = game.game_state().player_x;
        game.update_player_movement(true, false, false, false);
        game.tick(SIM_DT * 10.5);
        assert!(game.game_state().player_x < x);

        game.update_player_movement(false, false, false, false);
        let x = game.game_state().player_x;
        game.tick(SIM_DT * 10.0);
        assert_eq!(game.game_state().player_x, x);
    }

    #[test]
    fn test_fire_respects_pool() {
        let mut game = bridge();
        assert!(!game.fire_player_bullet());
        game.start_game();
        for _ in 0..3 {
            assert!(game.fire_player_bullet());
        }
        assert!(!game.fire_player_bullet());
        let bullets = game.bullet_positions();
        assert_eq!(bullets.len(), 3);
        assert!(bullets.iter().all(|b| b.is_player && b.active));
    }

    #[test]
    fn test_hit_report_is_idempotent() {
        let mut game = bridge();
        game.start_game();
        let (x, y) = bullet_in_first_alien(&mut game);

        assert!(game.handle_alien_hit(x + 5, y - 5));
        assert_eq!(game.game_state().score, 10);
        assert_eq!(game.alien_positions().len(), 34);
        assert!(game.bullet_positions().is_empty());

        // Same report again, or after the native pass, scores nothing
        assert!(!game.handle_alien_hit(x, y));
        assert_eq!(game.game_state().score, 10);
    }

    #[test]
    fn test_hit_report_after_native_resolution() {
        let mut game = bridge();
        game.start_game();
        let (x, y) = bullet_in_first_alien(&mut game);
        game.tick(SIM_DT);
        assert_eq!(game.game_state().score, 10);

        assert!(!game.handle_alien_hit(x, y));
        assert_eq!(game.game_state().score, 10);
    }

    #[test]
    fn test_hit_report_needs_a_bullet() {
        let mut game = bridge();
        game.start_game();
        let first = game.alien_positions()[0];
        assert!(!game.handle_alien_hit(first.x, first.y));
        assert_eq!(game.alien_positions().len(), 35);
    }

    #[test]
    fn test_advance_level() {
        let mut game = bridge();
        game.advance_level();
        assert_eq!(game.level(), 1);

        game.start_game();
        game.fire_player_bullet();
        game.advance_level();
        assert_eq!(game.level(), 2);
        assert!(game.bullet_positions().is_empty());
        assert_eq!(game.alien_positions().len(), 35);
    }

    /// Put an enemy bullet on the ship with one life left
    fn lose_last_ship(game: &mut NativeGame, score: u32) -> Vec<GameEvent> {
        let session = &mut game.session;
        session.stats.ships_left = 1;
        session.stats.score = score;
        session.enemy_bullets.spawn(Bullet {
            rect: Rect::from_center(session.ship.rect.center(), Vec2::new(3.0, 15.0)),
            vel: Vec2::new(0.0, 120.0),
            owner: BulletOwner::Enemy,
        });
        game.tick(SIM_DT)
    }

    #[test]
    fn test_game_over_is_recorded_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = NativeGame::open(dir.path(), Settings::default(), 4).unwrap();
        game.start_game();

        let events = lose_last_ship(&mut game, 600);
        assert!(events.contains(&GameEvent::GameOver { score: 600, wave: 1 }));
        assert!(game.game_state().game_over);
        assert_eq!(game.load_high_scores(), vec![600]);

        // Further ticks on the game over screen record nothing new
        game.tick(SIM_DT * 30.0);
        assert_eq!(game.load_high_scores(), vec![600]);

        let reopened = NativeGame::open(dir.path(), Settings::default(), 5).unwrap();
        assert_eq!(reopened.load_high_scores(), vec![600]);
    }

    #[test]
    fn test_pointless_run_is_not_recorded() {
        let mut game = bridge();
        game.start_game();
        lose_last_ship(&mut game, 0);
        assert!(game.game_state().game_over);
        assert!(game.load_high_scores().is_empty());
    }

    #[test]
    fn test_start_game_after_quit_is_ignored() {
        let mut game = bridge();
        game.session.set_phase(GamePhase::Terminated);
        game.start_game();
        assert_eq!(game.session().phase, GamePhase::Terminated);
        assert!(!game.game_state().game_active);
        assert!(game.alien_positions().is_empty());
    }

    #[test]
    fn test_high_score_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = NativeGame::open(dir.path(), Settings::default(), 3).unwrap();
        assert!(game.load_high_scores().is_empty());
        game.save_high_score(250);
        game.save_high_score(90);
        assert_eq!(game.load_high_scores(), vec![250, 90]);
    }

    #[test]
    fn test_bad_store_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scores");
        std::fs::write(&file, "").unwrap();
        let result = NativeGame::open(&file, Settings::default(), 3);
        assert!(matches!(result, Err(BridgeError::Store(_))));
    }
}
