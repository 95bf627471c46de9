//! Fixed timestep simulation tick
//!
//! One call handles the menu command for the current phase, then advances
//! gameplay by `dt` when a run is in progress.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::movement::{self, Steering};
use super::progression;
use super::state::{GameEvent, GamePhase, GameSession, ReturnPhase};
use crate::menu::{self, MenuAction};

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire one player bullet
    pub fire: bool,
    /// Play / Play Again
    pub play: bool,
    /// Open the high score overlay
    pub high_scores: bool,
    pub back: bool,
    pub quit: bool,
    /// Mouse click in screen coordinates, resolved against the menu
    pub click: Option<Vec2>,
}

impl TickInput {
    pub fn steering(&self) -> Steering {
        Steering {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
        }
    }

    /// Menu command carried by this input. Flags win over a click.
    pub fn command(&self, phase: GamePhase, screen: Vec2) -> Option<MenuAction> {
        if self.quit {
            Some(MenuAction::Quit)
        } else if self.play {
            Some(MenuAction::Play)
        } else if self.high_scores {
            Some(MenuAction::HighScores)
        } else if self.back {
            Some(MenuAction::Back)
        } else {
            self.click.and_then(|p| menu::hit_test(phase, screen, p))
        }
    }
}

/// Apply a menu command. Returns true if the phase changed; commands that
/// mean nothing in the current phase are ignored.
pub fn apply_command(session: &mut GameSession, action: MenuAction) -> bool {
    let next = match (session.phase, action) {
        (GamePhase::Terminated, _) => None,
        (_, MenuAction::Quit) => Some(GamePhase::Terminated),
        (GamePhase::Start | GamePhase::GameOver, MenuAction::Play) => {
            session.reset_for_play();
            Some(GamePhase::Playing)
        }
        (GamePhase::Start, MenuAction::HighScores) => Some(GamePhase::HighScores {
            back_to: ReturnPhase::Start,
        }),
        (GamePhase::GameOver, MenuAction::HighScores) => Some(GamePhase::HighScores {
            back_to: ReturnPhase::GameOver,
        }),
        (GamePhase::GameOver, MenuAction::Back) => Some(GamePhase::Start),
        (GamePhase::HighScores { back_to }, MenuAction::Back) => Some(back_to.into()),
        _ => None,
    };

    match next {
        Some(phase) => {
            session.set_phase(phase);
            true
        }
        None => {
            log::trace!("Ignoring {action:?} in {}", session.phase.as_str());
            false
        }
    }
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    let screen = session.settings.screen();
    if let Some(action) = input.command(session.phase, screen) {
        if apply_command(session, action) {
            return;
        }
    }

    if session.phase != GamePhase::Playing {
        return;
    }
    session.time_ticks += 1;

    if session.is_paused() {
        session.pause_ms = (session.pause_ms - dt * 1000.0).max(0.0);
        return;
    }

    movement::update_ship(session, input.steering(), dt);
    if input.fire {
        movement::fire_player_bullet(session);
    }
    movement::update_bullets(session, dt);
    movement::update_aliens(session, dt);
    movement::update_alien_fire(session, dt);

    let hits = resolve_collisions(session);
    let points = session.settings.alien_points;
    for pos in hits.aliens_destroyed {
        session.stats.score = session.stats.score.saturating_add(points);
        session.push_event(GameEvent::AlienDestroyed { pos, points });
    }

    if hits.ship_hit {
        ship_hit(session);
        return;
    }

    progression::check_wave_cleared(session);
}

/// One life lost: end the run or reset the field
fn ship_hit(session: &mut GameSession) {
    session.stats.ships_left = session.stats.ships_left.saturating_sub(1);
    let ships_left = session.stats.ships_left;
    session.push_event(GameEvent::ShipHit { ships_left });

    if ships_left == 0 {
        let (score, wave) = (session.stats.score, session.stats.wave);
        log::info!("Game over: score {score}, wave {wave}");
        session.push_event(GameEvent::GameOver { score, wave });
        session.set_phase(GamePhase::GameOver);
    } else {
        log::info!("Ship hit, {ships_left} left");
        session.reset_after_hit();
    }
}
