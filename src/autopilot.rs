//! Attract-mode player
//!
//! Produces `TickInput`s from the current session: starts a run from the
//! menus, lines the ship up under the nearest alien and shoots, and side
//! steps enemy bullets that are about to land.

use crate::sim::state::{GamePhase, GameSession};
use crate::sim::tick::TickInput;

/// Horizontal slack before the ship bothers moving
const DEADZONE: f32 = 4.0;
/// How far above the ship an enemy bullet counts as incoming
const DANGER_HEIGHT: f32 = 160.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Minimum ticks between shots
    pub fire_interval: u32,
    /// Runs to start before handing control back; `None` plays forever
    pub runs_left: Option<u32>,
    cooldown: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(12)
    }
}

impl Autopilot {
    pub fn new(fire_interval: u32) -> Self {
        Self {
            fire_interval,
            runs_left: None,
            cooldown: 0,
        }
    }

    /// Play at most `runs` games, then quit from the menu
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs_left = Some(runs);
        self
    }

    pub fn next_input(&mut self, session: &GameSession) -> TickInput {
        match session.phase {
            GamePhase::Start | GamePhase::GameOver => self.menu_input(),
            GamePhase::HighScores { .. } => TickInput {
                back: true,
                ..Default::default()
            },
            GamePhase::Playing => self.play_input(session),
            GamePhase::Terminated => TickInput::default(),
        }
    }

    fn menu_input(&mut self) -> TickInput {
        match self.runs_left {
            Some(0) => TickInput {
                quit: true,
                ..Default::default()
            },
            Some(ref mut n) => {
                *n -= 1;
                TickInput {
                    play: true,
                    ..Default::default()
                }
            }
            None => TickInput {
                play: true,
                ..Default::default()
            },
        }
    }

    fn play_input(&mut self, session: &GameSession) -> TickInput {
        let mut input = TickInput::default();
        if session.is_paused() {
            return input;
        }
        let ship = session.ship.rect;
        let ship_x = ship.center().x;

        // Dodge first: move away from the closest bullet about to land
        let threat = session
            .enemy_bullets
            .iter_active()
            .map(|(_, b)| b.rect)
            .filter(|b| {
                b.bottom() <= ship.top() + ship.size.y / 2.0
                    && ship.top() - b.bottom() < DANGER_HEIGHT
                    && b.right() > ship.left() - DEADZONE
                    && b.left() < ship.right() + DEADZONE
            })
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));
        if let Some(bullet) = threat {
            let go_left = bullet.center().x >= ship_x;
            let blocked = if go_left {
                ship.left() <= 0.0
            } else {
                ship.right() >= session.settings.screen_width
            };
            input.left = go_left != blocked;
            input.right = !input.left;
            return input;
        }

        // Track the alien closest to the ship, leading slightly by its motion
        let target = session
            .aliens
            .iter_active()
            .map(|(_, a)| a.rect.center() + a.direction * a.speed * 0.25)
            .min_by(|a, b| {
                a.distance(ship.midtop())
                    .total_cmp(&b.distance(ship.midtop()))
            });

        if let Some(target) = target {
            // Small wobble so repeated runs do not look identical
            let t = session.time_ticks as f32 * 0.05;
            let dx = target.x + t.sin() * 6.0 - ship_x;
            input.right = dx > DEADZONE;
            input.left = dx < -DEADZONE;

            let aligned = dx.abs() < session.settings.alien_width / 2.0;
            if aligned && self.cooldown == 0 {
                input.fire = true;
                self.cooldown = self.fire_interval;
            }
        }
        self.cooldown = self.cooldown.saturating_sub(1);
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Bullet, BulletOwner};
    use crate::sim::tick::tick;
    use glam::Vec2;

    fn playing() -> GameSession {
        let mut session = GameSession::new(Settings::default(), 11);
        tick(
            &mut session,
            &TickInput {
                play: true,
                ..Default::default()
            },
            SIM_DT,
        );
        session
    }

    #[test]
    fn test_starts_and_quits_runs() {
        let session = GameSession::new(Settings::default(), 1);
        let mut pilot = Autopilot::default().with_runs(1);
        assert!(pilot.next_input(&session).play);
        assert!(pilot.next_input(&session).quit);
    }

    #[test]
    fn test_steers_toward_alien() {
        let mut session = playing();
        let ship_x = session.ship.rect.center().x;
        session.aliens.retain(|a| a.rect.center().x < ship_x - 200.0);
        let mut pilot = Autopilot::default();
        let input = pilot.next_input(&session);
        assert!(input.left && !input.right);
        assert!(!input.fire);
    }

    #[test]
    fn test_dodges_incoming_bullet() {
        let mut session = playing();
        let ship = session.ship.rect;
        let bullet = Bullet {
            rect: Rect::from_midbottom(
                Vec2::new(ship.center().x + 5.0, ship.top() - 20.0),
                Vec2::new(3.0, 15.0),
            ),
            vel: Vec2::new(0.0, 120.0),
            owner: BulletOwner::Enemy,
        };
        session.enemy_bullets.spawn(bullet);

        let input = Autopilot::default().next_input(&session);
        assert!(input.left && !input.right);
        assert!(!input.fire);
    }

    #[test]
    fn test_demo_run_scores() {
        let mut session = playing();
        let mut pilot = Autopilot::new(8);
        for _ in 0..(60 * 60) {
            let input = pilot.next_input(&session);
            tick(&mut session, &input, SIM_DT);
            if session.phase != GamePhase::Playing {
                break;
            }
        }
        assert!(session.stats.score > 0);
    }
}
