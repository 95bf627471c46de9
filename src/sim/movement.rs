//! Per-entity motion rules and firing
//!
//! Everything advances by `dt` seconds. Timers count down in milliseconds.

use glam::Vec2;
use rand::Rng;

use super::state::{Alien, Bullet, GameEvent, GameSession};

/// Held directional intents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Move the ship while a direction is held, never leaving the screen
pub fn update_ship(session: &mut GameSession, steer: Steering, dt: f32) {
    let settings = &session.settings;
    let rect = &mut session.ship.rect;

    if steer.right && rect.right() < settings.screen_width {
        rect.pos.x += settings.ship_speed * dt;
    }
    if steer.left && rect.left() > 0.0 {
        rect.pos.x -= settings.ship_speed * dt;
    }
    if settings.vertical_movement {
        if steer.up && rect.top() > 0.0 {
            rect.pos.y -= settings.ship_vertical_speed * dt;
        }
        if steer.down && rect.bottom() < settings.screen_height {
            rect.pos.y += settings.ship_vertical_speed * dt;
        }
    }
    rect.clamp_to(settings.screen());
}

/// Straight-line bullet motion; bullets fully off screen are despawned
pub fn update_bullets(session: &mut GameSession, dt: f32) {
    for (_, bullet) in session.player_bullets.iter_active_mut() {
        bullet.rect.pos += bullet.vel * dt;
    }
    session.player_bullets.retain(|b| b.rect.bottom() > 0.0);

    let screen_height = session.settings.screen_height;
    for (_, bullet) in session.enemy_bullets.iter_active_mut() {
        bullet.rect.pos += bullet.vel * dt;
    }
    session.enemy_bullets.retain(|b| b.rect.top() < screen_height);
}

/// Wander, re-roll on timer, bounce inside the alien field
pub fn update_aliens(session: &mut GameSession, dt: f32) {
    let dt_ms = dt * 1000.0;
    let settings = &session.settings;
    let multiplier = session.stats.difficulty_multiplier;
    let rng = &mut session.rng;
    let flip = f64::from(settings.alien_flip_chance.clamp(0.0, 1.0));
    let reroll = f64::from(settings.alien_reroll_chance.clamp(0.0, 1.0));
    let bounds = Vec2::new(settings.screen_width, settings.alien_field_bottom());

    for (_, alien) in session.aliens.iter_active_mut() {
        alien.redirect_ms -= dt_ms;
        if alien.redirect_ms <= 0.0 {
            alien.roll_redirect(settings, rng);
            if rng.random_bool(flip) {
                alien.direction.x = -alien.direction.x;
            }
            if rng.random_bool(flip) {
                alien.direction.y = -alien.direction.y;
            }
            if rng.random_bool(reroll) {
                alien.roll_speed(settings, multiplier, rng);
            }
        }

        alien.rect.pos += alien.speed * alien.direction * dt;
        bounce(alien, bounds);
    }
}

/// Clamp to `[0, bounds]` and point back inward on any edge reached
fn bounce(alien: &mut Alien, bounds: Vec2) {
    let rect = &mut alien.rect;

    if rect.right() >= bounds.x {
        rect.pos.x = bounds.x - rect.size.x;
        alien.direction.x = -1.0;
    } else if rect.left() <= 0.0 {
        rect.pos.x = 0.0;
        alien.direction.x = 1.0;
    }

    if rect.bottom() >= bounds.y {
        rect.pos.y = bounds.y - rect.size.y;
        alien.direction.y = -1.0;
    } else if rect.top() <= 0.0 {
        rect.pos.y = 0.0;
        alien.direction.y = 1.0;
    }
}

/// Aliens whose cooldown ran out fire while the enemy pool has room.
/// An alien that finds the pool full keeps waiting with an expired timer.
pub fn update_alien_fire(session: &mut GameSession, dt: f32) {
    let dt_ms = dt * 1000.0;
    let settings = &session.settings;
    let multiplier = session.stats.difficulty_multiplier;
    let rng = &mut session.rng;
    let enemy_bullets = &mut session.enemy_bullets;

    let mut fired = 0;
    for (_, alien) in session.aliens.iter_active_mut() {
        alien.shoot_ms = (alien.shoot_ms - dt_ms).max(0.0);
        if alien.shoot_ms > 0.0 {
            continue;
        }
        if enemy_bullets.spawn(Bullet::enemy(&alien.rect, settings)).is_some() {
            alien.roll_shoot_delay(settings, multiplier, rng);
            fired += 1;
        }
    }

    for _ in 0..fired {
        session.push_event(GameEvent::AlienFired);
    }
}

/// Fire from the ship. Dropped silently when the player pool is full.
pub fn fire_player_bullet(session: &mut GameSession) -> bool {
    let bullet = Bullet::player(&session.ship.rect, &session.settings);
    if session.player_bullets.spawn(bullet).is_some() {
        session.push_event(GameEvent::PlayerFired);
        true
    } else {
        false
    }
}
