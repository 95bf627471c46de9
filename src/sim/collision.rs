//! Collision detection between bullets, aliens and the ship
//!
//! Plain AABB overlap. Pairs are gathered before anything is removed, so
//! every bullet touching an alien in the same pass is consumed with it and
//! the alien still counts once.

use glam::Vec2;

use super::pool::{EntityHandle, EntityPool};
use super::rect::Rect;
use super::state::{Alien, Bullet, GameSession};

/// Result of a collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionResult {
    /// Centres of aliens destroyed by player bullets
    pub aliens_destroyed: Vec<Vec2>,
    /// Player bullets consumed by those hits
    pub bullets_consumed: usize,
    /// Ship touched by an alien or an enemy bullet
    pub ship_hit: bool,
}

/// Every (bullet, alien) pair that overlaps
pub fn bullet_alien_pairs(
    bullets: &EntityPool<Bullet>,
    aliens: &EntityPool<Alien>,
) -> Vec<(EntityHandle, EntityHandle)> {
    let mut pairs = Vec::new();
    for (bullet_handle, bullet) in bullets.iter_active() {
        for (alien_handle, alien) in aliens.iter_active() {
            if bullet.rect.intersects(&alien.rect) {
                pairs.push((bullet_handle, alien_handle));
            }
        }
    }
    pairs
}

/// Enemy bullets overlapping the ship
pub fn bullets_hitting(ship: &Rect, bullets: &EntityPool<Bullet>) -> Vec<EntityHandle> {
    bullets
        .iter_active()
        .filter(|(_, b)| b.rect.intersects(ship))
        .map(|(h, _)| h)
        .collect()
}

pub fn alien_touches_ship(ship: &Rect, aliens: &EntityPool<Alien>) -> bool {
    aliens.iter_active().any(|(_, a)| a.rect.intersects(ship))
}

/// Resolve all collisions for this tick.
///
/// Removes hit aliens and consumed bullets; scoring and life loss are left
/// to the caller.
pub fn resolve_collisions(session: &mut GameSession) -> CollisionResult {
    let mut result = CollisionResult::default();

    let pairs = bullet_alien_pairs(&session.player_bullets, &session.aliens);
    for (bullet, alien) in pairs {
        if session.player_bullets.despawn(bullet) {
            result.bullets_consumed += 1;
        }
        let center = session.aliens.get(alien).map(|a| a.rect.center());
        if let Some(center) = center {
            session.aliens.despawn(alien);
            result.aliens_destroyed.push(center);
        }
    }

    let ship = session.ship.rect;
    for bullet in bullets_hitting(&ship, &session.enemy_bullets) {
        session.enemy_bullets.despawn(bullet);
        result.ship_hit = true;
    }
    if alien_touches_ship(&ship, &session.aliens) {
        result.ship_hit = true;
    }

    result
}
