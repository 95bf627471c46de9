//! Fleet generation and wave progression

use glam::Vec2;

use super::state::{Alien, GameEvent, GameSession};
use crate::consts::MAX_ALIENS;
use crate::settings::Settings;

/// Top-left corners of a fresh fleet.
///
/// A grid starting one alien in from the top-left corner. Columns stop two
/// alien widths short of the right edge; rows stop three alien heights
/// short of the bottom, and early enough that every alien starts inside the
/// band it wanders in. Depends only on screen size, alien size and spacing.
pub fn fleet_layout(settings: &Settings) -> Vec<Vec2> {
    let (aw, ah) = (settings.alien_width, settings.alien_height);
    let max_x = settings.screen_width - 2.0 * aw;
    let max_y = (settings.screen_height - 3.0 * ah).min(settings.alien_field_bottom() - ah);
    let step_x = settings.fleet_spacing_x * aw;
    let step_y = settings.fleet_spacing_y * ah;

    let mut slots = Vec::new();
    let mut y = ah;
    'rows: while y < max_y {
        let mut x = aw;
        while x < max_x {
            if slots.len() == MAX_ALIENS {
                break 'rows;
            }
            slots.push(Vec2::new(x, y));
            x += step_x;
        }
        y += step_y;
    }
    slots
}

/// Replace the fleet with a new one for the current wave
pub fn spawn_fleet(session: &mut GameSession) {
    let layout = fleet_layout(&session.settings);
    let multiplier = session.stats.difficulty_multiplier;

    // Clearing bumps every slot generation, so old handles stay dead
    session.aliens.clear();
    session.aliens.set_capacity(layout.len());
    for pos in layout {
        let alien = Alien::new(pos, &session.settings, multiplier, &mut session.rng);
        session.aliens.spawn(alien);
    }
    log::debug!(
        "Spawned fleet of {} for wave {}",
        session.aliens.active_count(),
        session.stats.wave
    );
}

/// Move to the next wave: clear bullets, raise difficulty, new fleet
pub fn advance_wave(session: &mut GameSession) {
    session.player_bullets.clear();
    session.enemy_bullets.clear();

    session.stats.wave += 1;
    session.stats.difficulty_multiplier = session.settings.difficulty_multiplier(session.stats.wave);
    log::info!(
        "Wave {} (difficulty x{:.2})",
        session.stats.wave,
        session.stats.difficulty_multiplier
    );

    spawn_fleet(session);
    session.push_event(GameEvent::WaveCleared {
        wave: session.stats.wave,
    });
}

/// Advance when no alien is left. Returns true if a new wave started.
pub fn check_wave_cleared(session: &mut GameSession) -> bool {
    if session.aliens.is_empty() {
        advance_wave(session);
        true
    } else {
        false
    }
}
