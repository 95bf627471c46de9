//! C ABI over `NativeGame`
//!
//! The handle is opaque: create it with `ai_init` or `ai_init_in`, pass it
//! to every other call, release it with `ai_cleanup`. All calls must come
//! from one thread. Snapshot functions copy into caller-owned buffers and
//! return how many records were written.

use std::ffi::{CStr, c_char};
use std::slice;

use super::{AlienRecord, BulletRecord, GameStateSnapshot, NativeGame};
use crate::settings::Settings;

fn create(dir: &str, seed: u64) -> *mut NativeGame {
    let settings = Settings::load(std::path::Path::new(dir).join(Settings::FILE_NAME));
    match NativeGame::open(dir, settings, seed) {
        Ok(game) => Box::into_raw(Box::new(game)),
        Err(e) => {
            log::error!("ai_init failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Create a game storing its files in the working directory.
/// Returns null on failure.
#[unsafe(no_mangle)]
pub extern "C" fn ai_init(seed: u64) -> *mut NativeGame {
    create(".", seed)
}

/// Create a game storing its files in `dir`. Returns null on failure.
///
/// # Safety
/// `dir` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_init_in(dir: *const c_char, seed: u64) -> *mut NativeGame {
    if dir.is_null() {
        return std::ptr::null_mut();
    }
    let dir = unsafe { CStr::from_ptr(dir) };
    match dir.to_str() {
        Ok(dir) => create(dir, seed),
        Err(_) => {
            log::error!("ai_init_in: directory is not UTF-8");
            std::ptr::null_mut()
        }
    }
}

/// Release a handle. Null is ignored.
///
/// # Safety
/// `game` must be null or a live handle from `ai_init*`, not used again.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_cleanup(game: *mut NativeGame) {
    if !game.is_null() {
        drop(unsafe { Box::from_raw(game) });
    }
}

/// # Safety
/// `game` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_start_game(game: *mut NativeGame) {
    if let Some(game) = unsafe { game.as_mut() } {
        game.start_game();
    }
}

/// # Safety
/// `game` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_update_player_movement(
    game: *mut NativeGame,
    left: i32,
    right: i32,
    up: i32,
    down: i32,
) {
    if let Some(game) = unsafe { game.as_mut() } {
        game.update_player_movement(left != 0, right != 0, up != 0, down != 0);
    }
}

/// Returns 1 if a bullet was spawned
///
/// # Safety
/// `game` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_fire_player_bullet(game: *mut NativeGame) -> i32 {
    match unsafe { game.as_mut() } {
        Some(game) => game.fire_player_bullet() as i32,
        None => 0,
    }
}

/// Returns 1 if the report destroyed an alien
///
/// # Safety
/// `game` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_handle_alien_hit(game: *mut NativeGame, x: i32, y: i32) -> i32 {
    match unsafe { game.as_mut() } {
        Some(game) => game.handle_alien_hit(x, y) as i32,
        None => 0,
    }
}

/// # Safety
/// `game` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_advance_level(game: *mut NativeGame) {
    if let Some(game) = unsafe { game.as_mut() } {
        game.advance_level();
    }
}

/// Advance by `dt` seconds
///
/// # Safety
/// `game` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_tick(game: *mut NativeGame, dt: f32) {
    if let Some(game) = unsafe { game.as_mut() } {
        game.tick(dt);
    }
}

/// Returns 0 on success, -1 on a null argument
///
/// # Safety
/// `game` must be null or a live handle; `out` null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_get_game_state(
    game: *const NativeGame,
    out: *mut GameStateSnapshot,
) -> i32 {
    let (Some(game), Some(out)) = (unsafe { game.as_ref() }, unsafe { out.as_mut() }) else {
        return -1;
    };
    *out = game.game_state();
    0
}

/// Current wave, or -1 on a null handle
///
/// # Safety
/// `game` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_get_level(game: *const NativeGame) -> i32 {
    match unsafe { game.as_ref() } {
        Some(game) => i32::try_from(game.level()).unwrap_or(i32::MAX),
        None => -1,
    }
}

/// Copy records into `out[..cap]`, returning how many were written
///
/// # Safety
/// `out` must be null or valid for `cap` writes of `T`.
unsafe fn copy_into<T: Copy>(records: &[T], out: *mut T, cap: usize) -> usize {
    if out.is_null() || cap == 0 {
        return 0;
    }
    let n = records.len().min(cap);
    let out = unsafe { slice::from_raw_parts_mut(out, n) };
    out.copy_from_slice(&records[..n]);
    n
}

/// # Safety
/// `game` must be null or a live handle; `out` null or valid for `cap`
/// records.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_get_alien_positions(
    game: *const NativeGame,
    out: *mut AlienRecord,
    cap: usize,
) -> usize {
    match unsafe { game.as_ref() } {
        Some(game) => unsafe { copy_into(&game.alien_positions(), out, cap) },
        None => 0,
    }
}

/// # Safety
/// `game` must be null or a live handle; `out` null or valid for `cap`
/// records.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_get_bullet_positions(
    game: *const NativeGame,
    out: *mut BulletRecord,
    cap: usize,
) -> usize {
    match unsafe { game.as_ref() } {
        Some(game) => unsafe { copy_into(&game.bullet_positions(), out, cap) },
        None => 0,
    }
}

/// Negative scores are ignored
///
/// # Safety
/// `game` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_save_high_score(game: *mut NativeGame, score: i32) {
    let Some(game) = (unsafe { game.as_mut() }) else {
        return;
    };
    match u32::try_from(score) {
        Ok(score) => {
            game.save_high_score(score);
        }
        Err(_) => log::warn!("ai_save_high_score: ignoring negative score {score}"),
    }
}

/// Copy the table, highest first, into `out[..cap]`
///
/// # Safety
/// `game` must be null or a live handle; `out` null or valid for `cap`
/// values.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ai_load_high_scores(
    game: *const NativeGame,
    out: *mut i32,
    cap: usize,
) -> usize {
    match unsafe { game.as_ref() } {
        Some(game) => {
            let scores: Vec<i32> = game
                .load_high_scores()
                .into_iter()
                .map(|s| i32::try_from(s).unwrap_or(i32::MAX))
                .collect();
            unsafe { copy_into(&scores, out, cap) }
        }
        None => 0,
    }
}
