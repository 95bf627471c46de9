//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG owned by the session
//! - Stable iteration order (pool slot order)
//! - No rendering, audio or persistence

pub mod collision;
pub mod movement;
pub mod pool;
pub mod progression;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, resolve_collisions};
pub use movement::Steering;
pub use pool::{EntityHandle, EntityPool};
pub use progression::{advance_wave, check_wave_cleared, fleet_layout, spawn_fleet};
pub use rect::{PixelRect, Rect};
pub use state::{
    Alien, Bullet, BulletOwner, GameEvent, GamePhase, GameSession, GameStats, ReturnPhase,
    SessionSnapshot, Ship,
};
pub use tick::{TickInput, apply_command, tick};
