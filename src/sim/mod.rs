//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{bullet_hits_target, player_hits_hazard, player_hits_powerup};
pub use state::{
    Asteroid, AsteroidKind, Boss, Bullet, CameraMode, Explosion, HudStats, Phase, Player, Powerup,
    PowerupKind, ShapeTag, SimulationState, Star,
};
pub use tick::advance;
