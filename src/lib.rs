//! Astro Siege - a 3D space-survival arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, timers)
//! - `tuning`: Data-driven game balance and behavior variants
//!
//! Rendering and raw input handling live outside this crate. A host drives
//! the simulation by calling `SimulationState::advance` once per fixed tick
//! and forwarding discrete intents (strafe, fire, bomb, pause, reset) from
//! whatever input layer it uses. The render layer reads entity collections
//! and `HudStats` between ticks; nothing it computes feeds back in.

pub mod sim;
pub mod tuning;

pub use sim::{HudStats, SimulationState, advance};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the host loop's 16 ms cadence)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Player defaults
    pub const PLAYER_START_HEALTH: u8 = 3;
    pub const PLAYER_MAX_HEALTH: u8 = 5;
    pub const PLAYER_SIZE: f32 = 0.5;
    pub const PLAYER_SPEED: f32 = 0.2;
    /// The ship may not strafe past this on either side
    pub const LATERAL_BOUND: f32 = 10.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 1.0;
    pub const BULLET_SIZE: f32 = 0.15;
    pub const BULLET_MAX_RANGE: f32 = 50.0;
    /// Letting this many bullets fly into the void ends the run
    pub const MAX_MISSED_BULLETS: u32 = 100;

    /// Boss defaults
    pub const BOSS_SIZE: f32 = 3.0;
    pub const BOSS_SPEED: f32 = 0.02;
    pub const BOSS_BASE_HIT_POINTS: u32 = 5;
    pub const BOSS_SPAWN_DISTANCE: f32 = 35.0;
    pub const BOSS_WARNING_DISTANCE: f32 = 10.0;

    /// Powerup defaults
    pub const POWERUP_SIZE: f32 = 0.5;
    pub const POWERUP_SPEED: f32 = 0.03;

    /// Timed effects, in ticks
    pub const BOMB_COOLDOWN_TICKS: u32 = 1000;
    pub const BOOST_DURATION_TICKS: u32 = 500;
    pub const SHIELD_DURATION_TICKS: u32 = 500;
    pub const WARNING_FLASH_TICKS: u32 = 100;

    /// Explosion animation
    pub const EXPLOSION_GROWTH_RATE: f32 = 0.1;
    pub const EXPLOSION_FADE_RATE: f32 = 0.05;

    /// Background starfield
    pub const STAR_COUNT: usize = 200;
    pub const STAR_FIELD_EXTENT: f32 = 50.0;
}

/// Distance between two points on the x/z gameplay plane (y is ignored)
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Unit forward vector on the x/z plane for a heading in radians (0 = +z)
#[inline]
pub fn heading_vector(direction: f32) -> Vec3 {
    Vec3::new(direction.sin(), 0.0, direction.cos())
}
