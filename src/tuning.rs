//! Data-driven game balance
//!
//! Early builds of this game disagreed on a few behaviors (asteroid
//! movement, control scheme, boss contact damage). Rather than bake one in,
//! the forks live here as explicit knobs a host can override, e.g. from a
//! JSON blob. Defaults reproduce the primary variant: lateral strafe,
//! straight-line asteroids, 1 damage per boss contact.

use serde::{Deserialize, Serialize};

/// How asteroids travel once spawned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementModel {
    /// Fly straight down the -z axis toward the player's lane
    #[default]
    StraightLine,
    /// Steer toward the player's current position each tick
    Homing,
}

/// How the player ship is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlScheme {
    /// Fixed forward facing, lateral strafe only
    #[default]
    Strafe,
    /// Free rotation about y plus thrust along the facing
    RotateThrust,
}

/// Game balance and behavior variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Every Nth wave is a boss wave
    #[serde(default = "default_boss_wave_interval")]
    pub boss_wave_interval: u32,
    /// Per-tick probability of a powerup spawning
    #[serde(default = "default_powerup_spawn_chance")]
    pub powerup_spawn_chance: f32,
    /// Health lost on each tick of boss contact (shield negates it)
    #[serde(default = "default_boss_contact_damage")]
    pub boss_contact_damage: u8,
    #[serde(default)]
    pub movement_model: MovementModel,
    #[serde(default)]
    pub control_scheme: ControlScheme,
}

fn default_boss_wave_interval() -> u32 {
    3
}

fn default_powerup_spawn_chance() -> f32 {
    0.01
}

fn default_boss_contact_damage() -> u8 {
    1
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            boss_wave_interval: default_boss_wave_interval(),
            powerup_spawn_chance: default_powerup_spawn_chance(),
            boss_contact_damage: default_boss_contact_damage(),
            movement_model: MovementModel::default(),
            control_scheme: ControlScheme::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_primary_variant() {
        let t = Tuning::default();
        assert_eq!(t.boss_wave_interval, 3);
        assert_eq!(t.boss_contact_damage, 1);
        assert_eq!(t.movement_model, MovementModel::StraightLine);
        assert_eq!(t.control_scheme, ControlScheme::Strafe);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{"movement_model":"Homing"}"#).unwrap();
        assert_eq!(t.movement_model, MovementModel::Homing);
        assert_eq!(t.boss_wave_interval, 3);
        assert!((t.powerup_spawn_chance - 0.01).abs() < 1e-9);
    }
}
