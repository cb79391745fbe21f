//! Planar collision predicates
//!
//! Everything collides on the x/z plane; y is ignored. Each entity pair has
//! its own threshold formula, and hits use strict `<` so a pair exactly at
//! the boundary does not collide.

use glam::Vec3;

use crate::planar_distance;

/// Bullet vs asteroid or boss: `target.size / 1.5 + bullet.size`
#[inline]
pub fn bullet_hits_target(
    bullet_pos: Vec3,
    bullet_size: f32,
    target_pos: Vec3,
    target_size: f32,
) -> bool {
    planar_distance(bullet_pos, target_pos) < target_size / 1.5 + bullet_size
}

/// Player vs asteroid or boss: `player.size + target.size * 0.7`
#[inline]
pub fn player_hits_hazard(
    player_pos: Vec3,
    player_size: f32,
    hazard_pos: Vec3,
    hazard_size: f32,
) -> bool {
    planar_distance(player_pos, hazard_pos) < player_size + hazard_size * 0.7
}

/// Player vs powerup: `player.size + powerup.size`
#[inline]
pub fn player_hits_powerup(
    player_pos: Vec3,
    player_size: f32,
    powerup_pos: Vec3,
    powerup_size: f32,
) -> bool {
    planar_distance(player_pos, powerup_pos) < player_size + powerup_size
}
