//! Fixed timestep simulation tick
//!
//! [`advance`] runs the per-tick pipeline in a fixed order: bullets resolve
//! their collisions before the wave-clear check, the boss is honored dead in
//! the same tick whether a bullet or ramming killed it, and every entity
//! marked destroyed is gone from its collection before the tick ends.
//! Removal is done by draining each collection and collecting survivors into
//! a fresh one, so nothing is skipped or double-counted mid-iteration.

use glam::Vec3;
use rand::Rng;

use super::collision::{bullet_hits_target, player_hits_hazard, player_hits_powerup};
use super::state::{
    Asteroid, AsteroidKind, Boss, Phase, Powerup, PowerupKind, SimulationState,
};
use crate::consts::*;
use crate::heading_vector;
use crate::planar_distance;
use crate::tuning::MovementModel;

impl SimulationState {
    /// Advance the simulation by one fixed tick. No-op unless Running.
    pub fn advance(&mut self) {
        advance(self);
    }
}

/// Advance the game state by one fixed tick
pub fn advance(state: &mut SimulationState) {
    if state.phase != Phase::Running {
        return;
    }

    // Cosmetic pulsing (shield glow) derives from this counter
    state.time_ticks += 1;

    update_bullets(state);
    update_asteroids(state);
    update_boss(state);
    update_powerups(state);
    update_explosions(state);
    maybe_spawn_powerup(state);
    update_timers(state);

    if state.player.health == 0 || state.bullets_missed >= MAX_MISSED_BULLETS {
        log::info!(
            "game over: wave {}, score {}, {} bullets missed",
            state.wave,
            state.score,
            state.bullets_missed
        );
        state.phase = Phase::GameOver;
    }
}

fn update_bullets(state: &mut SimulationState) {
    let bullets = std::mem::take(&mut state.bullets);
    let mut survivors = Vec::with_capacity(bullets.len());

    for mut bullet in bullets {
        bullet.pos += heading_vector(bullet.direction) * bullet.speed;
        bullet.distance += bullet.speed;

        // Out of range before it found a target
        if bullet.distance >= bullet.max_distance {
            if !bullet.decorative {
                state.bullets_missed += 1;
            }
            continue;
        }

        if resolve_bullet_hit(state, bullet.pos, bullet.size) {
            continue;
        }

        survivors.push(bullet);
    }

    state.bullets = survivors;
}

/// Test a bullet against the boss first, then asteroids in collection order.
/// At most one target is hit; returns true if the bullet is spent.
fn resolve_bullet_hit(state: &mut SimulationState, pos: Vec3, size: f32) -> bool {
    if let Some(mut boss) = state.boss.take() {
        if bullet_hits_target(pos, size, boss.pos, boss.size) {
            boss.hit_points = boss.hit_points.saturating_sub(1);
            state.add_explosion(pos, 0.5);
            state.score += 5;
            if boss.hit_points == 0 {
                boss_defeated(state, &boss);
            } else {
                state.boss = Some(boss);
            }
            return true;
        }
        state.boss = Some(boss);
    }

    let Some(idx) = state
        .asteroids
        .iter()
        .position(|a| bullet_hits_target(pos, size, a.pos, a.size))
    else {
        return false;
    };

    state.asteroids[idx].hit_points -= 1;
    if state.asteroids[idx].hit_points == 0 {
        let dead = state.asteroids.remove(idx);
        state.add_explosion(dead.pos, dead.size);
        state.score += dead.kind.score();
        if dead.kind == AsteroidKind::Large {
            spawn_fragments(state, dead.pos);
        }
    } else {
        // Chipped but not destroyed
        state.add_explosion(pos, 0.3);
    }

    true
}

fn update_asteroids(state: &mut SimulationState) {
    let homing = state.tuning.movement_model == MovementModel::Homing;
    let asteroids = std::mem::take(&mut state.asteroids);
    let mut survivors = Vec::with_capacity(asteroids.len());

    for mut asteroid in asteroids {
        if homing {
            let dist = planar_distance(state.player.pos, asteroid.pos);
            if dist > 0.0 {
                let to_player = state.player.pos - asteroid.pos;
                asteroid.pos.x += to_player.x / dist * asteroid.speed;
                asteroid.pos.z += to_player.z / dist * asteroid.speed;
            }
        } else {
            asteroid.pos.z -= asteroid.speed;
        }
        asteroid.rotation = wrap_degrees(asteroid.rotation + asteroid.spin);

        // Slipped past the player: dodged, no reward or penalty.
        // Homing asteroids pursue from any side and are never dodged.
        if !homing && asteroid.pos.z < state.player.pos.z {
            continue;
        }

        if player_hits_hazard(
            state.player.pos,
            state.player.size,
            asteroid.pos,
            asteroid.size,
        ) {
            if !state.shield_active() {
                state.damage_player(1);
            }
            state.add_explosion(state.player.pos, state.player.size * 1.5);
            continue;
        }

        survivors.push(asteroid);
    }

    state.asteroids = survivors;

    // Wave clear: bullets already resolved this tick, so an empty field here
    // really is cleared (boss waves advance via the boss itself)
    if state.asteroids.is_empty() && state.boss.is_none() {
        state.wave += 1;
        spawn_wave(state);
    }
}

fn update_boss(state: &mut SimulationState) {
    let Some(mut boss) = state.boss.take() else {
        return;
    };

    boss.pos.z -= boss.speed;
    // Drift sideways into the player's lane
    if boss.pos.x < state.player.pos.x {
        boss.pos.x += boss.speed * 0.5;
    } else if boss.pos.x > state.player.pos.x {
        boss.pos.x -= boss.speed * 0.5;
    }
    boss.rotation = wrap_degrees(boss.rotation + boss.spin);

    // Slipped past the player: no reward, next wave
    if boss.pos.z < state.player.pos.z {
        log::info!("boss dodged on wave {}", state.wave);
        state.boss_warning = false;
        state.wave += 1;
        spawn_wave(state);
        return;
    }

    let dist_z = boss.pos.z - state.player.pos.z;
    if dist_z < boss.warning_distance {
        if !state.boss_warning {
            state.boss_warning = true;
            state.warning_flash_ticks = WARNING_FLASH_TICKS;
        }
    } else {
        state.boss_warning = false;
    }

    if player_hits_hazard(state.player.pos, state.player.size, boss.pos, boss.size) {
        if !state.shield_active() {
            state.damage_player(state.tuning.boss_contact_damage);
        }
        state.add_explosion(state.player.pos, state.player.size * 2.0);
        // Ramming chips the boss whether or not the shield is up
        boss.hit_points = boss.hit_points.saturating_sub(1);
        if boss.hit_points == 0 {
            boss_defeated(state, &boss);
            return;
        }
    }

    state.boss = Some(boss);
}

/// Caller has already removed the boss from the state
fn boss_defeated(state: &mut SimulationState, boss: &Boss) {
    state.add_explosion(boss.pos, boss.size * 2.0);
    state.score += 100 + state.wave as u64 * 10;
    state.boss_warning = false;
    log::info!("boss defeated on wave {}", state.wave);
    state.wave += 1;
    spawn_wave(state);
}

fn update_powerups(state: &mut SimulationState) {
    let powerups = std::mem::take(&mut state.powerups);
    let mut survivors = Vec::with_capacity(powerups.len());

    for mut powerup in powerups {
        powerup.pos.z -= powerup.speed;
        powerup.rotation = (powerup.rotation + 2.0).rem_euclid(360.0);

        if powerup.pos.z < state.player.pos.z {
            continue;
        }

        if player_hits_powerup(
            state.player.pos,
            state.player.size,
            powerup.pos,
            powerup.size,
        ) {
            state.apply_powerup(powerup.kind);
            continue;
        }

        survivors.push(powerup);
    }

    state.powerups = survivors;
}

fn update_explosions(state: &mut SimulationState) {
    for explosion in &mut state.explosions {
        explosion.size += explosion.growth_rate;
        explosion.alpha -= explosion.fade_rate;
    }
    state
        .explosions
        .retain(|e| e.alpha > 0.0 && e.size < e.max_size);
}

fn maybe_spawn_powerup(state: &mut SimulationState) {
    if state.rng.random::<f32>() >= state.tuning.powerup_spawn_chance {
        return;
    }
    let distance = state.rng.random_range(15.0..25.0);
    let x = state.rng.random_range(-10.0..10.0);
    let kind = match state.rng.random_range(0..3) {
        0 => PowerupKind::Health,
        1 => PowerupKind::Speed,
        _ => PowerupKind::Shield,
    };
    let id = state.next_entity_id();
    state.powerups.push(Powerup {
        id,
        pos: Vec3::new(x, 0.0, state.player.pos.z + distance),
        kind,
        size: POWERUP_SIZE,
        speed: POWERUP_SPEED,
        rotation: 0.0,
    });
}

fn update_timers(state: &mut SimulationState) {
    state.bomb_cooldown = state.bomb_cooldown.saturating_sub(1);
    state.effects.boost_ticks = state.effects.boost_ticks.saturating_sub(1);
    state.effects.shield_ticks = state.effects.shield_ticks.saturating_sub(1);
    state.warning_flash_ticks = state.warning_flash_ticks.saturating_sub(1);
}

/// Populate the next wave: one boss every `boss_wave_interval` waves,
/// otherwise `5 + wave * 2` asteroids ahead of the player
pub fn spawn_wave(state: &mut SimulationState) {
    state.asteroids.clear();

    if state.wave % state.tuning.boss_wave_interval == 0 {
        spawn_boss(state);
        let hp = state.boss.as_ref().map(|b| b.hit_points).unwrap_or(0);
        log::info!("wave {}: boss incoming ({hp} hp)", state.wave);
        return;
    }

    let count = 5 + state.wave * 2;
    for _ in 0..count {
        let distance = state.rng.random_range(20.0..30.0);
        let x = state.rng.random_range(-10.0..10.0);
        let z = state.player.pos.z + distance;
        let kind = roll_asteroid_kind(state);
        spawn_asteroid(state, x, z, kind);
    }
    log::info!("wave {}: spawned {count} asteroids", state.wave);
}

/// Asteroid mix is gated by wave: early waves stay gentle
fn roll_asteroid_kind(state: &mut SimulationState) -> AsteroidKind {
    if state.wave < 2 {
        AsteroidKind::Normal
    } else if state.wave < 4 {
        match state.rng.random_range(0..2) {
            0 => AsteroidKind::Normal,
            _ => AsteroidKind::Fast,
        }
    } else {
        match state.rng.random_range(0..3) {
            0 => AsteroidKind::Normal,
            1 => AsteroidKind::Fast,
            _ => AsteroidKind::Large,
        }
    }
}

pub(crate) fn spawn_asteroid(state: &mut SimulationState, x: f32, z: f32, kind: AsteroidKind) {
    let speed_multiplier = 1.0 + state.wave as f32 * 0.1;
    let (min_size, max_size) = kind.size_range();
    let id = state.next_entity_id();
    let size = state.rng.random_range(min_size..max_size);
    let rotation = random_rotation(state);
    let spin = random_spin(state, 2.0);
    state.asteroids.push(Asteroid {
        id,
        pos: Vec3::new(x, 0.0, z),
        kind,
        size,
        speed: kind.base_speed() * speed_multiplier,
        hit_points: kind.hit_points(),
        rotation,
        spin,
        shape: kind.shape(),
    });
}

fn spawn_boss(state: &mut SimulationState) {
    let x = state.rng.random_range(-8.0..8.0);
    let z = state.player.pos.z + BOSS_SPAWN_DISTANCE;
    let rotation = random_rotation(state);
    let spin = random_spin(state, 1.0);
    state.boss = Some(Boss {
        pos: Vec3::new(x, 0.0, z),
        size: BOSS_SIZE,
        speed: BOSS_SPEED,
        hit_points: BOSS_BASE_HIT_POINTS + state.wave,
        rotation,
        spin,
        warning_distance: BOSS_WARNING_DISTANCE,
    });
}

/// Large asteroids shatter into 2-3 smaller ones near the impact point
fn spawn_fragments(state: &mut SimulationState, origin: Vec3) {
    let count = state.rng.random_range(2..=3);
    for _ in 0..count {
        let offset_x = state.rng.random_range(-1.0..1.0);
        let offset_z = state.rng.random_range(-1.0..1.0);
        let kind = if state.rng.random_bool(0.5) {
            AsteroidKind::Normal
        } else {
            AsteroidKind::Fast
        };
        spawn_asteroid(state, origin.x + offset_x, origin.z + offset_z, kind);
    }
}

fn random_rotation(state: &mut SimulationState) -> Vec3 {
    Vec3::new(
        state.rng.random_range(0.0..360.0),
        state.rng.random_range(0.0..360.0),
        state.rng.random_range(0.0..360.0),
    )
}

fn random_spin(state: &mut SimulationState, max_rate: f32) -> Vec3 {
    Vec3::new(
        state.rng.random_range(-max_rate..max_rate),
        state.rng.random_range(-max_rate..max_rate),
        state.rng.random_range(-max_rate..max_rate),
    )
}

fn wrap_degrees(v: Vec3) -> Vec3 {
    Vec3::new(
        v.x.rem_euclid(360.0),
        v.y.rem_euclid(360.0),
        v.z.rem_euclid(360.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, ShapeTag};
    use crate::tuning::Tuning;

    /// Fresh state with the opening wave replaced by one far-off spectator
    /// asteroid, so the wave-clear check stays quiet during a test.
    fn sandbox(seed: u64) -> SimulationState {
        let mut state = SimulationState::new(seed);
        state.asteroids.clear();
        push_asteroid(
            &mut state,
            Vec3::new(10.0, 0.0, 200.0),
            AsteroidKind::Normal,
            1,
            1.0,
        );
        state
    }

    fn push_asteroid(
        state: &mut SimulationState,
        pos: Vec3,
        kind: AsteroidKind,
        hit_points: u8,
        size: f32,
    ) {
        let id = state.next_entity_id();
        state.asteroids.push(Asteroid {
            id,
            pos,
            kind,
            size,
            speed: kind.base_speed(),
            hit_points,
            rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
            shape: kind.shape(),
        });
    }

    fn push_bullet(state: &mut SimulationState, pos: Vec3) {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            direction: 0.0,
            speed: 1.0,
            distance: 0.0,
            max_distance: BULLET_MAX_RANGE,
            size: BULLET_SIZE,
            decorative: false,
        });
    }

    fn make_boss(pos: Vec3, hit_points: u32) -> Boss {
        Boss {
            pos,
            size: BOSS_SIZE,
            speed: BOSS_SPEED,
            hit_points,
            rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
            warning_distance: BOSS_WARNING_DISTANCE,
        }
    }

    #[test]
    fn test_wave_progression() {
        let mut state = SimulationState::new(42);
        assert_eq!(state.wave, 1);
        assert_eq!(state.asteroids.len(), 7);

        state.asteroids.clear();
        advance(&mut state);
        assert_eq!(state.wave, 2);
        assert_eq!(state.asteroids.len(), 9);
    }

    #[test]
    fn test_boss_cadence() {
        let mut state = SimulationState::new(42);
        for wave in 1..=7u32 {
            assert_eq!(state.wave, wave);
            if wave % 3 == 0 {
                assert!(state.boss.is_some(), "wave {wave} should have a boss");
                assert!(state.asteroids.is_empty());
                state.boss = None;
            } else {
                assert!(state.boss.is_none(), "wave {wave} should have no boss");
                assert!(!state.asteroids.is_empty());
                state.asteroids.clear();
            }
            advance(&mut state);
        }
    }

    #[test]
    fn test_end_to_end_bullet_kill() {
        let mut state = sandbox(7);
        push_asteroid(&mut state, Vec3::new(0.0, 0.0, 5.0), AsteroidKind::Normal, 1, 1.0);
        push_bullet(&mut state, Vec3::new(0.0, 0.0, 4.2));
        assert_eq!(state.asteroids.len(), 2);

        advance(&mut state);

        assert_eq!(state.score, 10);
        assert_eq!(state.asteroids.len(), 1, "exactly the target is removed");
        assert_eq!(state.explosions.len(), 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.health, PLAYER_START_HEALTH);
    }

    #[test]
    fn test_nonlethal_hit_spawns_small_explosion_without_score() {
        let mut state = sandbox(7);
        push_asteroid(&mut state, Vec3::new(0.0, 0.0, 5.0), AsteroidKind::Large, 2, 2.0);
        push_bullet(&mut state, Vec3::new(0.0, 0.0, 4.5));

        advance(&mut state);

        assert_eq!(state.score, 0);
        assert_eq!(state.asteroids.len(), 2, "chipped asteroid survives");
        assert_eq!(state.asteroids[1].hit_points, 1);
        assert_eq!(state.explosions.len(), 1);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_fragmentation() {
        let mut state = sandbox(11);
        // Already chipped down to its last hit point
        push_asteroid(&mut state, Vec3::new(0.0, 0.0, 5.0), AsteroidKind::Large, 1, 2.0);
        push_bullet(&mut state, Vec3::new(0.0, 0.0, 4.2));

        advance(&mut state);

        let fragments: Vec<_> = state.asteroids.iter().skip(1).collect();
        assert!(
            (2..=3).contains(&fragments.len()),
            "expected 2-3 fragments, got {}",
            fragments.len()
        );
        for fragment in fragments {
            assert_ne!(fragment.kind, AsteroidKind::Large);
            assert!(planar_distance(fragment.pos, Vec3::new(0.0, 0.0, 5.0)) < 2.0);
        }
        assert_eq!(state.score, 20);
    }

    #[test]
    fn test_shield_immunity() {
        let mut state = sandbox(7);
        push_asteroid(&mut state, Vec3::new(0.0, 0.0, 0.2), AsteroidKind::Normal, 1, 1.0);
        state.effects.shield_ticks = SHIELD_DURATION_TICKS;

        advance(&mut state);

        assert_eq!(state.player.health, PLAYER_START_HEALTH, "shield negates damage");
        assert_eq!(state.asteroids.len(), 1, "collider is still removed");
        assert_eq!(state.explosions.len(), 1, "impact still visible");
    }

    #[test]
    fn test_unshielded_collision_costs_health() {
        let mut state = sandbox(7);
        push_asteroid(&mut state, Vec3::new(0.0, 0.0, 0.2), AsteroidKind::Normal, 1, 1.0);

        advance(&mut state);

        assert_eq!(state.player.health, PLAYER_START_HEALTH - 1);
        assert_eq!(state.asteroids.len(), 1);
    }

    #[test]
    fn test_dodged_asteroid_removed_without_penalty() {
        let mut state = sandbox(7);
        push_asteroid(&mut state, Vec3::new(5.0, 0.0, -0.5), AsteroidKind::Normal, 1, 1.0);

        advance(&mut state);

        assert_eq!(state.asteroids.len(), 1, "dodged asteroid is gone");
        assert_eq!(state.score, 0);
        assert_eq!(state.player.health, PLAYER_START_HEALTH);
    }

    #[test]
    fn test_missed_bullet_counts_at_exact_max_range() {
        let mut state = sandbox(7);
        state.fire();

        // Bullet speed is 1.0, so it reaches exactly max range on tick 50
        for _ in 0..50 {
            advance(&mut state);
        }

        assert!(state.bullets.is_empty());
        assert_eq!(state.bullets_missed, 1);
    }

    #[test]
    fn test_decorative_burst_never_counts_as_missed() {
        let mut state = SimulationState::new(7);
        state.activate_bomb();
        assert_eq!(state.bullets.len(), 24);

        for _ in 0..20 {
            advance(&mut state);
        }

        assert!(state.bullets.is_empty());
        assert_eq!(state.bullets_missed, 0);
    }

    #[test]
    fn test_bomb_cooldown_single_fire() {
        let mut state = SimulationState::new(42);
        let field = state.asteroids.len() as u64;

        state.activate_bomb();
        assert_eq!(state.score, field * 10);
        assert_eq!(state.bomb_cooldown, BOMB_COOLDOWN_TICKS);
        assert!(state.asteroids.is_empty());

        // Second activation inside the cooldown window does nothing
        state.activate_bomb();
        assert_eq!(state.score, field * 10);
        assert_eq!(state.bullets.len(), 24);

        advance(&mut state);
        assert_eq!(state.bomb_cooldown, BOMB_COOLDOWN_TICKS - 1);
        // Field cleared by the bomb rolls straight into the next wave
        assert_eq!(state.wave, 2);
    }

    #[test]
    fn test_bomb_clears_boss_for_flat_score() {
        let mut state = sandbox(3);
        state.asteroids.clear();
        state.boss = Some(make_boss(Vec3::new(0.0, 0.0, 20.0), 9));
        state.boss_warning = true;

        state.activate_bomb();

        assert!(state.boss.is_none());
        assert!(!state.boss_warning);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_bullet_chips_boss_and_scores_five() {
        let mut state = sandbox(3);
        state.boss = Some(make_boss(Vec3::new(0.0, 0.0, 10.0), 3));
        push_bullet(&mut state, Vec3::new(0.0, 0.0, 9.5));

        advance(&mut state);

        assert_eq!(state.score, 5);
        assert_eq!(state.boss.as_ref().unwrap().hit_points, 2);
        assert!(state.bullets.is_empty());
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_boss_defeat_by_contact_advances_wave() {
        let mut state = SimulationState::new(13);
        state.asteroids.clear();
        state.wave = 3;
        state.boss = Some(make_boss(Vec3::new(0.0, 0.0, 1.0), 1));
        state.effects.shield_ticks = SHIELD_DURATION_TICKS;

        advance(&mut state);

        assert!(state.boss.is_none());
        assert_eq!(state.score, 100 + 3 * 10);
        assert_eq!(state.player.health, PLAYER_START_HEALTH, "shielded ram is free");
        assert_eq!(state.wave, 4);
        assert_eq!(state.asteroids.len(), 5 + 4 * 2);
    }

    #[test]
    fn test_boss_contact_damage_is_tunable() {
        let tuning = Tuning {
            boss_contact_damage: 2,
            ..Default::default()
        };
        let mut state = SimulationState::with_tuning(13, tuning);
        state.asteroids.clear();
        state.boss = Some(make_boss(Vec3::new(0.0, 0.0, 1.0), 10));

        advance(&mut state);

        assert_eq!(state.player.health, PLAYER_START_HEALTH - 2);
        assert_eq!(state.boss.as_ref().unwrap().hit_points, 9);
    }

    #[test]
    fn test_boss_warning_tracks_proximity() {
        let mut state = sandbox(3);
        state.asteroids.clear();
        state.boss = Some(make_boss(Vec3::new(5.0, 0.0, 10.01), 9));

        advance(&mut state);
        assert!(state.boss_warning);
        assert!(state.warning_flash_ticks > 0);

        // Back out of range: the warning clears
        state.boss.as_mut().unwrap().pos.z = 50.0;
        advance(&mut state);
        assert!(!state.boss_warning);
    }

    #[test]
    fn test_dodged_boss_advances_wave_without_reward() {
        let mut state = sandbox(3);
        state.asteroids.clear();
        state.wave = 3;
        state.boss = Some(make_boss(Vec3::new(8.0, 0.0, -0.5), 9));

        advance(&mut state);

        assert!(state.boss.is_none());
        assert_eq!(state.score, 0);
        assert_eq!(state.wave, 4);
    }

    #[test]
    fn test_powerup_pickup_and_dodge() {
        let mut state = sandbox(7);
        state.tuning.powerup_spawn_chance = 0.0;
        let id = state.next_entity_id();
        state.powerups.push(Powerup {
            id,
            pos: Vec3::new(0.0, 0.0, 0.4),
            kind: PowerupKind::Shield,
            size: POWERUP_SIZE,
            speed: POWERUP_SPEED,
            rotation: 0.0,
        });
        let id = state.next_entity_id();
        state.powerups.push(Powerup {
            id,
            pos: Vec3::new(5.0, 0.0, -0.5),
            kind: PowerupKind::Health,
            size: POWERUP_SIZE,
            speed: POWERUP_SPEED,
            rotation: 0.0,
        });

        advance(&mut state);

        assert!(state.powerups.is_empty(), "one collected, one dodged");
        assert!(state.shield_active());
        assert_eq!(state.player.health, PLAYER_START_HEALTH, "dodged heal is lost");
    }

    #[test]
    fn test_health_powerup_heals_one_capped() {
        let mut state = sandbox(7);
        state.player.health = PLAYER_MAX_HEALTH;
        state.apply_powerup(PowerupKind::Health);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);

        state.player.health = 2;
        state.apply_powerup(PowerupKind::Health);
        assert_eq!(state.player.health, 3);
    }

    #[test]
    fn test_explosions_grow_fade_and_expire() {
        let mut state = sandbox(7);
        state.add_explosion(Vec3::ZERO, 1.0);

        advance(&mut state);
        let explosion = &state.explosions[0];
        assert!(explosion.size > 1.0);
        assert!(explosion.alpha < 1.0);

        // Fade rate 0.05 ends it within 20 ticks
        for _ in 0..20 {
            advance(&mut state);
        }
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_game_over_is_sticky_until_reset() {
        let mut state = SimulationState::new(5);
        state.player.health = 1;
        state.damage_player(1);

        advance(&mut state);
        assert_eq!(state.phase, Phase::GameOver);

        let ticks = state.time_ticks;
        let asteroid_positions: Vec<Vec3> = state.asteroids.iter().map(|a| a.pos).collect();
        for _ in 0..10 {
            advance(&mut state);
        }
        assert_eq!(state.time_ticks, ticks);
        let unchanged: Vec<Vec3> = state.asteroids.iter().map(|a| a.pos).collect();
        assert_eq!(asteroid_positions, unchanged);

        state.reset();
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.wave, 1);
    }

    #[test]
    fn test_game_over_on_missed_bullet_cap() {
        let mut state = sandbox(5);
        state.bullets_missed = MAX_MISSED_BULLETS - 1;
        state.fire();
        for _ in 0..50 {
            advance(&mut state);
        }
        assert_eq!(state.bullets_missed, MAX_MISSED_BULLETS);
        assert_eq!(state.phase, Phase::GameOver);
    }

    #[test]
    fn test_pause_freezes_the_world() {
        let mut state = SimulationState::new(5);
        let positions: Vec<Vec3> = state.asteroids.iter().map(|a| a.pos).collect();

        state.toggle_pause();
        advance(&mut state);
        assert_eq!(state.time_ticks, 0);
        let unchanged: Vec<Vec3> = state.asteroids.iter().map(|a| a.pos).collect();
        assert_eq!(positions, unchanged);

        state.toggle_pause();
        advance(&mut state);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_homing_asteroids_converge_and_never_dodge() {
        let tuning = Tuning {
            movement_model: MovementModel::Homing,
            ..Default::default()
        };
        let mut state = SimulationState::with_tuning(9, tuning);
        state.asteroids.clear();
        push_asteroid(&mut state, Vec3::new(8.0, 0.0, -20.0), AsteroidKind::Normal, 1, 1.0);
        push_asteroid(&mut state, Vec3::new(10.0, 0.0, 200.0), AsteroidKind::Normal, 1, 1.0);
        let start = planar_distance(state.player.pos, state.asteroids[0].pos);

        for _ in 0..100 {
            advance(&mut state);
        }

        // The asteroid behind the player is pursuing, not dodged
        assert_eq!(state.asteroids.len(), 2);
        let now = planar_distance(state.player.pos, state.asteroids[0].pos);
        assert!(now < start);
    }

    #[test]
    fn test_determinism_same_seed_same_script() {
        let run = |seed: u64| {
            let mut state = SimulationState::new(seed);
            for t in 0..600u64 {
                if t % 3 == 0 {
                    state.strafe(1.0);
                }
                if t % 7 == 0 {
                    state.fire();
                }
                if t == 400 {
                    state.activate_bomb();
                }
                advance(&mut state);
            }
            state
        };

        let a = run(2024);
        let b = run(2024);

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.wave, b.wave);
        assert_eq!(a.bullets_missed, b.bullets_missed);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.asteroids.len(), b.asteroids.len());
        for (x, y) in a.asteroids.iter().zip(b.asteroids.iter()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.kind, y.kind);
        }
    }

    #[test]
    fn test_spawned_kinds_respect_wave_gate() {
        let mut state = SimulationState::new(77);
        assert!(
            state
                .asteroids
                .iter()
                .all(|a| a.kind == AsteroidKind::Normal),
            "wave 1 is all normal"
        );
        assert!(state.asteroids.iter().all(|a| a.shape == ShapeTag::Cube));

        // Waves 2-3 mix in fast, never large
        state.asteroids.clear();
        advance(&mut state);
        assert_eq!(state.wave, 2);
        assert!(
            state
                .asteroids
                .iter()
                .all(|a| a.kind != AsteroidKind::Large)
        );
    }
}
