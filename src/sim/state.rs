//! Game state and core simulation types
//!
//! All session data lives in one explicitly constructed [`SimulationState`].
//! There is no ambient/global state; `reset` rebuilds everything from
//! defaults. Intent entry points (strafe, fire, bomb, pause, ...) are plain
//! methods the input layer calls between ticks, and the render layer reads
//! the public collections plus [`HudStats`] and never writes back.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::heading_vector;
use crate::tuning::{ControlScheme, Tuning};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Ticks advance, intents are accepted
    Running,
    /// Frozen; only unpause and reset are accepted
    Paused,
    /// Terminal until reset
    GameOver,
}

/// Camera mode the render layer should use (cosmetic, toggled by intent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    ThirdPerson,
    FirstPerson,
}

/// Mesh family the render layer picks for an entity (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeTag {
    Cube,
    Sphere,
    Boss,
}

/// Asteroid variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidKind {
    Normal,
    Fast,
    Large,
}

impl AsteroidKind {
    /// Size range the spawner draws from
    pub fn size_range(self) -> (f32, f32) {
        match self {
            AsteroidKind::Normal => (0.8, 1.2),
            AsteroidKind::Fast => (0.4, 0.7),
            AsteroidKind::Large => (1.5, 2.5),
        }
    }

    /// Base speed before the per-wave multiplier
    pub fn base_speed(self) -> f32 {
        match self {
            AsteroidKind::Normal => 0.05,
            AsteroidKind::Fast => 0.1,
            AsteroidKind::Large => 0.03,
        }
    }

    pub fn hit_points(self) -> u8 {
        match self {
            AsteroidKind::Large => 2,
            _ => 1,
        }
    }

    /// Score awarded on a kill
    pub fn score(self) -> u64 {
        match self {
            AsteroidKind::Normal => 10,
            AsteroidKind::Fast => 15,
            AsteroidKind::Large => 20,
        }
    }

    pub fn shape(self) -> ShapeTag {
        match self {
            AsteroidKind::Fast => ShapeTag::Sphere,
            _ => ShapeTag::Cube,
        }
    }
}

/// Powerup variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Health,
    Speed,
    Shield,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Heading in degrees about y; only used by the rotate/thrust scheme
    pub rotation_deg: f32,
    /// Clamped to [0, PLAYER_MAX_HEALTH]
    pub health: u8,
    pub size: f32,
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            rotation_deg: 0.0,
            health: PLAYER_START_HEALTH,
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
        }
    }
}

/// A projectile fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec3,
    /// Heading in radians on the x/z plane (0 = +z)
    pub direction: f32,
    pub speed: f32,
    /// Cumulative distance traveled
    pub distance: f32,
    /// Removed (and counted as missed) past this range
    pub max_distance: f32,
    pub size: f32,
    /// Bomb-burst bullets are visual only and never count as missed
    pub decorative: bool,
}

/// An incoming asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec3,
    pub kind: AsteroidKind,
    pub size: f32,
    pub speed: f32,
    pub hit_points: u8,
    /// Cosmetic tumble, degrees per axis
    pub rotation: Vec3,
    pub spin: Vec3,
    pub shape: ShapeTag,
}

/// The boss asteroid; at most one alive, only during boss waves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec3,
    pub size: f32,
    pub speed: f32,
    pub hit_points: u32,
    pub rotation: Vec3,
    pub spin: Vec3,
    /// Proximity (z distance) at which the warning flash starts
    pub warning_distance: f32,
}

/// A collectible powerup drifting toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub pos: Vec3,
    pub kind: PowerupKind,
    pub size: f32,
    pub speed: f32,
    /// Cosmetic spin, degrees
    pub rotation: f32,
}

/// A transient explosion effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec3,
    pub size: f32,
    pub max_size: f32,
    pub growth_rate: f32,
    /// 1.0 at spawn, fades to 0
    pub alpha: f32,
    pub fade_rate: f32,
}

/// A background star (cosmetic, regenerated on reset, never ticked)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec3,
    pub brightness: f32,
}

/// Active timed power-up effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// Bullet speed x2 while nonzero
    pub boost_ticks: u32,
    /// Damage immunity while nonzero
    pub shield_ticks: u32,
}

/// Scalar session stats for the HUD, copied out per frame
#[derive(Debug, Clone, Serialize)]
pub struct HudStats {
    pub score: u64,
    pub wave: u32,
    pub health: u8,
    pub bullets_missed: u32,
    pub missed_cap: u32,
    pub bomb_cooldown: u32,
    pub paused: bool,
    pub game_over: bool,
    pub boss_warning: bool,
    pub warning_flash_ticks: u32,
    pub shield_active: bool,
    pub boost_active: bool,
    pub camera_mode: CameraMode,
}

/// Complete session state: one instance per run, reset rebuilds it
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: Phase,
    pub camera_mode: CameraMode,
    /// Accumulated tick counter; drives cosmetic pulsing deterministically
    pub time_ticks: u64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub boss: Option<Boss>,
    pub powerups: Vec<Powerup>,
    pub explosions: Vec<Explosion>,
    pub stars: Vec<Star>,
    pub score: u64,
    /// Starts at 1, advances on wave clear
    pub wave: u32,
    pub bullets_missed: u32,
    pub boss_warning: bool,
    pub warning_flash_ticks: u32,
    pub bomb_cooldown: u32,
    pub effects: ActiveEffects,
    next_id: u32,
}

impl SimulationState {
    /// Create a fresh session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a fresh session with explicit tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Running,
            camera_mode: CameraMode::ThirdPerson,
            time_ticks: 0,
            player: Player::default(),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            boss: None,
            powerups: Vec::new(),
            explosions: Vec::new(),
            stars: Vec::new(),
            score: 0,
            wave: 1,
            bullets_missed: 0,
            boss_warning: false,
            warning_flash_ticks: 0,
            bomb_cooldown: 0,
            effects: ActiveEffects::default(),
            next_id: 1,
        };

        state.generate_starfield();
        super::tick::spawn_wave(&mut state);

        state
    }

    /// Rebuild the whole session from defaults, keeping seed and tuning.
    /// Accepted in any phase.
    pub fn reset(&mut self) {
        let seed = self.seed;
        let tuning = self.tuning.clone();
        log::info!("resetting session (seed {seed})");
        *self = Self::with_tuning(seed, tuning);
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn generate_starfield(&mut self) {
        let extent = STAR_FIELD_EXTENT;
        self.stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec3::new(
                    self.rng.random_range(-extent..extent),
                    self.rng.random_range(-extent..extent),
                    self.rng.random_range(-extent..extent),
                ),
                brightness: self.rng.random_range(0.5..1.0),
            })
            .collect();
    }

    fn accepting_intents(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Heading of the ship in radians; fixed +z under the strafe scheme
    pub fn facing(&self) -> f32 {
        match self.tuning.control_scheme {
            ControlScheme::Strafe => 0.0,
            ControlScheme::RotateThrust => self.player.rotation_deg.to_radians(),
        }
    }

    // --- intent entry points -------------------------------------------------

    /// Lateral move intent; `dx` is a signed axis delta in key-repeat units.
    /// Only meaningful under the strafe scheme.
    pub fn strafe(&mut self, dx: f32) {
        if !self.accepting_intents() || self.tuning.control_scheme != ControlScheme::Strafe {
            return;
        }
        let x = self.player.pos.x + dx * self.player.speed;
        self.player.pos.x = x.clamp(-LATERAL_BOUND, LATERAL_BOUND);
    }

    /// Rotate intent in degrees; rotate/thrust scheme only
    pub fn rotate(&mut self, delta_deg: f32) {
        if !self.accepting_intents() || self.tuning.control_scheme != ControlScheme::RotateThrust {
            return;
        }
        self.player.rotation_deg = (self.player.rotation_deg + delta_deg).rem_euclid(360.0);
    }

    /// Thrust intent along the current facing; negative backs up.
    /// Rotate/thrust scheme only.
    pub fn thrust(&mut self, amount: f32) {
        if !self.accepting_intents() || self.tuning.control_scheme != ControlScheme::RotateThrust {
            return;
        }
        self.player.pos += heading_vector(self.facing()) * (amount * self.player.speed);
    }

    /// Fire one bullet from the ship's nose along its facing
    pub fn fire(&mut self) {
        if !self.accepting_intents() {
            return;
        }
        let direction = self.facing();
        let speed = if self.effects.boost_ticks > 0 {
            BULLET_SPEED * 2.0
        } else {
            BULLET_SPEED
        };
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: self.player.pos + heading_vector(direction) * self.player.size,
            direction,
            speed,
            distance: 0.0,
            max_distance: BULLET_MAX_RANGE,
            size: BULLET_SIZE,
            decorative: false,
        });
    }

    /// Bomb/cheat ability: instant-clears the field, then goes on cooldown.
    /// A no-op while the cooldown is nonzero.
    pub fn activate_bomb(&mut self) {
        if !self.accepting_intents() || self.bomb_cooldown > 0 {
            return;
        }
        self.bomb_cooldown = BOMB_COOLDOWN_TICKS;

        let cleared = std::mem::take(&mut self.asteroids);
        for asteroid in &cleared {
            self.add_explosion(asteroid.pos, asteroid.size * 1.5);
            self.score += 10;
        }

        if let Some(boss) = self.boss.take() {
            self.add_explosion(boss.pos, boss.size * 2.0);
            self.score += 100;
            self.boss_warning = false;
        }

        // Decorative ring of 24 bullets at 15 degree increments; short range,
        // exempt from the missed-bullet tally.
        for angle_deg in (0..360).step_by(15) {
            let direction = (angle_deg as f32).to_radians();
            let id = self.next_entity_id();
            self.bullets.push(Bullet {
                id,
                pos: self.player.pos + heading_vector(direction) * self.player.size,
                direction,
                speed: BULLET_SPEED * 1.5,
                distance: 0.0,
                max_distance: 10.0,
                size: 0.2,
                decorative: true,
            });
        }

        log::info!("bomb: cleared {} asteroids", cleared.len());
    }

    /// Flip between third- and first-person camera (render-layer cosmetic)
    pub fn toggle_camera(&mut self) {
        if !self.accepting_intents() {
            return;
        }
        self.camera_mode = match self.camera_mode {
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
        };
    }

    /// Pause toggle; accepted in any non-terminal phase
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::GameOver => Phase::GameOver,
        };
    }

    // --- shared mutation helpers --------------------------------------------

    pub(crate) fn add_explosion(&mut self, pos: Vec3, size: f32) {
        self.explosions.push(Explosion {
            pos,
            size,
            max_size: size * 2.5,
            growth_rate: EXPLOSION_GROWTH_RATE,
            alpha: 1.0,
            fade_rate: EXPLOSION_FADE_RATE,
        });
    }

    pub(crate) fn damage_player(&mut self, amount: u8) {
        self.player.health = self.player.health.saturating_sub(amount);
    }

    pub(crate) fn heal_player(&mut self, amount: u8) {
        self.player.health = (self.player.health + amount).min(PLAYER_MAX_HEALTH);
    }

    pub(crate) fn apply_powerup(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Health => self.heal_player(1),
            PowerupKind::Speed => self.effects.boost_ticks = BOOST_DURATION_TICKS,
            PowerupKind::Shield => self.effects.shield_ticks = SHIELD_DURATION_TICKS,
        }
        log::debug!("picked up {kind:?} powerup");
    }

    // --- render-facing surface ----------------------------------------------

    pub fn shield_active(&self) -> bool {
        self.effects.shield_ticks > 0
    }

    /// Shield glow phase in [0, 1], derived from the tick counter so the
    /// animation is reproducible. 0.0 while the shield is down.
    pub fn shield_pulse(&self) -> f32 {
        if !self.shield_active() {
            return 0.0;
        }
        let t = self.time_ticks as f32 * SIM_DT * 5.0;
        (t.sin() + 1.0) / 2.0
    }

    /// Scalar stats for HUD rendering
    pub fn hud_stats(&self) -> HudStats {
        HudStats {
            score: self.score,
            wave: self.wave,
            health: self.player.health,
            bullets_missed: self.bullets_missed,
            missed_cap: MAX_MISSED_BULLETS,
            bomb_cooldown: self.bomb_cooldown,
            paused: self.phase == Phase::Paused,
            game_over: self.phase == Phase::GameOver,
            boss_warning: self.boss_warning,
            warning_flash_ticks: self.warning_flash_ticks,
            shield_active: self.shield_active(),
            boost_active: self.effects.boost_ticks > 0,
            camera_mode: self.camera_mode,
        }
    }
}
