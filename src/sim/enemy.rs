//! Enemy behavior
//!
//! Each enemy drifts its anchor, bobs around it on a sinusoid keyed to the
//! shared simulation clock, bounces off the arena bounds, faces the player and
//! fires on a randomized cooldown.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::projectile::fire_projectile;
use super::registry::{Entity, EntityId, EntityKind};
use super::state::{GameState, Host};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::error::GameError;
use crate::tuning::{EnemyArchetype, EnemyKind};
use crate::world::Visual;
use crate::{direction_to, yaw_pitch_toward};

#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
    pub points: u64,
    /// Hit sphere radius
    pub radius: f32,
    /// Rendered position (anchor + oscillation)
    pub position: Vec3,
    /// Drift-integrated base position
    pub anchor: Vec3,
    /// Drift velocity
    pub velocity: Vec3,
    pub oscillation_speed: f32,
    pub oscillation_amplitude: f32,
    pub shoot_interval: f32,
    pub time_since_last_shot: f32,
    /// Aggressiveness; shoot intervals are divided by it
    pub shoot_interval_factor: f32,
    pub projectile_speed: f32,
    pub yaw: f32,
    pub pitch: f32,
}

/// Next cooldown, bounded by the global min/max and scaled by aggressiveness
pub fn sample_shoot_interval(rng: &mut Pcg32, factor: f32) -> f32 {
    rng.random_range(MIN_SHOOT_INTERVAL..MAX_SHOOT_INTERVAL) / factor.max(0.01)
}

impl Enemy {
    pub fn from_archetype(
        kind: EnemyKind,
        archetype: &EnemyArchetype,
        position: Vec3,
        rng: &mut Pcg32,
    ) -> Self {
        let velocity = Vec3::new(
            (rng.random::<f32>() - 0.5) * DRIFT_SPEED_X,
            (rng.random::<f32>() - 0.5) * DRIFT_SPEED_Y,
            0.0,
        );
        let shoot_interval = sample_shoot_interval(rng, archetype.shoot_interval_factor);
        // Random initial delay so a fresh wave doesn't fire in unison
        let time_since_last_shot = rng.random::<f32>() * shoot_interval;

        Self {
            kind,
            health: archetype.health,
            max_health: archetype.health,
            points: archetype.points,
            radius: archetype.size,
            position,
            anchor: position,
            velocity,
            oscillation_speed: BASE_OSCILLATION_SPEED * archetype.speed_factor,
            oscillation_amplitude: archetype.oscillation_amplitude(),
            shoot_interval,
            time_since_last_shot,
            shoot_interval_factor: archetype.shoot_interval_factor,
            projectile_speed: archetype.projectile_speed,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn visual(&self) -> Visual {
        Visual::Enemy {
            kind: self.kind,
            position: self.position,
            radius: self.radius,
        }
    }

    /// Oscillation offset at global simulation time `time`
    pub fn oscillation(&self, time: f32) -> Vec3 {
        let speed = self.oscillation_speed;
        let amp = self.oscillation_amplitude;
        Vec3::new(
            (time * speed).sin() * amp,
            (time * speed * 0.8).cos() * amp * 0.5,
            0.0,
        )
    }

    /// Integrate drift, apply oscillation, and bounce off the bounds
    pub fn advance(&mut self, dt: f32, time: f32) {
        self.anchor += self.velocity * dt;
        let offset = self.oscillation(time);
        self.position = self.anchor + offset;

        reflect_axis(
            &mut self.position.x,
            &mut self.velocity.x,
            &mut self.anchor.x,
            offset.x,
            -BOUNDS_X,
            BOUNDS_X,
        );
        reflect_axis(
            &mut self.position.y,
            &mut self.velocity.y,
            &mut self.anchor.y,
            offset.y,
            BOUNDS_Y_MIN,
            BOUNDS_Y_MAX,
        );
        reflect_axis(
            &mut self.position.z,
            &mut self.velocity.z,
            &mut self.anchor.z,
            offset.z,
            -BOUNDS_Z,
            BOUNDS_Z,
        );
    }

    pub fn face(&mut self, target: Vec3) {
        let (yaw, pitch) = yaw_pitch_toward(self.position, target);
        self.yaw = yaw;
        self.pitch = pitch;
    }

    /// Accumulate the cooldown; true when a shot is due (timer and interval reset)
    pub fn tick_shot_timer(&mut self, dt: f32, rng: &mut Pcg32) -> bool {
        self.time_since_last_shot += dt;
        if self.time_since_last_shot >= self.shoot_interval {
            self.time_since_last_shot = 0.0;
            self.shoot_interval = sample_shoot_interval(rng, self.shoot_interval_factor);
            true
        } else {
            false
        }
    }
}

/// Clamp one axis into [min, max], point the drift back inward, and re-anchor
/// so the oscillation offset stays continuous
fn reflect_axis(pos: &mut f32, vel: &mut f32, anchor: &mut f32, offset: f32, min: f32, max: f32) {
    if *pos > max {
        *vel = -vel.abs();
        *pos = max;
        *anchor = max - offset;
    } else if *pos < min {
        *vel = vel.abs();
        *pos = min;
        *anchor = min - offset;
    }
}

/// Create an enemy of `kind` at `position`, facing `player`
pub fn spawn_enemy(
    state: &mut GameState,
    host: &mut Host,
    kind: EnemyKind,
    position: Vec3,
    player: Vec3,
) -> Result<EntityId, GameError> {
    let archetype = state.tuning.archetype(kind)?;
    let mut enemy = Enemy::from_archetype(kind, archetype, position, &mut state.rng);
    enemy.face(player);
    let (yaw, pitch) = (enemy.yaw, enemy.pitch);

    let id = state.registry.insert(host.world, Entity::Enemy(enemy));
    host.world.set_transform(id, position, yaw, pitch);
    Ok(id)
}

/// Advance every enemy by `dt` and fire any shots that come due
pub fn update_enemies(state: &mut GameState, host: &mut Host, dt: f32) {
    let time = state.session.sim_time;
    let player = host.world.player_position();
    let mut shots: Vec<(Vec3, f32)> = Vec::new();

    for id in state.registry.ids(EntityKind::Enemy) {
        let GameState { registry, rng, .. } = &mut *state;
        let Some(enemy) = registry.enemy_mut(id) else {
            continue;
        };

        enemy.advance(dt, time);
        enemy.face(player);
        host.world
            .set_transform(id, enemy.position, enemy.yaw, enemy.pitch);

        if enemy.tick_shot_timer(dt, rng) {
            shots.push((enemy.position, enemy.projectile_speed));
        }
    }

    for (from, speed) in shots {
        enemy_shoot(state, host, from, player, speed);
    }
}

/// Launch a projectile from just in front of the enemy toward the player
pub fn enemy_shoot(state: &mut GameState, host: &mut Host, from: Vec3, player: Vec3, speed: f32) {
    let direction = direction_to(from, player);
    let start = from + direction * ENEMY_SHOOT_OFFSET;
    fire_projectile(state, host, start, direction, speed, true);
    host.audio.play(SoundEffect::EnemyShoot, Some(from));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::settings::Settings;
    use crate::tuning::Tuning;
    use crate::world::HeadlessWorld;
    use rand::SeedableRng;

    fn grunt(rng: &mut Pcg32) -> Enemy {
        let tuning = Tuning::default();
        let arch = tuning.archetype(EnemyKind::Grunt).unwrap();
        Enemy::from_archetype(EnemyKind::Grunt, arch, Vec3::new(0.0, 2.0, -8.0), rng)
    }

    #[test]
    fn test_oscillation_uses_global_time() {
        let mut rng = Pcg32::seed_from_u64(3);
        let a = grunt(&mut rng);
        let b = grunt(&mut rng);
        // Same type, same clock: identical offsets regardless of spawn order
        assert_eq!(a.oscillation(12.5), b.oscillation(12.5));
    }

    #[test]
    fn test_advance_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut enemy = grunt(&mut rng);
        enemy.velocity = Vec3::new(40.0, 25.0, 0.0);
        let dt = 1.0 / 60.0;
        for i in 0..2000 {
            enemy.advance(dt, i as f32 * dt);
            assert!(enemy.position.x.abs() <= BOUNDS_X + 1e-4);
            assert!(enemy.position.y >= BOUNDS_Y_MIN - 1e-4);
            assert!(enemy.position.y <= BOUNDS_Y_MAX + 1e-4);
        }
    }

    #[test]
    fn test_reflection_reanchors_without_pop() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut enemy = grunt(&mut rng);
        enemy.anchor = Vec3::new(BOUNDS_X - 0.001, 2.0, -8.0);
        enemy.velocity = Vec3::new(1.0, 0.0, 0.0);
        let time = std::f32::consts::FRAC_PI_2 / enemy.oscillation_speed;
        enemy.advance(0.1, time);

        assert_eq!(enemy.position.x, BOUNDS_X);
        assert!(enemy.velocity.x < 0.0);
        let offset = enemy.oscillation(time);
        assert!((enemy.anchor.x + offset.x - enemy.position.x).abs() < 1e-5);
    }

    #[test]
    fn test_shot_interval_bounds() {
        let mut rng = Pcg32::seed_from_u64(6);
        for _ in 0..200 {
            let interval = sample_shoot_interval(&mut rng, 1.5);
            assert!(interval >= MIN_SHOOT_INTERVAL / 1.5);
            assert!(interval < MAX_SHOOT_INTERVAL / 1.5);
        }
    }

    #[test]
    fn test_enemy_fires_when_cooldown_expires() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 7);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        let player = host.world.player_position();
        let id = spawn_enemy(
            &mut state,
            &mut host,
            EnemyKind::Shooter,
            Vec3::new(0.0, 2.0, -8.0),
            player,
        )
        .unwrap();
        {
            let enemy = state.registry.enemy_mut(id).unwrap();
            enemy.time_since_last_shot = enemy.shoot_interval - 0.001;
        }

        update_enemies(&mut state, &mut host, 0.01);

        let projectiles: Vec<_> = state.registry.projectiles().collect();
        assert_eq!(projectiles.len(), 1);
        let (_, p) = projectiles[0];
        assert!(p.source_is_enemy);
        // Aimed at the player
        let to_player = (player - p.position).normalize();
        assert!(p.direction.dot(to_player) > 0.99);
        assert_eq!(state.registry.enemy(id).unwrap().time_since_last_shot, 0.0);
    }

    #[test]
    fn test_unknown_archetype_is_reported() {
        let mut tuning = Tuning::default();
        tuning.archetypes.clear();
        let mut state = GameState::new(tuning, &Settings::default(), 8);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        let result = spawn_enemy(&mut state, &mut host, EnemyKind::Brute, Vec3::ZERO, Vec3::ONE);
        assert!(matches!(result, Err(GameError::UnknownEnemyType { .. })));
        assert!(world.visuals.is_empty());
    }
}
