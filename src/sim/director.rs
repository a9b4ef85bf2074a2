//! Round/wave director
//!
//! Decides what each round spawns and where, and runs the countdown between
//! rounds.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::enemy::spawn_enemy;
use super::projectile::clear_enemy_projectiles;
use super::state::{GameEvent, GamePhase, GameState, Host, SpawnMode};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::tuning::EnemyKind;

/// Enemy types for `round`, grunts first, capped at the on-screen limit
pub fn compute_spawn_composition(round: u32) -> Vec<EnemyKind> {
    let grunts = 3 + 2 * round as usize;
    let shooters = 1 + (round as usize * 3) / 2;
    let brutes = if round >= 2 { round as usize / 2 } else { 0 };

    std::iter::repeat_n(EnemyKind::Grunt, grunts)
        .chain(std::iter::repeat_n(EnemyKind::Shooter, shooters))
        .chain(std::iter::repeat_n(EnemyKind::Brute, brutes))
        .take(MAX_ENEMIES_ON_SCREEN)
        .collect()
}

/// Arc width and minimum radius for a layout
fn layout(mode: SpawnMode) -> (f32, f32) {
    match mode {
        SpawnMode::Spread => (SPREAD_ARC, SPREAD_MIN_RADIUS),
        SpawnMode::Frontal => (FRONTAL_ARC, FRONTAL_MIN_RADIUS),
    }
}

/// `count` positions spread evenly over the layout's arc in front of the
/// player (facing -Z), jittered within each slot
pub fn spawn_positions(rng: &mut Pcg32, count: usize, mode: SpawnMode, player: Vec3) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let (arc, min_radius) = layout(mode);
    let slot = arc / count as f32;

    (0..count)
        .map(|i| {
            let jitter = rng.random_range(-0.25f32..0.25) * slot;
            let angle = -arc / 2.0 + slot * (i as f32 + 0.5) + jitter;
            let radius = rng.random_range(min_radius..AREA_RADIUS);
            let height = rng.random_range(SPAWN_MIN_HEIGHT..=AREA_HEIGHT);

            let x = player.x + angle.sin() * radius;
            let z = player.z - angle.cos() * radius;
            Vec3::new(
                x.clamp(-BOUNDS_X, BOUNDS_X),
                height.clamp(BOUNDS_Y_MIN, BOUNDS_Y_MAX),
                z.clamp(-BOUNDS_Z, BOUNDS_Z),
            )
        })
        .collect()
}

/// Spawn the current round's wave
pub fn spawn_round(state: &mut GameState, host: &mut Host) {
    let round = state.session.round;
    let composition = compute_spawn_composition(round);
    let player = host.world.player_position();
    let positions = spawn_positions(&mut state.rng, composition.len(), state.spawn_mode, player);

    state.session.enemies_remaining = composition.len() as u32;
    for (kind, position) in composition.into_iter().zip(positions) {
        if let Err(e) = spawn_enemy(state, host, kind, position, player) {
            log::error!("Skipping spawn: {}", e);
            state.session.enemies_remaining = state.session.enemies_remaining.saturating_sub(1);
        }
    }

    let enemies = state.session.enemies_remaining;
    log::info!(
        "Round {} started: {} enemies ({:?} layout)",
        round,
        enemies,
        state.spawn_mode
    );
    state.events.push(GameEvent::RoundStarted { round, enemies });

    if enemies == 0 {
        log::warn!("Round {} has nothing to spawn", round);
        start_intermission(state, host);
    }
}

/// Advance the round counter and spawn it
pub fn start_next_round(state: &mut GameState, host: &mut Host) {
    state.session.round += 1;
    state.session.intermission_remaining = 0.0;
    state.set_phase(GamePhase::Playing);
    spawn_round(state, host);
}

/// Round cleared: begin the countdown and drop enemy shots still in flight
pub fn start_intermission(state: &mut GameState, host: &mut Host) {
    let round = state.session.round;
    state.set_phase(GamePhase::Intermission);
    state.session.intermission_remaining = state.tuning.intermission_duration;

    let cleared = clear_enemy_projectiles(state, host);
    log::info!(
        "Round {} complete, next round in {}s ({} projectiles cleared)",
        round,
        state.tuning.intermission_duration,
        cleared
    );
    state.events.push(GameEvent::RoundCleared { round });
    host.audio.play(SoundEffect::RoundClear, None);
}

/// Count the intermission down; the next round starts at zero
pub fn tick_intermission(state: &mut GameState, host: &mut Host, dt: f32) {
    if state.phase() != GamePhase::Intermission {
        return;
    }
    state.session.intermission_remaining -= dt;
    if state.session.intermission_remaining <= 0.0 {
        state.session.intermission_remaining = 0.0;
        start_next_round(state, host);
    }
}
