//! Input routing and per-frame tick
//!
//! Input events arrive between ticks and are applied immediately. A tick then
//! runs, in order: game clock, intermission countdown, enemies (Playing only),
//! projectiles (Playing or Intermission), cosmetic effects (always).

use serde::{Deserialize, Serialize};

use super::combat::{ShotOutcome, game_over, player_shoot};
use super::cover::{restore_breakable_cover, setup_cover};
use super::director::{start_next_round, tick_intermission};
use super::effects::update_effects;
use super::enemy::update_enemies;
use super::menu::{MenuCommand, MenuInput};
use super::projectile::update_projectiles;
use super::state::{GameEvent, GamePhase, GameState, Hand, Host, Session};
use crate::assets::{LoadReport, apply_report};
use crate::consts::MAX_DT;

/// Physical controller identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerId {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Trigger,
    Squeeze,
}

/// One discrete controller event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub controller: ControllerId,
    pub action: Action,
}

impl InputEvent {
    pub fn new(controller: ControllerId, action: Action) -> Self {
        Self { controller, action }
    }
}

/// What a controller does given which hand holds the gun
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Gun,
    OffHand,
}

/// The primary controller is the right hand
pub fn role_of(equipped_hand: Hand, controller: ControllerId) -> Role {
    match (equipped_hand, controller) {
        (Hand::Right, ControllerId::Primary) | (Hand::Left, ControllerId::Secondary) => Role::Gun,
        _ => Role::OffHand,
    }
}

/// Controller that currently holds the gun
pub fn gun_controller(equipped_hand: Hand) -> ControllerId {
    match equipped_hand {
        Hand::Right => ControllerId::Primary,
        Hand::Left => ControllerId::Secondary,
    }
}

/// Controller that currently does not hold the gun
pub fn off_controller(equipped_hand: Hand) -> ControllerId {
    gun_controller(equipped_hand.other())
}

/// Asset collaborator finished. Places cover once and leaves Loading; this is
/// the only way out of Loading, including after `end_session`.
pub fn on_all_assets_ready(state: &mut GameState, host: &mut Host, report: &LoadReport) {
    apply_report(report, &mut state.guns, host.audio);
    if !state.scene_ready {
        setup_cover(state, host);
    }
    equip_current(state, host);
    if state.phase() == GamePhase::Loading {
        state.set_phase(GamePhase::AwaitingStart);
    }
}

/// Route one input event by phase and controller role. Returns the shot
/// outcome when the input fired the gun.
pub fn handle_input(state: &mut GameState, host: &mut Host, event: InputEvent) -> Option<ShotOutcome> {
    let role = role_of(state.session.equipped_hand, event.controller);

    match state.phase() {
        GamePhase::Loading => {}
        GamePhase::AwaitingStart | GamePhase::GameOver => {
            if role == Role::OffHand && event.action == Action::Trigger {
                start_game(state, host);
            }
        }
        phase @ (GamePhase::Playing | GamePhase::Intermission) => match (role, event.action) {
            (Role::Gun, Action::Trigger) => {
                if phase == GamePhase::Playing {
                    return Some(player_shoot(state, host));
                }
            }
            (Role::Gun, Action::Squeeze) => cycle_gun(state, host),
            (Role::OffHand, Action::Trigger) => switch_hands(state, host),
            (Role::OffHand, Action::Squeeze) => toggle_pause(state),
        },
        GamePhase::Paused => {
            let input = match (role, event.action) {
                (Role::Gun, Action::Trigger) => MenuInput::Next,
                (Role::Gun, Action::Squeeze) => MenuInput::Previous,
                (Role::OffHand, Action::Trigger) => MenuInput::Confirm,
                (Role::OffHand, Action::Squeeze) => MenuInput::Back,
            };
            let gun = state.guns.get_mut(state.session.equipped_item);
            let command = state.menu.handle_input(input, gun);
            apply_menu_command(state, host, command);
        }
    }
    None
}

fn apply_menu_command(state: &mut GameState, host: &mut Host, command: MenuCommand) {
    match command {
        MenuCommand::None | MenuCommand::LogOffsets(_) => {}
        MenuCommand::Resume => toggle_pause(state),
        MenuCommand::ToggleSpawnMode => {
            state.spawn_mode = state.spawn_mode.toggled();
            log::info!("Spawn mode: {:?} (applies from the next round)", state.spawn_mode);
        }
        MenuCommand::Restart => start_game(state, host),
        MenuCommand::Quit => {
            log::info!("Quit requested");
            state.events.push(GameEvent::QuitRequested);
        }
        MenuCommand::GunAdjusted => equip_current(state, host),
    }
}

/// Fresh session at round 1. Hand and gun choice carry over.
pub fn start_game(state: &mut GameState, host: &mut Host) {
    let from = state.phase();
    let hand = state.session.equipped_hand;
    let item = state.session.equipped_item;

    state.registry.cleanup_dynamic(host.world);
    state.session = Session::new(&state.tuning, hand, item);
    state.session.phase = from;
    state.menu.reset();

    if state.scene_ready {
        restore_breakable_cover(state, host);
    } else {
        setup_cover(state, host);
    }
    equip_current(state, host);

    log::info!("Game started (seed {})", state.seed());
    start_next_round(state, host);
}

/// Playing/Intermission <-> Paused
pub fn toggle_pause(state: &mut GameState) {
    match state.phase() {
        phase @ (GamePhase::Playing | GamePhase::Intermission) => {
            state.session.resume_phase = phase;
            state.menu.reset();
            state.set_phase(GamePhase::Paused);
        }
        GamePhase::Paused => {
            let resume = state.session.resume_phase;
            state.set_phase(resume);
        }
        _ => {}
    }
}

/// Move the gun to the other hand
pub fn switch_hands(state: &mut GameState, host: &mut Host) {
    state.session.equipped_hand = state.session.equipped_hand.other();
    log::info!("Gun switched to {:?} hand", state.session.equipped_hand);
    equip_current(state, host);
}

/// Next gun in the catalog
pub fn cycle_gun(state: &mut GameState, host: &mut Host) {
    if state.guns.is_empty() {
        log::error!("No guns configured");
        return;
    }
    state.session.equipped_item = (state.session.equipped_item + 1) % state.guns.len();
    equip_current(state, host);
}

fn equip_current(state: &mut GameState, host: &mut Host) {
    let hand = state.session.equipped_hand;
    match state.equipped_gun() {
        Ok(gun) => {
            if gun.placeholder {
                log::warn!("{} model missing, equipping placeholder", gun.name);
            }
            log::debug!("Equipped {} in {:?} hand", gun.name, hand);
            host.world.equip(hand, gun);
        }
        Err(e) => log::error!("{}", e),
    }
}

/// The XR session ended: clear everything dynamic and wait in Loading until
/// the host reports assets ready for the next one
pub fn end_session(state: &mut GameState, host: &mut Host) {
    let removed = state.registry.cleanup_dynamic(host.world);
    let hand = state.session.equipped_hand;
    let item = state.session.equipped_item;
    let from = state.phase();
    state.session = Session::new(&state.tuning, hand, item);
    state.session.phase = from;
    state.menu.reset();
    state.set_phase(GamePhase::Loading);
    log::info!("Session ended, {} entities cleared", removed);
}

/// Advance the simulation by one frame
pub fn tick(state: &mut GameState, host: &mut Host, dt: f32) {
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };

    if state.phase() == GamePhase::Loading {
        update_effects(state, host, dt);
        return;
    }

    if state.phase().clock_running() {
        state.session.sim_time += dt;
        state.session.time_remaining = (state.session.time_remaining - dt).max(0.0);
        if state.session.time_remaining <= 0.0 {
            log::info!("Game Over - time expired");
            game_over(state, host);
        }
    }

    tick_intermission(state, host, dt);

    if state.phase() == GamePhase::Playing {
        update_enemies(state, host, dt);
    }
    if state.phase().clock_running() {
        update_projectiles(state, host, dt);
    }

    update_effects(state, host, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::settings::Settings;
    use crate::sim::projectile::fire_projectile;
    use crate::sim::registry::{Entity, EntityKind};
    use crate::tuning::Tuning;
    use crate::world::{HeadlessWorld, Visual};
    use glam::Vec3;

    fn off_trigger(state: &GameState) -> InputEvent {
        InputEvent::new(off_controller(state.session.equipped_hand), Action::Trigger)
    }

    fn off_squeeze(state: &GameState) -> InputEvent {
        InputEvent::new(off_controller(state.session.equipped_hand), Action::Squeeze)
    }

    fn gun_trigger(state: &GameState) -> InputEvent {
        InputEvent::new(gun_controller(state.session.equipped_hand), Action::Trigger)
    }

    /// Ready and in round 1
    fn started(state: &mut GameState, host: &mut Host) {
        on_all_assets_ready(state, host, &LoadReport::default());
        let event = off_trigger(state);
        handle_input(state, host, event);
    }

    #[test]
    fn test_role_mapping() {
        assert_eq!(role_of(Hand::Right, ControllerId::Primary), Role::Gun);
        assert_eq!(role_of(Hand::Right, ControllerId::Secondary), Role::OffHand);
        assert_eq!(role_of(Hand::Left, ControllerId::Primary), Role::OffHand);
        assert_eq!(role_of(Hand::Left, ControllerId::Secondary), Role::Gun);
    }

    #[test]
    fn test_loading_ignores_input() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 30);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        let event = off_trigger(&state);
        handle_input(&mut state, &mut host, event);
        tick(&mut state, &mut host, 0.016);
        assert_eq!(state.phase(), GamePhase::Loading);
        assert_eq!(state.session.round, 0);
    }

    #[test]
    fn test_ready_then_start() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 31);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        on_all_assets_ready(&mut state, &mut host, &LoadReport::default());
        assert_eq!(state.phase(), GamePhase::AwaitingStart);
        assert_eq!(state.registry.count(EntityKind::Cover), 4);

        // Gun trigger does not start
        let event = gun_trigger(&state);
        handle_input(&mut state, &mut host, event);
        assert_eq!(state.phase(), GamePhase::AwaitingStart);

        let event = off_trigger(&state);
        handle_input(&mut state, &mut host, event);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.session.round, 1);
        assert_eq!(state.session.enemies_remaining, 7);
        assert_eq!(world.equipped, Some((Hand::Right, "Pistol".to_string())));
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 32);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);
        tick(&mut state, &mut host, 0.05);

        let event = off_squeeze(&state);
        handle_input(&mut state, &mut host, event);
        assert_eq!(state.phase(), GamePhase::Paused);

        let time = state.session.sim_time;
        let remaining = state.session.time_remaining;
        let positions: Vec<Vec3> = state.registry.enemies().map(|(_, e)| e.position).collect();
        for _ in 0..100 {
            tick(&mut state, &mut host, 0.1);
        }
        assert_eq!(state.session.sim_time, time);
        assert_eq!(state.session.time_remaining, remaining);
        let after: Vec<Vec3> = state.registry.enemies().map(|(_, e)| e.position).collect();
        assert_eq!(positions, after);

        // Off squeeze in the main menu resumes
        let event = off_squeeze(&state);
        handle_input(&mut state, &mut host, event);
        assert_eq!(state.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_game_over_freezes_simulation() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 42);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);
        tick(&mut state, &mut host, 0.05);
        let shot = fire_projectile(&mut state, &mut host, Vec3::new(0.0, 2.0, -8.0), Vec3::NEG_Z, 5.0, true);
        game_over(&mut state, &mut host);

        let time = state.session.sim_time;
        let remaining = state.session.time_remaining;
        let enemies: Vec<Vec3> = state.registry.enemies().map(|(_, e)| e.position).collect();
        let timers: Vec<f32> = state
            .registry
            .enemies()
            .map(|(_, e)| e.time_since_last_shot)
            .collect();
        let projectiles = state.registry.count(EntityKind::Projectile);
        for _ in 0..100 {
            tick(&mut state, &mut host, 0.1);
        }

        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.session.sim_time, time);
        assert_eq!(state.session.time_remaining, remaining);
        let after: Vec<Vec3> = state.registry.enemies().map(|(_, e)| e.position).collect();
        assert_eq!(enemies, after);
        let after: Vec<f32> = state
            .registry
            .enemies()
            .map(|(_, e)| e.time_since_last_shot)
            .collect();
        assert_eq!(timers, after);
        assert_eq!(state.registry.count(EntityKind::Projectile), projectiles);
        match state.registry.get(shot) {
            Some(Entity::Projectile(p)) => assert_eq!(p.position, Vec3::new(0.0, 2.0, -8.0)),
            other => panic!("projectile missing: {:?}", other.is_some()),
        }
    }

    #[test]
    fn test_intermission_moves_projectiles_not_enemies() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 43);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);
        crate::sim::director::start_intermission(&mut state, &mut host);
        // Launched after the round-end sweep, heading away from the player
        let shot = fire_projectile(&mut state, &mut host, Vec3::new(0.0, 2.0, -8.0), Vec3::NEG_Z, 5.0, true);

        let enemies: Vec<Vec3> = state.registry.enemies().map(|(_, e)| e.position).collect();
        assert!(!enemies.is_empty());
        let time = state.session.sim_time;
        tick(&mut state, &mut host, 0.1);

        assert_eq!(state.phase(), GamePhase::Intermission);
        assert!(state.session.sim_time > time);
        let after: Vec<Vec3> = state.registry.enemies().map(|(_, e)| e.position).collect();
        assert_eq!(enemies, after);
        match state.registry.get(shot) {
            Some(Entity::Projectile(p)) => {
                assert!((p.position.z - (-8.5)).abs() < 1e-4);
            }
            other => panic!("projectile missing: {:?}", other.is_some()),
        }
        assert!((state.session.intermission_remaining - 4.9).abs() < 1e-4);
    }

    #[test]
    fn test_pause_during_intermission_resumes_intermission() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 33);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);
        crate::sim::director::start_intermission(&mut state, &mut host);
        toggle_pause(&mut state);
        tick(&mut state, &mut host, 0.1);
        assert_eq!(state.session.intermission_remaining, 5.0);
        toggle_pause(&mut state);
        assert_eq!(state.phase(), GamePhase::Intermission);
    }

    #[test]
    fn test_intermission_does_not_shoot() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 34);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);
        crate::sim::director::start_intermission(&mut state, &mut host);
        let event = gun_trigger(&state);
        assert_eq!(handle_input(&mut state, &mut host, event), None);
        assert_eq!(
            world.count_where(|v| matches!(v, Visual::Beam { .. })),
            0
        );
    }

    #[test]
    fn test_hand_switch_and_gun_cycle() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 35);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);

        // Right hand holds the gun, so the secondary controller is the off hand
        handle_input(
            &mut state,
            &mut host,
            InputEvent::new(ControllerId::Secondary, Action::Trigger),
        );
        assert_eq!(state.session.equipped_hand, Hand::Left);

        // Now the secondary controller holds the gun; its squeeze cycles
        handle_input(
            &mut state,
            &mut host,
            InputEvent::new(ControllerId::Secondary, Action::Squeeze),
        );
        assert_eq!(state.session.equipped_item, 1);
        assert_eq!(world.equipped, Some((Hand::Left, "Shotgun".to_string())));
    }

    #[test]
    fn test_time_runs_out() {
        let mut tuning = Tuning::default();
        tuning.game_duration = 0.25;
        let mut state = GameState::new(tuning, &Settings::default(), 36);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);
        for _ in 0..3 {
            tick(&mut state, &mut host, 0.1);
        }
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.session.time_remaining, 0.0);
    }

    #[test]
    fn test_restart_after_game_over_resets_session() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 37);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);
        state.session.score = 120;
        state.session.round = 3;
        state.session.player_health = 10;
        crate::sim::combat::damage_player(&mut state, &mut host);
        assert_eq!(state.phase(), GamePhase::GameOver);

        let event = off_trigger(&state);
        handle_input(&mut state, &mut host, event);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.session.round, 1);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.player_health, 100);
        assert_eq!(state.registry.count(EntityKind::Enemy), 7);
    }

    #[test]
    fn test_menu_quit_and_spawn_toggle() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 38);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);
        toggle_pause(&mut state);
        state.drain_events();

        let next = gun_trigger(&state);
        let confirm = off_trigger(&state);
        // LogOffsets -> EnterDebug -> ToggleSpawnMode
        handle_input(&mut state, &mut host, next);
        handle_input(&mut state, &mut host, next);
        handle_input(&mut state, &mut host, confirm);
        assert_eq!(state.spawn_mode, crate::sim::SpawnMode::Frontal);

        // -> Restart -> Quit
        handle_input(&mut state, &mut host, next);
        handle_input(&mut state, &mut host, next);
        handle_input(&mut state, &mut host, confirm);
        assert_eq!(state.drain_events(), vec![GameEvent::QuitRequested]);
        assert_eq!(state.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_end_session_clears_dynamic_entities() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 39);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        started(&mut state, &mut host);
        for _ in 0..50 {
            tick(&mut state, &mut host, 0.1);
        }
        end_session(&mut state, &mut host);
        assert_eq!(state.phase(), GamePhase::Loading);
        assert_eq!(state.registry.count(EntityKind::Enemy), 0);
        assert_eq!(state.registry.count(EntityKind::Projectile), 0);
        assert_eq!(state.registry.count(EntityKind::Effect), 0);
        assert_eq!(state.session.score, 0);

        // Waits for the ready signal again
        tick(&mut state, &mut host, 0.016);
        assert_eq!(state.phase(), GamePhase::Loading);
        on_all_assets_ready(&mut state, &mut host, &LoadReport::default());
        assert_eq!(state.phase(), GamePhase::AwaitingStart);
        assert_eq!(state.registry.count(EntityKind::Cover), 4);
        assert_eq!(
            world.count_where(|v| !matches!(v, Visual::Cover { .. })),
            0
        );
    }
}
