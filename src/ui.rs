//! HUD snapshot
//!
//! Built once per tick from the game state. Read-only: painting it is the
//! host's job.

use serde::Serialize;

use crate::sim::effects::player_hit_overlay_active;
use crate::sim::{DebugItem, GamePhase, GameState, Hand, MenuItem, SpawnMode};

/// Pause menu as the HUD should show it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuView {
    /// Debug submenu open
    pub debug: bool,
    /// Labels in display order
    pub items: Vec<&'static str>,
    pub selected: usize,
    pub spawn_mode: SpawnMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub health: u32,
    pub max_health: u32,
    pub round: u32,
    pub enemies_remaining: u32,
    /// Whole seconds, rounded up; zero outside intermission
    pub intermission_seconds_left: u32,
    pub time_remaining: f32,
    pub gun: Option<String>,
    pub hand: Hand,
    /// Red overlay after a player hit
    pub player_hit_flash: bool,
    /// Present only while paused
    pub menu: Option<MenuView>,
}

/// Build the HUD snapshot for the current tick
pub fn snapshot(state: &GameState) -> HudSnapshot {
    let session = &state.session;
    let intermission_seconds_left = if session.phase == GamePhase::Intermission
        || (session.phase == GamePhase::Paused && session.resume_phase == GamePhase::Intermission)
    {
        session.intermission_remaining.max(0.0).ceil() as u32
    } else {
        0
    };

    HudSnapshot {
        phase: session.phase,
        score: session.score,
        health: session.player_health,
        max_health: state.tuning.max_player_health,
        round: session.round,
        enemies_remaining: session.enemies_remaining,
        intermission_seconds_left,
        time_remaining: session.time_remaining,
        gun: state.equipped_gun().ok().map(|gun| gun.name.clone()),
        hand: session.equipped_hand,
        player_hit_flash: player_hit_overlay_active(state),
        menu: build_menu(state),
    }
}

fn build_menu(state: &GameState) -> Option<MenuView> {
    if state.phase() != GamePhase::Paused {
        return None;
    }
    let menu = &state.menu;
    let (items, selected): (Vec<&'static str>, usize) = if menu.debug {
        (
            DebugItem::ALL.iter().map(DebugItem::label).collect(),
            menu.selected_debug,
        )
    } else {
        (
            MenuItem::ALL.iter().map(MenuItem::label).collect(),
            menu.selected,
        )
    };
    Some(MenuView {
        debug: menu.debug,
        items,
        selected,
        spawn_mode: state.spawn_mode,
    })
}
