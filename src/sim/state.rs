//! Game state and core simulation types
//!
//! One `GameState` aggregate owns the session, the entity registry, tuning and
//! RNG. Every update function takes it by `&mut`; there are no globals.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::menu::PauseMenu;
use super::registry::{EntityId, Registry};
use crate::audio::AudioManager;
use crate::error::GameError;
use crate::settings::Settings;
use crate::tuning::{EnemyKind, GunConfig, Tuning};
use crate::world::World;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for external assets
    Loading,
    /// Assets ready, waiting for the start input
    AwaitingStart,
    /// Active gameplay
    Playing,
    /// Simulation frozen, pause menu open
    Paused,
    /// Between-round countdown
    Intermission,
    /// Run ended (health or time depleted)
    GameOver,
}

impl GamePhase {
    /// Whether the simulation clock advances in this phase
    pub fn clock_running(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Intermission)
    }
}

/// Which hand holds the gun
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn other(&self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }
}

/// Enemy spawn layout policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnMode {
    /// Wide arc around the player
    Spread,
    /// Narrow arc straight ahead, closer in
    Frontal,
}

impl SpawnMode {
    pub fn toggled(&self) -> Self {
        match self {
            SpawnMode::Spread => SpawnMode::Frontal,
            SpawnMode::Frontal => SpawnMode::Spread,
        }
    }
}

/// Per-play session values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    pub resume_phase: GamePhase,
    pub score: u64,
    pub player_health: u32,
    /// Current round (0 before the first round starts)
    pub round: u32,
    pub enemies_remaining: u32,
    /// Seconds left in the intermission countdown
    pub intermission_remaining: f32,
    /// Seconds left on the game clock
    pub time_remaining: f32,
    pub equipped_hand: Hand,
    pub equipped_item: usize,
    /// Simulation seconds elapsed; frozen while paused or game over
    pub sim_time: f32,
}

impl Session {
    pub fn new(tuning: &Tuning, hand: Hand, item: usize) -> Self {
        Self {
            phase: GamePhase::Loading,
            resume_phase: GamePhase::Playing,
            score: 0,
            player_health: tuning.max_player_health,
            round: 0,
            enemies_remaining: 0,
            intermission_remaining: 0.0,
            time_remaining: tuning.game_duration,
            equipped_hand: hand,
            equipped_item: item,
            sim_time: 0.0,
        }
    }
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    RoundStarted { round: u32, enemies: u32 },
    RoundCleared { round: u32 },
    EnemyDefeated { id: EntityId, kind: EnemyKind, points: u64 },
    PlayerHit { health: u32 },
    CoverDestroyed { id: EntityId },
    /// Host should end the XR session, then call `end_session`
    QuitRequested,
}

/// Collaborators borrowed for the duration of one call into the core
pub struct Host<'a> {
    pub world: &'a mut dyn World,
    pub audio: &'a mut AudioManager,
}

/// Complete game state
pub struct GameState {
    pub session: Session,
    pub registry: Registry,
    pub tuning: Tuning,
    /// Live gun catalog; debug tuning edits these copies
    pub guns: Vec<GunConfig>,
    pub menu: PauseMenu,
    pub spawn_mode: SpawnMode,
    /// Cosmetic effects (beams, hit flashes) enabled
    pub effects_enabled: bool,
    /// Effect clock; runs in every phase
    pub effect_time: f32,
    /// Cover has been placed in the scene
    pub scene_ready: bool,
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    seed: u64,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(tuning: Tuning, settings: &Settings, seed: u64) -> Self {
        let session = Session::new(&tuning, settings.preferred_hand, 0);
        Self {
            session,
            registry: Registry::default(),
            guns: tuning.guns.clone(),
            tuning,
            menu: PauseMenu::default(),
            spawn_mode: settings.spawn_mode,
            effects_enabled: settings.effects,
            effect_time: 0.0,
            scene_ready: false,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    /// Change phase, logging and recording the transition
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.session.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.session.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// The equipped item's configuration
    pub fn equipped_gun(&self) -> Result<&GunConfig, GameError> {
        let index = self.session.equipped_item;
        self.guns.get(index).ok_or(GameError::MissingItem { index })
    }

    pub fn equipped_gun_mut(&mut self) -> Result<&mut GunConfig, GameError> {
        let index = self.session.equipped_item;
        self.guns.get_mut(index).ok_or(GameError::MissingItem { index })
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
