//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be deterministic:
//! - Caller-supplied frame delta, clamped
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Scene, audio and assets only through collaborator traits

pub mod collision;
pub mod combat;
pub mod cover;
pub mod director;
pub mod effects;
pub mod enemy;
pub mod menu;
pub mod projectile;
pub mod registry;
pub mod state;
pub mod tick;

pub use collision::Ray;
pub use combat::ShotOutcome;
pub use director::compute_spawn_composition;
pub use menu::{DebugItem, MenuItem, PauseMenu};
pub use registry::{Entity, EntityId, EntityKind, Registry};
pub use state::{GameEvent, GamePhase, GameState, Hand, Host, Session, SpawnMode};
pub use tick::{
    Action, ControllerId, InputEvent, end_session, handle_input, on_all_assets_ready, tick,
};
