//! Error types for the shooter core.
//!
//! Nothing here is fatal: callers log the error and apply the recovery policy
//! for its category (skip the unit, substitute a placeholder, or treat a hit
//! as a miss).

use std::fmt;

#[derive(Debug)]
pub enum GameError {
    /// A spawn list named an enemy type with no archetype entry.
    UnknownEnemyType {
        /// The offending type key.
        key: String,
    },

    /// The equipped item index has no catalog entry.
    MissingItem {
        /// Index that was looked up.
        index: usize,
    },

    /// A model or sound failed to load.
    AssetFailed {
        /// Path of the asset as listed in the manifest.
        path: String,
    },

    /// A ray cast resolved to something that is not a live enemy or cover.
    UnrecognizedHit {
        /// Raw entity id reported by the world.
        id: u32,
    },

    /// Reading or writing a config file failed.
    Io(std::io::Error),

    /// A config file could not be parsed.
    Json(serde_json::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnknownEnemyType { key } => write!(f, "unknown enemy type '{}'", key),
            GameError::MissingItem { index } => {
                write!(f, "no equipped item configured at index {}", index)
            }
            GameError::AssetFailed { path } => write!(f, "failed to load asset '{}'", path),
            GameError::UnrecognizedHit { id } => write!(
                f,
                "ray hit entity {} which is not a recognized enemy or cover",
                id
            ),
            GameError::Io(e) => write!(f, "config i/o error: {}", e),
            GameError::Json(e) => write!(f, "config parse error: {}", e),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(e) => Some(e),
            GameError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Io(e)
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::Json(e)
    }
}
