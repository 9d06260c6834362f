//! Error types
//!
//! Gameplay outcomes (deaths, time-outs, game over) are events, not errors.
//! Only loading level definitions and configuration can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No level definition is bound to this overworld node
    #[error("no level defined for world {world}, node {node}")]
    UndefinedLevel { world: usize, node: usize },

    /// A level definition failed validation
    #[error("invalid level '{name}': {reason}")]
    InvalidLevel { name: String, reason: String },

    /// Level or settings JSON could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
