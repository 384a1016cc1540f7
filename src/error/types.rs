use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;
use crate::layout::GridError;

/// Unified result type for the zone layout crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by the zone layout engine.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("malformed layout data: {0}")]
    Malformed(#[from] CodecError),
    #[error("failed to access `{}`: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("grid layout error: {0}")]
    Grid(#[from] GridError),
    #[error("zone engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("zone count must be at least 1 (got {0})")]
    InvalidZoneCount(i32),
    #[error("layout id space exhausted")]
    IdsExhausted,
    #[error("layout `{name}` has no {expected} body")]
    BodyMismatch { name: String, expected: &'static str },
    #[error("invalid editor argument `{name}`: {reason}")]
    Config { name: &'static str, reason: String },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LayoutError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Config {
            name,
            reason: reason.into(),
        }
    }
}
