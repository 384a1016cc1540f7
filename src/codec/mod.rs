//! Layout persistence formats.
//!
//! - [`binary`]: the legacy big-endian blob format (still used for the
//!   built-in Priority-Grid table).
//! - [`text`]: the JSON documents exchanged with the zone engine.
//! - [`LayoutCodec`]: file-level reads and writes of those documents.

pub mod binary;
mod store;
pub mod text;

use thiserror::Error;

use crate::layout::GridError;

pub use store::LayoutCodec;
pub use text::{EntryError, LoadReport};

/// Decoding and encoding failures for persisted layouts.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("truncated input: needed {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("value {value} of `{field}` does not fit the legacy format")]
    ValueOutOfRange { field: &'static str, value: i64 },
    #[error("unknown layout type `{0}`")]
    UnknownLayoutType(String),
    #[error("invalid uuid `{0}`")]
    InvalidUuid(String),
    #[error("layout `{0}` has no body to encode")]
    MissingBody(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}
