//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `MapError` as one variant
//! where store or model errors can surface.

use thiserror::Error;

use crate::{ObjectId, ObjectKind};

/// Errors produced by `gm-core`.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("invalid object id {0:?}: expected <PREFIX>_<number>")]
    InvalidId(String),

    #[error("object {id} is not a {expected}")]
    KindMismatch { id: ObjectId, expected: ObjectKind },

    #[error("no {0} ids left to assign")]
    IdsExhausted(ObjectKind),

    #[error("malformed path: {0}")]
    MalformedPath(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `gm-core`.
pub type MapResult<T> = Result<T, MapError>;
