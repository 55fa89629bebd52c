//! Ingestion error type.
//!
//! Only reader failures and store exhaustion are errors.  Incomplete data
//! (unprojectable nodes, dangling references, multipolygons without an outer
//! ring) is counted in [`IngestStats`](crate::IngestStats) and logged instead.

use gm_core::MapError;
use thiserror::Error;

/// Errors produced by `gm-ingest`.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Map(#[from] MapError),

    #[cfg(feature = "xml")]
    #[error("OSM XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[cfg(feature = "pbf")]
    #[error("OSM PBF error: {0}")]
    Pbf(String),
}

pub type IngestResult<T> = Result<T, IngestError>;
