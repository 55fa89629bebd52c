//! Spatial-subsystem error type.

use thiserror::Error;

use gm_core::{MapError, PointId};

/// Errors produced by `gm-spatial`.
///
/// Routing keeps "no road near an endpoint" ([`NoNearbyRoad`]) apart from
/// "road found but not connected" ([`Unreachable`]); callers that need a
/// single empty-route answer can collapse them.
///
/// [`NoNearbyRoad`]: SpatialError::NoNearbyRoad
/// [`Unreachable`]: SpatialError::Unreachable
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("point {0} not found in store")]
    UnknownPoint(PointId),

    #[error("nothing matches search term {term:?}")]
    NoMatch { term: String },

    #[error("no routable road near {point}")]
    NoNearbyRoad { point: PointId },

    #[error("no route from {from} to {to}")]
    Unreachable { from: PointId, to: PointId },

    #[error("route search abandoned after {iterations} iterations")]
    BudgetExhausted { iterations: usize },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Map(#[from] MapError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
