//! `gm-core`: object model, identity scheme, and object store for the
//! geomap workspace.
//!
//! This crate is a dependency of every other `gm-*` crate and has no `gm-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `ObjectKind`, `ObjectId`, typed `PointId`/`PathId`/…      |
//! | [`objects`] | `Point`, `Path`, `PathPart`, `Area`, complex areas        |
//! | [`tile`]    | `Tile`, tile file-name catalog                            |
//! | [`store`]   | `ObjectStore`                                             |
//! | [`geo`]     | Mercator projection, planar distance                      |
//! | [`config`]  | `MapConfig`                                               |
//! | [`error`]   | `MapError`, `MapResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | (default) serde derives and the persisted `{"db": …}` JSON |
//! |         | format on `ObjectStore`.                                   |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod objects;
pub mod store;
pub mod tile;

#[cfg(feature = "serde")]
mod persist;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MapConfig, DEFAULT_ACCEPTED_PATH_TYPES};
pub use error::{MapError, MapResult};
pub use ids::{
    AreaId, ComplexAreaId, ComplexAreaPartId, ObjectId, ObjectKind, PathId, PointId, TileId,
};
pub use objects::{
    Area, AreaCategory, AreaType, ComplexArea, ComplexAreaPart, GeoObject, PartRole, Path,
    PathCategory, PathPart, PathType, Point, Tags,
};
pub use store::ObjectStore;
pub use tile::{read_tile_catalog, tile_catalog, Tile};
