//! `gm-spatial`: grid index, map context, routing, search, and extraction.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`grid`]    | `GridIndex`, `CellKey`                                      |
//! | [`context`] | `MapContext` (store + grid + config, read-only)             |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`, snapping         |
//! | [`search`]  | Term scoring, `resolve_term`                                |
//! | [`query`]   | `ExtractQuery`, `extract`                                   |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on routes, hits, queries.  |

pub mod context;
pub mod error;
pub mod grid;
pub mod query;
pub mod router;
pub mod search;


pub use context::MapContext;
pub use error::{SpatialError, SpatialResult};
pub use grid::{CellKey, GridIndex};
pub use query::{extract, Bounds, ExtractQuery};
pub use router::{find_route, nearest_road_point, DijkstraRouter, Route, Router};
pub use search::{resolve_term, search, SearchHit};
