//! `gm-ingest`: OSM elements to geomap object store.
//!
//! # Crate layout
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`osm`]          | Raw `OsmElement` model (nodes, ways, relations)       |
//! | [`classify`]     | `WayClass`, classification, descriptor derivation     |
//! | [`multipolygon`] | `MultipolygonIndex`, ComplexArea assembly             |
//! | [`pipeline`]     | `ingest`, `IngestReport`, `IngestStats`               |
//! | [`xml`]          | `parse_osm_xml`, `read_osm_xml` (feature = `"xml"`)   |
//! | [`pbf`]          | `read_osm_pbf` (feature = `"pbf"`)                    |
//! | [`error`]        | `IngestError`, `IngestResult<T>`                      |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `xml`      | OSM XML reading via `quick-xml`.                          |
//! | `pbf`      | OSM PBF reading via `osmpbf`.                             |
//! | `parallel` | Way resolution on the rayon thread pool.                  |

pub mod classify;
pub mod error;
pub mod multipolygon;
pub mod osm;
pub mod pipeline;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "pbf")]
pub mod pbf;


pub use classify::{classify_way, WayClass};
pub use error::{IngestError, IngestResult};
pub use multipolygon::{Multipolygon, MultipolygonIndex};
pub use osm::{MemberKind, OsmElement, OsmMember, OsmNode, OsmRelation, OsmWay};
pub use pipeline::{ingest, IngestReport, IngestStats};
