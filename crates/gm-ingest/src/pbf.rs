//! OSM PBF reader, enabled with the `pbf` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use gm_ingest::{ingest, pbf::read_osm_pbf};
//!
//! let report = ingest(read_osm_pbf(Path::new("cambridgeshire.osm.pbf"))?)?;
//! ```
//!
//! # Memory note
//!
//! Every element is buffered as an owned [`OsmElement`] before ingestion
//! starts, including nodes no way references.  For a county extract that is
//! a few million small records.

use std::path::Path;

use osmpbf::{Element, ElementReader, RelMemberType};

use gm_core::Tags;

use crate::osm::{MemberKind, OsmElement, OsmMember, OsmNode, OsmRelation, OsmWay};
use crate::{IngestError, IngestResult};

/// Read every node, way and relation from an OSM PBF file.
///
/// # Errors
///
/// [`IngestError::Pbf`] on decode errors, including failure to open the file.
pub fn read_osm_pbf(path: &Path) -> IngestResult<Vec<OsmElement>> {
    let reader = ElementReader::from_path(path).map_err(|e| IngestError::Pbf(e.to_string()))?;

    let mut elements = Vec::new();
    reader
        .for_each(|element| match element {
            Element::Node(n) => {
                elements.push(OsmElement::Node(OsmNode {
                    id:   n.id(),
                    lon:  Some(n.lon()),
                    lat:  Some(n.lat()),
                    tags: collect_tags(n.tags()),
                }));
            }
            Element::DenseNode(n) => {
                elements.push(OsmElement::Node(OsmNode {
                    id:   n.id(),
                    lon:  Some(n.lon()),
                    lat:  Some(n.lat()),
                    tags: collect_tags(n.tags()),
                }));
            }
            Element::Way(w) => {
                let mut way = OsmWay::new(w.id(), w.refs().collect());
                way.tags = collect_tags(w.tags());
                elements.push(OsmElement::Way(way));
            }
            Element::Relation(r) => {
                let members = r
                    .members()
                    .map(|m| OsmMember {
                        kind:      match m.member_type {
                            RelMemberType::Node     => MemberKind::Node,
                            RelMemberType::Way      => MemberKind::Way,
                            RelMemberType::Relation => MemberKind::Relation,
                        },
                        // Undecodable roles become the empty role.
                        role:      m.role().unwrap_or_default().to_string(),
                        reference: m.member_id,
                    })
                    .collect();
                let mut relation = OsmRelation::new(r.id(), members);
                relation.tags = collect_tags(r.tags());
                elements.push(OsmElement::Relation(relation));
            }
        })
        .map_err(|e| IngestError::Pbf(e.to_string()))?;

    Ok(elements)
}

fn collect_tags<'a>(tags: impl Iterator<Item = (&'a str, &'a str)>) -> Tags {
    tags.map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
