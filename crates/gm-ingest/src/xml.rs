//! OSM XML reader, enabled with the `xml` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use gm_ingest::{ingest, xml::read_osm_xml};
//!
//! let report = ingest(read_osm_xml(Path::new("cambridge.osm"))?)?;
//! ```
//!
//! Recognised elements are `node`, `way` and `relation` with their `tag`,
//! `nd` and `member` children; everything else (`bounds`, changesets,
//! metadata) is skipped.  A `node`, `way` or `relation` without a numeric
//! `id` is skipped; unreadable coordinates leave the node without a
//! position rather than failing the read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::osm::{MemberKind, OsmElement, OsmMember, OsmNode, OsmRelation, OsmWay};
use crate::IngestResult;

/// Read and parse an `.osm` file.
pub fn read_osm_xml(path: &Path) -> IngestResult<Vec<OsmElement>> {
    let file = File::open(path)?;
    parse_osm_xml(BufReader::new(file))
}

/// Parse an OSM XML document into raw elements, in document order.
pub fn parse_osm_xml<R: BufRead>(input: R) -> IngestResult<Vec<OsmElement>> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut elements = Vec::new();
    let mut current: Option<OsmElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => {
                if let Some(element) = open_element(&e)? {
                    current = Some(element);
                } else {
                    attach_child(&e, current.as_mut())?;
                }
            }
            Event::Empty(e) => {
                if let Some(element) = open_element(&e)? {
                    elements.push(element);
                } else {
                    attach_child(&e, current.as_mut())?;
                }
            }
            Event::End(e) => {
                if matches!(e.name().as_ref(), b"node" | b"way" | b"relation") {
                    if let Some(element) = current.take() {
                        elements.push(element);
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(elements)
}

/// Start a `node`, `way` or `relation`; `None` for any other tag, or when
/// the element has no usable `id`.
fn open_element(e: &BytesStart<'_>) -> IngestResult<Option<OsmElement>> {
    let name = e.name();
    let kind = name.as_ref();
    if !matches!(kind, b"node" | b"way" | b"relation") {
        return Ok(None);
    }
    let Some(id) = attr(e, b"id")?.and_then(|v| v.parse::<i64>().ok()) else {
        debug!("skipping <{}> without a numeric id", String::from_utf8_lossy(kind));
        return Ok(None);
    };
    let element = match kind {
        b"node" => {
            let lon = attr(e, b"lon")?.and_then(|v| v.parse::<f64>().ok());
            let lat = attr(e, b"lat")?.and_then(|v| v.parse::<f64>().ok());
            OsmElement::Node(OsmNode { id, lon, lat, tags: Default::default() })
        }
        b"way" => OsmElement::Way(OsmWay::new(id, Vec::new())),
        _ => OsmElement::Relation(OsmRelation::new(id, Vec::new())),
    };
    Ok(Some(element))
}

/// Attach a `tag`, `nd` or `member` child to the open element.
fn attach_child(e: &BytesStart<'_>, parent: Option<&mut OsmElement>) -> IngestResult<()> {
    let Some(parent) = parent else { return Ok(()) };
    match e.name().as_ref() {
        b"tag" => {
            if let (Some(k), Some(v)) = (attr(e, b"k")?, attr(e, b"v")?) {
                let tags = match parent {
                    OsmElement::Node(n)     => &mut n.tags,
                    OsmElement::Way(w)      => &mut w.tags,
                    OsmElement::Relation(r) => &mut r.tags,
                };
                tags.insert(k, v);
            }
        }
        b"nd" => {
            if let OsmElement::Way(way) = parent {
                if let Some(r) = attr(e, b"ref")?.and_then(|v| v.parse::<i64>().ok()) {
                    way.node_refs.push(r);
                }
            }
        }
        b"member" => {
            if let OsmElement::Relation(relation) = parent {
                let kind = attr(e, b"type")?.as_deref().and_then(MemberKind::parse);
                let reference = attr(e, b"ref")?.and_then(|v| v.parse::<i64>().ok());
                if let (Some(kind), Some(reference)) = (kind, reference) {
                    let role = attr(e, b"role")?.unwrap_or_default();
                    relation.members.push(OsmMember { kind, role, reference });
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> IngestResult<Option<String>> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
