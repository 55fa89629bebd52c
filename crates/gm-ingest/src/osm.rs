//! Raw OSM element model.
//!
//! These are the records the pipeline consumes, independent of the file
//! format they were read from.  Coordinates are WGS-84 degrees; a node whose
//! `lon`/`lat` could not be read keeps `None` and is dropped at projection.

use gm_core::Tags;

#[derive(Clone, Debug, PartialEq)]
pub struct OsmNode {
    pub id:   i64,
    pub lon:  Option<f64>,
    pub lat:  Option<f64>,
    pub tags: Tags,
}

impl OsmNode {
    pub fn new(id: i64, lon: f64, lat: f64) -> Self {
        Self { id, lon: Some(lon), lat: Some(lat), tags: Tags::new() }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OsmWay {
    pub id:        i64,
    /// Node IDs in way order.
    pub node_refs: Vec<i64>,
    pub tags:      Tags,
}

impl OsmWay {
    pub fn new(id: i64, node_refs: Vec<i64>) -> Self {
        Self { id, node_refs, tags: Tags::new() }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Node,
    Way,
    Relation,
}

impl MemberKind {
    /// Parse the `type` attribute of a relation member.
    pub fn parse(s: &str) -> Option<MemberKind> {
        match s {
            "node"     => Some(MemberKind::Node),
            "way"      => Some(MemberKind::Way),
            "relation" => Some(MemberKind::Relation),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OsmMember {
    pub kind:      MemberKind,
    pub role:      String,
    pub reference: i64,
}

impl OsmMember {
    pub fn way(reference: i64, role: impl Into<String>) -> Self {
        Self { kind: MemberKind::Way, role: role.into(), reference }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OsmRelation {
    pub id:      i64,
    pub members: Vec<OsmMember>,
    pub tags:    Tags,
}

impl OsmRelation {
    pub fn new(id: i64, members: Vec<OsmMember>) -> Self {
        Self { id, members, tags: Tags::new() }
    }

    /// A `type=multipolygon` relation over the given outer and inner ways.
    pub fn multipolygon(id: i64, outer: &[i64], inner: &[i64]) -> Self {
        let members = outer
            .iter()
            .map(|&w| OsmMember::way(w, "outer"))
            .chain(inner.iter().map(|&w| OsmMember::way(w, "inner")))
            .collect();
        Self::new(id, members).with_tag("type", "multipolygon")
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Way members with the given role, in member order.
    pub fn ways_with_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = i64> + 'a {
        self.members
            .iter()
            .filter(move |m| m.kind == MemberKind::Way && m.role == role)
            .map(|m| m.reference)
    }
}

/// One record of an OSM document.
#[derive(Clone, Debug, PartialEq)]
pub enum OsmElement {
    Node(OsmNode),
    Way(OsmWay),
    Relation(OsmRelation),
}

impl From<OsmNode> for OsmElement {
    fn from(node: OsmNode) -> Self {
        OsmElement::Node(node)
    }
}

impl From<OsmWay> for OsmElement {
    fn from(way: OsmWay) -> Self {
        OsmElement::Way(way)
    }
}

impl From<OsmRelation> for OsmElement {
    fn from(relation: OsmRelation) -> Self {
        OsmElement::Relation(relation)
    }
}
