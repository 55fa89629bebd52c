//! The geodata object model.
//!
//! # Ownership
//!
//! Points are owned once, by the [`ObjectStore`].  Every other object refers
//! to points by [`PointId`]:
//!
//! - a [`Path`] owns a small arena of [`PathPart`]s, each naming one point
//!   and the arena indices of its successors;
//! - an [`Area`] owns an ordered ring of point IDs.
//!
//! A path's part arena is tree-shaped by construction: a part's children
//! always sit at larger indices than the part itself, and every part except
//! the root (index 0) has exactly one parent.  Deserialised paths are checked
//! against the same rule.

use std::collections::BTreeMap;

use crate::geo;
use crate::{ComplexAreaPartId, MapError, MapResult, ObjectKind, ObjectStore, PointId, Tile};

/// Free-form key/value metadata carried over from the source data.
pub type Tags = BTreeMap<String, String>;

// ── Point ─────────────────────────────────────────────────────────────────────

/// A projected planar coordinate.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub tags: Tags,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, tags: Tags::new() }
    }

    /// Builder-style tag setter, mostly for fixtures.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn coords(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        geo::distance(self.coords(), other.coords())
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// First-level path descriptor.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PathCategory {
    Highway,
    WaterWay,
}

impl PathCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PathCategory::Highway  => "highway",
            PathCategory::WaterWay => "water_way",
        }
    }
}

/// Two-level descriptor, e.g. `highway` / `primary`.  Drives rendering style
/// and routing eligibility.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathType {
    #[cfg_attr(feature = "serde", serde(rename = "first_level_descriptor"))]
    pub first: PathCategory,
    #[cfg_attr(feature = "serde", serde(rename = "second_level_descriptor"))]
    pub second: String,
}

impl PathType {
    pub fn new(first: PathCategory, second: impl Into<String>) -> Self {
        Self { first, second: second.into() }
    }

    pub fn highway(second: impl Into<String>) -> Self {
        Self::new(PathCategory::Highway, second)
    }
}

/// One node of a path's branching sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPart {
    /// The point this part sits on.
    pub point: PointId,
    /// Arena indices of the successor parts.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub next: Vec<usize>,
}

/// A road, waterway, or other linear feature.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PathRepr"))]
pub struct Path {
    parts: Vec<PathPart>,
    #[cfg_attr(feature = "serde", serde(rename = "pathType"))]
    pub path_type: PathType,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub tags: Tags,
}

impl Path {
    /// A path consisting of a single root part.
    pub fn single(root: PointId, path_type: PathType) -> Self {
        Self {
            parts: vec![PathPart { point: root, next: Vec::new() }],
            path_type,
            tags: Tags::new(),
        }
    }

    /// Chain `points` into an unbranched path, each part linking to the next.
    ///
    /// Returns `None` if `points` is empty.
    pub fn connect_sequential(points: &[PointId], path_type: PathType) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let mut path = Self::single(first, path_type);
        let mut tail = 0;
        for &point in rest {
            tail = path.push_child(tail, point);
        }
        Some(path)
    }

    /// Add a successor of `parent` on `point`, forking if `parent` already
    /// has one.  Returns the new part's index.
    pub fn branch(&mut self, parent: usize, point: PointId) -> MapResult<usize> {
        if parent >= self.parts.len() {
            return Err(MapError::MalformedPath(format!(
                "parent part {parent} out of range (path has {} parts)",
                self.parts.len()
            )));
        }
        Ok(self.push_child(parent, point))
    }

    fn push_child(&mut self, parent: usize, point: PointId) -> usize {
        let index = self.parts.len();
        self.parts.push(PathPart { point, next: Vec::new() });
        self.parts[parent].next.push(index);
        index
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn root(&self) -> &PathPart {
        &self.parts[0]
    }

    pub fn parts(&self) -> &[PathPart] {
        &self.parts
    }

    /// Number of parts (never zero).
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always `false`; a path has at least its root part.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Point IDs in depth-first pre-order from the root.  For an unbranched
    /// path this is its point sequence.
    pub fn points(&self) -> Vec<PointId> {
        let mut out = Vec::with_capacity(self.parts.len());
        let mut stack = vec![0usize];
        while let Some(i) = stack.pop() {
            let part = &self.parts[i];
            out.push(part.point);
            stack.extend(part.next.iter().rev().copied());
        }
        out
    }

    /// The point in the middle of the flattened sequence.
    pub fn midpoint(&self) -> PointId {
        let points = self.points();
        points[points.len() / 2]
    }

    /// Copy every point this path references from `source` into `dest`,
    /// keeping IDs.  Points missing from `source` are skipped.  Repeating
    /// the copy leaves `dest` unchanged.
    ///
    /// Returns the number of points found in `source`.
    pub fn copy_contents(&self, source: &ObjectStore, dest: &mut ObjectStore) -> usize {
        let mut copied = 0;
        for id in self.points() {
            if let Some(point) = source.point(id) {
                dest.insert_point(id, point.clone());
                copied += 1;
            }
        }
        copied
    }

    /// Check the tree-shape rule on a raw part arena.
    fn validate_parts(parts: &[PathPart]) -> MapResult<()> {
        if parts.is_empty() {
            return Err(MapError::MalformedPath("path has no parts".into()));
        }
        let mut parent_count = vec![0u32; parts.len()];
        for (i, part) in parts.iter().enumerate() {
            for &child in &part.next {
                if child <= i || child >= parts.len() {
                    return Err(MapError::MalformedPath(format!(
                        "part {i} links to part {child}; successors must follow their parent"
                    )));
                }
                parent_count[child] += 1;
            }
        }
        if let Some(orphan) = parent_count.iter().skip(1).position(|&n| n != 1) {
            return Err(MapError::MalformedPath(format!(
                "part {} has {} parents, expected 1",
                orphan + 1,
                parent_count[orphan + 1]
            )));
        }
        Ok(())
    }
}

/// Unvalidated wire form of [`Path`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PathRepr {
    parts: Vec<PathPart>,
    #[serde(rename = "pathType")]
    path_type: PathType,
    #[serde(default)]
    tags: Tags,
}

#[cfg(feature = "serde")]
impl TryFrom<PathRepr> for Path {
    type Error = MapError;

    fn try_from(repr: PathRepr) -> MapResult<Path> {
        Path::validate_parts(&repr.parts)?;
        Ok(Path { parts: repr.parts, path_type: repr.path_type, tags: repr.tags })
    }
}

// ── Area ──────────────────────────────────────────────────────────────────────

/// First-level area descriptor.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AreaCategory {
    Land,
    Water,
}

/// Two-level area descriptor, e.g. `land` / `grass`.  A second level of
/// `none` marks a hole that renders transparent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaType {
    #[cfg_attr(feature = "serde", serde(rename = "first_level_descriptor"))]
    pub first: AreaCategory,
    #[cfg_attr(feature = "serde", serde(rename = "second_level_descriptor"))]
    pub second: String,
}

impl AreaType {
    pub const NONE: &'static str = "none";

    pub fn new(first: AreaCategory, second: impl Into<String>) -> Self {
        Self { first, second: second.into() }
    }

    /// `true` for holes drawn as transparent.
    pub fn is_none(&self) -> bool {
        self.second == Self::NONE
    }
}

/// A polygon ring.  The ring is implicitly closed: the last point connects
/// back to the first whether or not the IDs repeat.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    #[cfg_attr(feature = "serde", serde(rename = "mapPointIDs"))]
    pub points: Vec<PointId>,
    #[cfg_attr(feature = "serde", serde(rename = "areaType"))]
    pub area_type: AreaType,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub tags: Tags,
}

impl Area {
    pub fn new(points: Vec<PointId>, area_type: AreaType) -> Self {
        Self { points, area_type, tags: Tags::new() }
    }

    /// Ring point IDs with the first repeated at the end if not already.
    pub fn ring(&self) -> Vec<PointId> {
        let mut ring = self.points.clone();
        if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
            if first != last {
                ring.push(first);
            }
        }
        ring
    }

    /// Closed ring coordinates, skipping IDs missing from `store`.
    pub fn ring_coords(&self, store: &ObjectStore) -> Vec<(f64, f64)> {
        self.ring()
            .into_iter()
            .filter_map(|id| store.point(id).map(Point::coords))
            .collect()
    }

    /// Shoelace signed area; positive for counter-clockwise rings.
    pub fn signed_area(&self, store: &ObjectStore) -> f64 {
        let coords = self.ring_coords(store);
        coords
            .windows(2)
            .map(|w| w[0].0 * w[1].1 - w[1].0 * w[0].1)
            .sum::<f64>()
            / 2.0
    }

    pub fn is_clockwise(&self, store: &ObjectStore) -> bool {
        self.signed_area(store) < 0.0
    }

    /// Even-odd point-in-polygon test on the closed ring.
    pub fn contains(&self, store: &ObjectStore, x: f64, y: f64) -> bool {
        let coords = self.ring_coords(store);
        let mut inside = false;
        for w in coords.windows(2) {
            let ((x1, y1), (x2, y2)) = (w[0], w[1]);
            if (y1 > y) != (y2 > y) && x < (x2 - x1) * (y - y1) / (y2 - y1) + x1 {
                inside = !inside;
            }
        }
        inside
    }
}

// ── Complex areas ─────────────────────────────────────────────────────────────

/// Whether a multipolygon ring bounds the shape or cuts a hole in it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PartRole {
    Inner,
    Outer,
}

/// A ring used only as a building block of a [`ComplexArea`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplexAreaPart {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub area: Area,
    pub role: PartRole,
    /// OSM way the ring was built from, when ingested.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "sourceWay", default, skip_serializing_if = "Option::is_none")
    )]
    pub source_way: Option<i64>,
}

/// A polygon with holes: one outer part and any number of inner parts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplexArea {
    #[cfg_attr(feature = "serde", serde(rename = "outerAreaID"))]
    pub outer: ComplexAreaPartId,
    #[cfg_attr(feature = "serde", serde(rename = "innerAreaIDs"))]
    pub inner: Vec<ComplexAreaPartId>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub tags: Tags,
}

// ── GeoObject ─────────────────────────────────────────────────────────────────

/// Any object the store can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum GeoObject {
    Point(Point),
    Path(Path),
    Area(Area),
    ComplexAreaPart(ComplexAreaPart),
    ComplexArea(ComplexArea),
    Tile(Tile),
}

impl GeoObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            GeoObject::Point(_)           => ObjectKind::Point,
            GeoObject::Path(_)            => ObjectKind::Path,
            GeoObject::Area(_)            => ObjectKind::Area,
            GeoObject::ComplexAreaPart(_) => ObjectKind::ComplexAreaPart,
            GeoObject::ComplexArea(_)     => ObjectKind::ComplexArea,
            GeoObject::Tile(_)            => ObjectKind::Tile,
        }
    }

    /// Source metadata, where the kind carries any.
    pub fn tags(&self) -> Option<&Tags> {
        match self {
            GeoObject::Point(p)           => Some(&p.tags),
            GeoObject::Path(p)            => Some(&p.tags),
            GeoObject::Area(a)            => Some(&a.tags),
            GeoObject::ComplexAreaPart(p) => Some(&p.area.tags),
            GeoObject::ComplexArea(c)     => Some(&c.tags),
            GeoObject::Tile(_)            => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for GeoObject {
                #[inline]
                fn from(value: $ty) -> GeoObject {
                    GeoObject::$ty(value)
                }
            }
        )*
    };
}

impl_from_variant!(Point, Path, Area, ComplexAreaPart, ComplexArea, Tile);
