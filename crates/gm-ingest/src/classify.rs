//! Way classification and descriptor derivation.

use gm_core::{AreaCategory, AreaType, PartRole, PathCategory, PathType, Tags};

use crate::multipolygon::MultipolygonIndex;
use crate::osm::OsmWay;

/// What a way becomes in the store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WayClass {
    Highway,
    WaterWay,
    WaterArea,
    Land,
    Inner,
    Outer,
    /// Not mapped; the way is dropped.
    Other,
}

impl WayClass {
    pub fn is_path(self) -> bool {
        matches!(self, WayClass::Highway | WayClass::WaterWay)
    }

    pub fn part_role(self) -> Option<PartRole> {
        match self {
            WayClass::Inner => Some(PartRole::Inner),
            WayClass::Outer => Some(PartRole::Outer),
            _ => None,
        }
    }
}

/// Classify `way`.  Multipolygon membership wins over tags; among tags the
/// first match of `highway`, `waterway`, `natural=water`, `landuse` decides.
pub fn classify_way(way: &OsmWay, multipolygons: &MultipolygonIndex) -> WayClass {
    match multipolygons.role_of(way.id) {
        Some(PartRole::Inner) => return WayClass::Inner,
        Some(PartRole::Outer) => return WayClass::Outer,
        None => {}
    }
    let tags = &way.tags;
    if tags.contains_key("highway") {
        WayClass::Highway
    } else if tags.contains_key("waterway") {
        WayClass::WaterWay
    } else if tags.get("natural").is_some_and(|v| v == "water") {
        WayClass::WaterArea
    } else if tags.contains_key("landuse") {
        WayClass::Land
    } else {
        WayClass::Other
    }
}

/// Path descriptor for a `Highway` or `WaterWay` way.
pub fn path_type(class: WayClass, tags: &Tags) -> Option<PathType> {
    let (first, key) = match class {
        WayClass::Highway  => (PathCategory::Highway, "highway"),
        WayClass::WaterWay => (PathCategory::WaterWay, "waterway"),
        _ => return None,
    };
    tags.get(key).map(|second| PathType::new(first, second.clone()))
}

/// Area descriptor for an area or multipolygon part.
///
/// Second level: the `waterway` value, else the `landuse` value, else
/// `water` for `natural=water`, else `land` for outer parts and plain areas
/// and `none` for inner parts (holes).  `fallback` tags (the owning
/// relation's) are consulted when the way's own tags say nothing.
pub fn area_type(class: WayClass, tags: &Tags, fallback: Option<&Tags>) -> AreaType {
    let lookup = |key: &str| {
        tags.get(key)
            .or_else(|| fallback.and_then(|f| f.get(key)))
            .map(String::as_str)
    };
    let natural_water = lookup("natural") == Some("water");

    let first = if class == WayClass::WaterArea || lookup("waterway").is_some() || natural_water {
        AreaCategory::Water
    } else {
        AreaCategory::Land
    };

    let second = lookup("waterway")
        .or_else(|| lookup("landuse"))
        .or(natural_water.then_some("water"))
        .unwrap_or(if class == WayClass::Inner { AreaType::NONE } else { "land" });

    AreaType::new(first, second)
}
