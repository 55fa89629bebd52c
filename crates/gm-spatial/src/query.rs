//! Map-extraction queries.
//!
//! An [`ExtractQuery`] is what the request layer hands over: an optional
//! bounding box, a path-type allow-list, and a tiles-only switch.
//! [`extract`] answers it with a new, self-contained [`ObjectStore`] holding
//! the selected objects and every point they reference.

use std::collections::HashMap;
use std::hash::BuildHasher;

use rustc_hash::FxHashSet;

use gm_core::{ObjectId, ObjectKind, ObjectStore, PointId};

use crate::context::MapContext;
use crate::{SpatialError, SpatialResult};

/// Integer bounding box `[x, x + width) × [y, y + height)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub x:      i64,
    pub y:      i64,
    pub width:  i64,
    pub height: i64,
}

impl Bounds {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let (x, y) = (self.x as f64, self.y as f64);
        px >= x && px < x + self.width as f64 && py >= y && py < y + self.height as f64
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractQuery {
    /// `None` disables spatial filtering.
    pub bounds: Option<Bounds>,
    /// Second-level path descriptors to keep; empty keeps every path.
    pub path_types: Vec<String>,
    /// Return only the tile catalog.
    pub map_tiles_only: bool,
}

impl ExtractQuery {
    /// Parse request parameters.
    ///
    /// | Key                          | Format                | Default  |
    /// |------------------------------|-----------------------|----------|
    /// | `x`, `y`, `width`, `height`  | integers              | required |
    /// | `pathTypes`                  | JSON array of strings | `[]`     |
    /// | `mapTilesOnly`               | `true` / `false`      | `false`  |
    /// | `noMapAreaFilter`            | `true` / `false`      | `false`  |
    ///
    /// The bounding-box fields are ignored when either flag is set.
    ///
    /// Any malformed or missing field is [`SpatialError::InvalidQuery`].
    pub fn from_params<S: BuildHasher>(params: &HashMap<String, String, S>) -> SpatialResult<Self> {
        let get = |key: &str| params.get(key).map(String::as_str);

        let map_tiles_only = parse_flag(get("mapTilesOnly"), "mapTilesOnly")?;
        let no_area_filter = parse_flag(get("noMapAreaFilter"), "noMapAreaFilter")?;

        let path_types = match get("pathTypes") {
            None => Vec::new(),
            Some(raw) => serde_json::from_str::<Vec<String>>(raw).map_err(|e| {
                SpatialError::InvalidQuery(format!("pathTypes must be a JSON array of strings: {e}"))
            })?,
        };

        let bounds = if map_tiles_only || no_area_filter {
            None
        } else {
            let int = |key: &str| -> SpatialResult<i64> {
                let raw = get(key)
                    .ok_or_else(|| SpatialError::InvalidQuery(format!("missing {key}")))?;
                raw.trim().parse().map_err(|_| {
                    SpatialError::InvalidQuery(format!("{key} must be an integer, got {raw:?}"))
                })
            };
            Some(Bounds { x: int("x")?, y: int("y")?, width: int("width")?, height: int("height")? })
        };

        Ok(ExtractQuery { bounds, path_types, map_tiles_only })
    }

    fn keeps_path_type(&self, second: &str) -> bool {
        self.path_types.is_empty() || self.path_types.iter().any(|t| t == second)
    }
}

fn parse_flag(raw: Option<&str>, key: &str) -> SpatialResult<bool> {
    match raw.map(str::trim) {
        None => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(SpatialError::InvalidQuery(format!(
            "{key} must be true or false, got {other:?}"
        ))),
    }
}

/// Build the response store for `query`.
///
/// - Tiles-only: the tile catalog and nothing else.
/// - Otherwise: Points inside the bounds; Paths passing the allow-list with
///   any point in a touched cell, with all their points; Areas and
///   ComplexAreaParts with a vertex inside the bounds, with their points;
///   ComplexAreas whose outer part was selected, with their inner parts.
pub fn extract(ctx: &MapContext, query: &ExtractQuery) -> SpatialResult<ObjectStore> {
    let store = ctx.store();

    if query.map_tiles_only {
        let tiles = store.by_kind(&[ObjectKind::Tile]).map(|(id, _)| id);
        return Ok(store.subset(tiles));
    }

    let candidates: FxHashSet<ObjectId> = match query.bounds {
        Some(b) => ctx.grid().contents_of_bounds(
            b.x as f64,
            b.y as f64,
            b.width as f64,
            b.height as f64,
        ),
        None => store.ids().filter(|id| id.kind() != ObjectKind::Tile).collect(),
    };
    let in_bounds = |p: PointId| match (query.bounds, store.point(p)) {
        (None, Some(_)) => true,
        (Some(b), Some(point)) => b.contains(point.x, point.y),
        (_, None) => false,
    };

    let mut out = ObjectStore::new();
    let mut selected: FxHashSet<ObjectId> = FxHashSet::default();
    let mut ring_points: FxHashSet<PointId> = FxHashSet::default();

    for &id in &candidates {
        match id {
            ObjectId::Point(_) => {
                selected.insert(id);
            }
            ObjectId::Path(path_id) => {
                let Some(path) = store.path(path_id) else { continue };
                if query.keeps_path_type(&path.path_type.second) {
                    path.copy_contents(store, &mut out);
                    selected.insert(id);
                }
            }
            ObjectId::Area(area_id) => {
                let Some(area) = store.area(area_id) else { continue };
                if area.points.iter().any(|&p| in_bounds(p)) {
                    ring_points.extend(area.points.iter().copied());
                    selected.insert(id);
                }
            }
            ObjectId::ComplexAreaPart(part_id) => {
                let Some(part) = store.complex_area_part(part_id) else { continue };
                if part.area.points.iter().any(|&p| in_bounds(p)) {
                    ring_points.extend(part.area.points.iter().copied());
                    selected.insert(id);
                }
            }
            ObjectId::ComplexArea(_) | ObjectId::Tile(_) => {}
        }
    }

    for (id, complex) in store.complex_areas() {
        if !selected.contains(&ObjectId::from(complex.outer)) {
            continue;
        }
        selected.insert(id.into());
        for &inner in &complex.inner {
            if let Some(part) = store.complex_area_part(inner) {
                ring_points.extend(part.area.points.iter().copied());
                selected.insert(inner.into());
            }
        }
    }

    out.merge(&store.subset(selected));
    out.merge(&store.subset(ring_points.into_iter().map(ObjectId::from)));
    Ok(out)
}
