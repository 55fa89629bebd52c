//! Uniform grid index over projected coordinates.
//!
//! # Layout
//!
//! The plane is cut into square cells of edge `cell_size`; a coordinate
//! `(x, y)` lives in cell `(floor(x / s), floor(y / s))`.  Each occupied
//! cell records the IDs of:
//!
//! - every Point located in it,
//! - every Path with at least one point in it,
//! - every Area and ComplexAreaPart with at least one ring vertex in it.
//!
//! Empty cells are not stored, so memory is proportional to the data, not
//! to the extent of the map.
//!
//! # Precision
//!
//! This is an approximation, not a precise spatial index.  Range queries are
//! exact for Points (positions are copied into the index and filtered), but
//! Paths and areas are reported whenever any of their points falls in a
//! touched cell.  Routing additionally treats "same cell" as "connected";
//! see [`MapConfig::cell_size`](gm_core::MapConfig::cell_size).

use log::info;
use rustc_hash::{FxHashMap, FxHashSet};

use gm_core::{MapError, ObjectId, ObjectStore, Point, PointId};

use crate::SpatialResult;

/// Integer coordinates of one grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CellKey {
    pub x: i64,
    pub y: i64,
}

/// Cell → object-ID buckets plus a copy of every Point position.
#[derive(Clone, Debug)]
pub struct GridIndex {
    cell_size: f64,
    cells:     FxHashMap<CellKey, Vec<ObjectId>>,
    positions: FxHashMap<PointId, (f64, f64)>,
}

impl GridIndex {
    /// Index every Point, Path, Area and ComplexAreaPart in `store`.
    ///
    /// References to points missing from `store` are skipped.
    pub fn build(store: &ObjectStore, cell_size: f64) -> SpatialResult<GridIndex> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(MapError::Config(format!(
                "cell_size must be positive and finite, got {cell_size}"
            ))
            .into());
        }

        let mut grid = GridIndex {
            cell_size,
            cells: FxHashMap::default(),
            positions: FxHashMap::default(),
        };

        for (id, point) in store.points() {
            grid.positions.insert(id, point.coords());
            let key = grid.cell_of(point.x, point.y);
            grid.cells.entry(key).or_default().push(id.into());
        }

        for (id, path) in store.paths() {
            grid.insert_spanning(id.into(), path.points());
        }
        for (id, area) in store.areas() {
            grid.insert_spanning(id.into(), area.points.iter().copied());
        }
        for (id, part) in store.complex_area_parts() {
            grid.insert_spanning(id.into(), part.area.points.iter().copied());
        }

        info!(
            "grid index built: {} points in {} cells (cell size {})",
            grid.positions.len(),
            grid.cells.len(),
            cell_size
        );
        Ok(grid)
    }

    /// Register `id` once in every cell holding one of `points`.
    fn insert_spanning(&mut self, id: ObjectId, points: impl IntoIterator<Item = PointId>) {
        let mut touched = FxHashSet::default();
        for point in points {
            if let Some(&(x, y)) = self.positions.get(&point) {
                touched.insert(self.cell_of(x, y));
            }
        }
        for key in touched {
            self.cells.entry(key).or_default().push(id);
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Position of an indexed point.
    pub fn position(&self, id: PointId) -> Option<(f64, f64)> {
        self.positions.get(&id).copied()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Cell containing coordinate `(x, y)`.
    #[inline]
    pub fn cell_of(&self, x: f64, y: f64) -> CellKey {
        CellKey {
            x: (x / self.cell_size).floor() as i64,
            y: (y / self.cell_size).floor() as i64,
        }
    }

    /// Cell containing `point`.
    #[inline]
    pub fn square_of(&self, point: &Point) -> CellKey {
        self.cell_of(point.x, point.y)
    }

    /// Everything recorded in `key`'s cell.
    pub fn cell(&self, key: CellKey) -> &[ObjectId] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Everything recorded in the cell containing `point`.
    pub fn contents_of_square(&self, point: &Point) -> &[ObjectId] {
        self.cell(self.square_of(point))
    }

    /// Union of the `(2r + 1)²` cells centred on `point`'s cell.
    pub fn surrounding_contents(&self, point: &Point, radius: u32) -> FxHashSet<ObjectId> {
        let centre = self.square_of(point);
        let r = i64::from(radius);
        let lo = CellKey { x: centre.x.saturating_sub(r), y: centre.y.saturating_sub(r) };
        let hi = CellKey { x: centre.x.saturating_add(r), y: centre.y.saturating_add(r) };
        let mut out = FxHashSet::default();
        self.collect_range(lo, hi, &mut out);
        out
    }

    /// Objects in the half-open rectangle `[x, x + width) × [y, y + height)`.
    ///
    /// Point IDs are exactly those whose coordinates lie inside the
    /// rectangle, independent of cell size.  Other kinds are included when
    /// they have a point in any cell the rectangle touches.  A rectangle
    /// with non-positive width or height is empty.
    pub fn contents_of_bounds(&self, x: f64, y: f64, width: f64, height: f64) -> FxHashSet<ObjectId> {
        let mut out = FxHashSet::default();
        if !(width > 0.0 && height > 0.0) {
            return out;
        }
        let (x_end, y_end) = (x + width, y + height);
        // Inclusive on the far edge: floor is monotone, so any point with
        // x <= px < x_end has floor(px/s) within [lo.x, hi.x].
        let lo = self.cell_of(x, y);
        let hi = self.cell_of(x_end, y_end);
        self.collect_range(lo, hi, &mut out);

        out.retain(|id| match id {
            ObjectId::Point(p) => self
                .positions
                .get(p)
                .is_some_and(|&(px, py)| px >= x && px < x_end && py >= y && py < y_end),
            _ => true,
        });
        out
    }

    /// Add the contents of every cell in the inclusive key range.  Walks the
    /// occupied cells instead when the range is larger than the map.
    fn collect_range(&self, lo: CellKey, hi: CellKey, out: &mut FxHashSet<ObjectId>) {
        if lo.x > hi.x || lo.y > hi.y {
            return;
        }
        let span = (hi.x.abs_diff(lo.x) as u128 + 1) * (hi.y.abs_diff(lo.y) as u128 + 1);
        if span > self.cells.len() as u128 {
            for (key, ids) in &self.cells {
                if (lo.x..=hi.x).contains(&key.x) && (lo.y..=hi.y).contains(&key.y) {
                    out.extend(ids.iter().copied());
                }
            }
        } else {
            for cx in lo.x..=hi.x {
                for cy in lo.y..=hi.y {
                    out.extend(self.cell(CellKey { x: cx, y: cy }).iter().copied());
                }
            }
        }
    }
}
