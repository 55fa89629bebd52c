//! The read-only map context shared by routing and query operations.
//!
//! A [`MapContext`] is built once, after ingestion, from the finished store
//! and a [`MapConfig`].  It owns the store, the grid index and the
//! configuration and never changes afterwards; share it across threads with
//! `Arc<MapContext>`.  Re-ingesting produces a new context.

use log::info;
use rustc_hash::FxHashSet;

use gm_core::{MapConfig, ObjectId, ObjectStore, Path, Point, PointId};

use crate::grid::GridIndex;
use crate::{SpatialError, SpatialResult};

pub struct MapContext {
    store:    ObjectStore,
    grid:     GridIndex,
    config:   MapConfig,
    /// Points lying on at least one path of an accepted type.
    routable: FxHashSet<PointId>,
}

impl MapContext {
    /// Validate `config`, index `store`, and collect the routable point set.
    pub fn new(store: ObjectStore, config: MapConfig) -> SpatialResult<MapContext> {
        config.validate()?;
        let grid = GridIndex::build(&store, config.cell_size)?;

        let mut routable = FxHashSet::default();
        let mut road_paths = 0usize;
        for (_, path) in store.paths() {
            if config.accepts(&path.path_type.second) {
                road_paths += 1;
                routable.extend(path.points().into_iter().filter(|&p| store.point(p).is_some()));
            }
        }

        info!(
            "map context ready: {} objects, {} road paths, {} routable points",
            store.len(),
            road_paths,
            routable.len()
        );
        Ok(MapContext { store, grid, config, routable })
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Give the store back, dropping the index.
    pub fn into_store(self) -> ObjectStore {
        self.store
    }

    /// Look up a point, reporting absence as [`SpatialError::UnknownPoint`].
    pub fn point(&self, id: PointId) -> SpatialResult<&Point> {
        self.store.point(id).ok_or(SpatialError::UnknownPoint(id))
    }

    /// `true` if `path`'s type is in the accepted set.
    pub fn is_road(&self, path: &Path) -> bool {
        self.config.accepts(&path.path_type.second)
    }

    /// `true` if `id` lies on an accepted-type path.
    pub fn is_routable(&self, id: PointId) -> bool {
        self.routable.contains(&id)
    }

    pub fn routable_count(&self) -> usize {
        self.routable.len()
    }

    /// Road-graph neighbours of a routable point, computed on demand.
    ///
    /// `b` is adjacent to `a` when either
    /// - `b` directly precedes or follows `a` on an accepted-type path that
    ///   passes through `a`'s cell, or
    /// - `b` is another routable point in `a`'s cell.
    ///
    /// The second rule is what joins distinct ways that cross without a
    /// shared point.  Returned IDs are sorted and unique.
    pub fn road_neighbours(&self, id: PointId) -> Vec<PointId> {
        let Some(point) = self.store.point(id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for &entry in self.grid.contents_of_square(point) {
            match entry {
                ObjectId::Point(other) if other != id && self.is_routable(other) => {
                    out.push(other);
                }
                ObjectId::Path(path_id) => {
                    let Some(path) = self.store.path(path_id) else { continue };
                    if !self.is_road(path) {
                        continue;
                    }
                    let parts = path.parts();
                    for part in parts {
                        for &child in &part.next {
                            let child_point = parts[child].point;
                            if part.point == id {
                                out.push(child_point);
                            }
                            if child_point == id {
                                out.push(part.point);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        out.retain(|&p| p != id && self.store.point(p).is_some());
        out.sort_unstable();
        out.dedup();
        out
    }
}
