//! The ingestion pipeline.
//!
//! # Phases
//!
//! 1. Partition elements into nodes, ways and relations.
//! 2. Project node coordinates; nodes that cannot be projected are dropped.
//! 3. Index qualifying multipolygon relations.
//! 4. Resolve every way: classify it and look up its node references.  This
//!    phase is pure and, with the `parallel` feature, runs on rayon once
//!    there are at least [`PARALLEL_MIN_WAYS`] ways.
//! 5. Commit resolved ways to the store in input order, so IDs do not depend
//!    on thread scheduling.  Each OSM node becomes at most one Point, shared
//!    by every way that references it.
//! 6. Add Points for named nodes no way referenced.
//! 7. Assemble ComplexAreas from the committed parts.

use std::collections::HashMap;

use log::{debug, info, warn};

use gm_core::{
    geo, Area, ComplexAreaPart, MapResult, ObjectStore, PartRole, Path, Point, PointId, Tags,
};

use crate::classify::{area_type, classify_way, path_type, WayClass};
use crate::multipolygon::MultipolygonIndex;
use crate::osm::{OsmElement, OsmNode, OsmRelation, OsmWay};
use crate::IngestResult;

/// Counters describing one ingestion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub nodes:                    usize,
    pub ways:                     usize,
    pub relations:                usize,
    /// Nodes without usable coordinates.
    pub dropped_nodes:            usize,
    /// Way node references that named no projectable node.
    pub unresolved_refs:          usize,
    /// Mapped ways left with no resolvable node.
    pub empty_ways:               usize,
    /// Ways classified `Other`.
    pub skipped_ways:             usize,
    pub points:                   usize,
    pub paths:                    usize,
    pub areas:                    usize,
    pub parts:                    usize,
    pub complex_areas:            usize,
    /// Multipolygons whose outer ring could not be resolved.
    pub incomplete_complex_areas: usize,
}

/// The store built by [`ingest`] plus its statistics.
#[derive(Debug)]
pub struct IngestReport {
    pub store: ObjectStore,
    pub stats: IngestStats,
}

/// Below this many ways, resolution stays on the calling thread.
pub const PARALLEL_MIN_WAYS: usize = 1024;

/// A projected node awaiting its Point.
struct Projected<'a> {
    x:    f64,
    y:    f64,
    tags: &'a Tags,
}

/// A classified way with its node references filtered to projectable nodes.
struct ResolvedWay<'a> {
    way:        &'a OsmWay,
    class:      WayClass,
    refs:       Vec<i64>,
    unresolved: usize,
}

/// Build an object store from raw OSM elements.
///
/// # Errors
///
/// Incomplete data is never an error.  Only running out of object IDs
/// ([`IngestError::Map`](crate::IngestError::Map)) stops ingestion.
pub fn ingest(elements: impl IntoIterator<Item = OsmElement>) -> IngestResult<IngestReport> {
    ingest_with(elements, true)
}

/// [`ingest`], with parallel way resolution allowed or not.  The result does
/// not depend on `parallel`.
pub(crate) fn ingest_with(
    elements: impl IntoIterator<Item = OsmElement>,
    parallel: bool,
) -> IngestResult<IngestReport> {
    let mut nodes: Vec<OsmNode> = Vec::new();
    let mut ways: Vec<OsmWay> = Vec::new();
    let mut relations: Vec<OsmRelation> = Vec::new();
    for element in elements {
        match element {
            OsmElement::Node(n)     => nodes.push(n),
            OsmElement::Way(w)      => ways.push(w),
            OsmElement::Relation(r) => relations.push(r),
        }
    }

    let mut stats = IngestStats {
        nodes: nodes.len(),
        ways: ways.len(),
        relations: relations.len(),
        ..IngestStats::default()
    };

    // ── Projection ────────────────────────────────────────────────────────
    let mut positions: HashMap<i64, Projected<'_>> = HashMap::with_capacity(nodes.len());
    for node in &nodes {
        match node.lon.zip(node.lat).and_then(|(lon, lat)| geo::project(lon, lat)) {
            Some((x, y)) => {
                positions.insert(node.id, Projected { x, y, tags: &node.tags });
            }
            None => {
                debug!("node {} dropped: no usable coordinates", node.id);
                stats.dropped_nodes += 1;
            }
        }
    }

    let multipolygons = MultipolygonIndex::build(&relations);

    // ── Resolution ────────────────────────────────────────────────────────
    let resolved = resolve_ways(&ways, &multipolygons, &positions, parallel);

    // ── Commit ────────────────────────────────────────────────────────────
    let mut builder = StoreBuilder::new(&positions);
    let mut parts_by_way = HashMap::new();

    for rw in resolved {
        stats.unresolved_refs += rw.unresolved;
        if rw.class == WayClass::Other {
            stats.skipped_ways += 1;
            continue;
        }
        if rw.refs.is_empty() {
            debug!("way {} ({:?}) dropped: no resolvable nodes", rw.way.id, rw.class);
            stats.empty_ways += 1;
            continue;
        }

        let mut ids: Vec<PointId> = Vec::with_capacity(rw.refs.len());
        for &node in &rw.refs {
            ids.extend(builder.point_for(node)?);
        }
        let tags = rw.way.tags.clone();

        if rw.class.is_path() {
            let Some(kind) = path_type(rw.class, &rw.way.tags) else { continue };
            let Some(path) = Path::connect_sequential(&ids, kind) else { continue };
            builder.store.add_path(path.with_tags(tags))?;
            stats.paths += 1;
        } else if rw.class.part_role().is_some() {
            // One part per role the way holds across all relations.
            for role in multipolygons.roles_of(rw.way.id) {
                // Only outer rings inherit descriptors from the relation;
                // holes stay `none` unless the way itself says otherwise.
                let (class, fallback) = match role {
                    PartRole::Outer => (
                        WayClass::Outer,
                        multipolygons.owner_in_role(rw.way.id, role).map(|mp| &mp.tags),
                    ),
                    PartRole::Inner => (WayClass::Inner, None),
                };
                let mut area = Area::new(ids.clone(), area_type(class, &rw.way.tags, fallback));
                area.tags = tags.clone();
                let part = builder.store.add_complex_area_part(ComplexAreaPart {
                    area,
                    role,
                    source_way: Some(rw.way.id),
                })?;
                parts_by_way.insert((rw.way.id, role), part);
                stats.parts += 1;
            }
        } else {
            let mut area = Area::new(ids, area_type(rw.class, &rw.way.tags, None));
            area.tags = tags;
            builder.store.add_area(area)?;
            stats.areas += 1;
        }
    }

    // ── Named standalone nodes ────────────────────────────────────────────
    for node in &nodes {
        if node.tags.contains_key("name") {
            builder.point_for(node.id)?;
        }
    }

    // ── Multipolygon assembly ─────────────────────────────────────────────
    let (assembled, incomplete) = multipolygons.assemble(&parts_by_way, &mut builder.store)?;
    stats.complex_areas = assembled;
    stats.incomplete_complex_areas = incomplete;

    stats.points = builder.point_ids.len();
    if stats.unresolved_refs > 0 {
        warn!("{} way node references could not be resolved", stats.unresolved_refs);
    }
    info!(
        "ingested {} nodes, {} ways, {} relations -> {} points, {} paths, {} areas, \
         {} parts, {} complex areas ({} dropped nodes, {} skipped ways)",
        stats.nodes,
        stats.ways,
        stats.relations,
        stats.points,
        stats.paths,
        stats.areas,
        stats.parts,
        stats.complex_areas,
        stats.dropped_nodes,
        stats.skipped_ways,
    );

    Ok(IngestReport { store: builder.store, stats })
}

// ── Way resolution ────────────────────────────────────────────────────────────

fn resolve_way<'a>(
    way: &'a OsmWay,
    multipolygons: &MultipolygonIndex,
    positions: &HashMap<i64, Projected<'_>>,
) -> ResolvedWay<'a> {
    let class = classify_way(way, multipolygons);
    if class == WayClass::Other {
        return ResolvedWay { way, class, refs: Vec::new(), unresolved: 0 };
    }
    let refs: Vec<i64> = way
        .node_refs
        .iter()
        .copied()
        .filter(|r| positions.contains_key(r))
        .collect();
    let unresolved = way.node_refs.len() - refs.len();
    ResolvedWay { way, class, refs, unresolved }
}

/// Resolve `ways` in input order.
fn resolve_ways<'a>(
    ways: &'a [OsmWay],
    multipolygons: &MultipolygonIndex,
    positions: &HashMap<i64, Projected<'_>>,
    parallel: bool,
) -> Vec<ResolvedWay<'a>> {
    if parallel && ways.len() >= PARALLEL_MIN_WAYS {
        if let Some(resolved) = resolve_parallel(ways, multipolygons, positions) {
            return resolved;
        }
    }
    ways.iter().map(|w| resolve_way(w, multipolygons, positions)).collect()
}

#[cfg(feature = "parallel")]
fn resolve_parallel<'a>(
    ways: &'a [OsmWay],
    multipolygons: &MultipolygonIndex,
    positions: &HashMap<i64, Projected<'_>>,
) -> Option<Vec<ResolvedWay<'a>>> {
    use rayon::prelude::*;
    // Indexed collect keeps input order.
    Some(ways.par_iter().map(|w| resolve_way(w, multipolygons, positions)).collect())
}

#[cfg(not(feature = "parallel"))]
fn resolve_parallel<'a>(
    _ways: &'a [OsmWay],
    _multipolygons: &MultipolygonIndex,
    _positions: &HashMap<i64, Projected<'_>>,
) -> Option<Vec<ResolvedWay<'a>>> {
    None
}

// ── Store builder ─────────────────────────────────────────────────────────────

/// Store under construction plus the OSM node → Point mapping.
struct StoreBuilder<'p, 'a> {
    store:     ObjectStore,
    positions: &'p HashMap<i64, Projected<'a>>,
    point_ids: HashMap<i64, PointId>,
}

impl<'p, 'a> StoreBuilder<'p, 'a> {
    fn new(positions: &'p HashMap<i64, Projected<'a>>) -> Self {
        Self { store: ObjectStore::new(), positions, point_ids: HashMap::new() }
    }

    /// The Point for OSM node `node`, created on first use.  `None` if the
    /// node was not projected.
    fn point_for(&mut self, node: i64) -> MapResult<Option<PointId>> {
        if let Some(&id) = self.point_ids.get(&node) {
            return Ok(Some(id));
        }
        let Some(projected) = self.positions.get(&node) else {
            return Ok(None);
        };
        let mut point = Point::new(projected.x, projected.y);
        point.tags = projected.tags.clone();
        let id = self.store.add_point(point)?;
        self.point_ids.insert(node, id);
        Ok(Some(id))
    }
}
