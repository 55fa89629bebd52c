//! Routing trait, default Dijkstra implementation, and endpoint snapping.
//!
//! # Pluggability
//!
//! Callers route via the [`Router`] trait, so an application can swap in
//! A* or a precomputed-graph router without touching the query layer.  The
//! default [`DijkstraRouter`] explores the implicit road graph defined by
//! [`MapContext::road_neighbours`], computing each node's neighbours only
//! when the node is settled.
//!
//! # Cost units
//!
//! Edge weights are Euclidean distances between projected points, so route
//! lengths are in projected metres.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::debug;
use rustc_hash::FxHashMap;

use gm_core::{ObjectId, PointId};

use crate::context::MapContext;
use crate::search::resolve_term;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the points to visit in order and the total
/// length of the polyline through them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Points from source to destination, both included.
    pub points: Vec<PointId>,
    /// Sum of Euclidean segment lengths.
    pub length: f64,
}

impl Route {
    /// `true` if the source and destination are the same point.
    pub fn is_trivial(&self) -> bool {
        self.points.len() <= 1
    }

    /// Coordinates of the route's points, skipping any missing from the store.
    pub fn coords(&self, ctx: &MapContext) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|&id| ctx.store().point(id).map(|p| p.coords()))
            .collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so one router can serve concurrent
/// read-only queries against a shared [`MapContext`].
pub trait Router: Send + Sync {
    /// Compute a route between two routable points.
    ///
    /// `from == to` yields a one-point route of length zero.
    fn route(&self, ctx: &MapContext, from: PointId, to: PointId) -> SpatialResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Single-source Dijkstra over the implicit road graph.
///
/// Stops as soon as the destination is settled.  Fails with
/// [`SpatialError::Unreachable`] when the frontier empties first, and with
/// [`SpatialError::BudgetExhausted`] once more nodes have been settled than
/// [`MapConfig::max_route_iterations`](gm_core::MapConfig::max_route_iterations)
/// allows.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, ctx: &MapContext, from: PointId, to: PointId) -> SpatialResult<Route> {
        dijkstra(ctx, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap key: a distance ordered by `f64::total_cmp`.
#[derive(Copy, Clone, Debug)]
struct Cost(f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

struct NodeState {
    dist:    f64,
    parent:  Option<PointId>,
    settled: bool,
}

fn dijkstra(ctx: &MapContext, from: PointId, to: PointId) -> SpatialResult<Route> {
    ctx.point(from)?;
    ctx.point(to)?;

    if from == to {
        return Ok(Route { points: vec![from], length: 0.0 });
    }
    if !ctx.is_routable(from) || !ctx.is_routable(to) {
        return Err(SpatialError::Unreachable { from, to });
    }

    let budget = ctx.config().max_route_iterations;
    let mut states: FxHashMap<PointId, NodeState> = FxHashMap::default();
    states.insert(from, NodeState { dist: 0.0, parent: None, settled: false });

    // Reverse turns the max-heap into a min-heap; the PointId breaks ties
    // deterministically.
    let mut heap: BinaryHeap<Reverse<(Cost, PointId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    let mut iterations = 0usize;
    while let Some(Reverse((Cost(dist), node))) = heap.pop() {
        let Some(state) = states.get_mut(&node) else { continue };
        // Skip stale heap entries.
        if state.settled || dist > state.dist {
            continue;
        }
        state.settled = true;

        iterations += 1;
        if budget.is_some_and(|limit| iterations > limit) {
            debug!("route {from} -> {to}: budget of {iterations} settled nodes exhausted");
            return Err(SpatialError::BudgetExhausted { iterations: iterations - 1 });
        }

        if node == to {
            debug!("route {from} -> {to}: found after {iterations} settled nodes");
            return Ok(reconstruct(&states, to, dist));
        }

        let here = ctx.point(node)?;
        for next in ctx.road_neighbours(node) {
            let Ok(there) = ctx.point(next) else { continue };
            let candidate = dist + here.distance_to(there);
            let entry = states.entry(next).or_insert(NodeState {
                dist:    f64::INFINITY,
                parent:  None,
                settled: false,
            });
            if !entry.settled && candidate < entry.dist {
                entry.dist = candidate;
                entry.parent = Some(node);
                heap.push(Reverse((Cost(candidate), next)));
            }
        }
    }

    debug!("route {from} -> {to}: frontier exhausted after {iterations} settled nodes");
    Err(SpatialError::Unreachable { from, to })
}

fn reconstruct(states: &FxHashMap<PointId, NodeState>, to: PointId, length: f64) -> Route {
    let mut points = vec![to];
    let mut cur = to;
    while let Some(parent) = states.get(&cur).and_then(|s| s.parent) {
        points.push(parent);
        cur = parent;
    }
    points.reverse();
    Route { points, length }
}

// ── Endpoint resolution ───────────────────────────────────────────────────────

/// The routable point nearest to `id`.
///
/// A routable `id` is its own answer.  Otherwise candidates are gathered
/// from [`surrounding_contents`](crate::GridIndex::surrounding_contents),
/// starting at `snap_radius_cells` and doubling the radius after each empty
/// neighbourhood until it exceeds `max_snap_radius_cells`.
pub fn nearest_road_point(ctx: &MapContext, id: PointId) -> SpatialResult<PointId> {
    let origin = ctx.point(id)?;
    if ctx.is_routable(id) {
        return Ok(id);
    }

    let config = ctx.config();
    let mut radius = config.snap_radius_cells;
    while radius <= config.max_snap_radius_cells {
        let best = ctx
            .grid()
            .surrounding_contents(origin, radius)
            .into_iter()
            .filter_map(ObjectId::as_point)
            .filter(|&p| ctx.is_routable(p))
            .filter_map(|p| ctx.store().point(p).map(|pt| (origin.distance_to(pt), p)))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        if let Some((_, nearest)) = best {
            return Ok(nearest);
        }
        debug!("no road within {radius} cells of {id}, widening");
        radius = radius.saturating_mul(2);
        if radius == u32::MAX {
            break;
        }
    }
    Err(SpatialError::NoNearbyRoad { point: id })
}

/// Resolve two search terms, snap both to the road network, and route.
pub fn find_route<R: Router + ?Sized>(
    ctx: &MapContext,
    router: &R,
    start: &str,
    destination: &str,
) -> SpatialResult<Route> {
    let from = nearest_road_point(ctx, resolve_term(ctx.store(), start)?)?;
    let to = nearest_road_point(ctx, resolve_term(ctx.store(), destination)?)?;
    router.route(ctx, from, to)
}
