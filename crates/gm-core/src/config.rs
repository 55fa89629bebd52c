//! Runtime configuration shared by indexing, routing, and search.

use crate::{MapError, MapResult};

/// Second-level path descriptors that form the routable road network unless
/// configured otherwise.
pub const DEFAULT_ACCEPTED_PATH_TYPES: [&str; 8] = [
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
];

/// Top-level map configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// `MapContext::new`.  Missing fields take their [`Default`] values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    /// Edge length of one grid cell in projected metres.  Default: 100.
    ///
    /// Points sharing a cell are treated as adjacent by the router, so this
    /// is also the intersection-detection tolerance: larger cells connect
    /// more distinct ways (including some that do not really meet), smaller
    /// cells can miss real crossings between ways without a shared node.
    pub cell_size: f64,

    /// Second-level path descriptors eligible for routing.
    pub accepted_path_types: Vec<String>,

    /// Initial neighbourhood radius, in cells, when snapping a route endpoint
    /// to the nearest road point.  Default: 5.
    pub snap_radius_cells: u32,

    /// Snapping doubles the radius after each miss and gives up once the
    /// radius exceeds this.  Default: 80.
    pub max_snap_radius_cells: u32,

    /// Upper bound on Dijkstra frontier selections per route.  `None`
    /// disables the budget.  Default: one million.
    pub max_route_iterations: Option<usize>,

    /// Maximum number of hits returned by a search.  Default: 20.
    pub search_result_limit: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            cell_size: 100.0,
            accepted_path_types: DEFAULT_ACCEPTED_PATH_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            snap_radius_cells: 5,
            max_snap_radius_cells: 80,
            max_route_iterations: Some(1_000_000),
            search_result_limit: 20,
        }
    }
}

impl MapConfig {
    /// Check invariants the index and router rely on.
    pub fn validate(&self) -> MapResult<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(MapError::Config(format!(
                "cell_size must be positive and finite, got {}",
                self.cell_size
            )));
        }
        if self.snap_radius_cells == 0 {
            return Err(MapError::Config("snap_radius_cells must be at least 1".into()));
        }
        if self.max_snap_radius_cells < self.snap_radius_cells {
            return Err(MapError::Config(format!(
                "max_snap_radius_cells ({}) is below snap_radius_cells ({})",
                self.max_snap_radius_cells, self.snap_radius_cells
            )));
        }
        Ok(())
    }

    /// `true` if `descriptor` names a routable path type.
    pub fn accepts(&self, descriptor: &str) -> bool {
        self.accepted_path_types.iter().any(|t| t == descriptor)
    }

    /// Parse and validate a JSON configuration document.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> MapResult<Self> {
        let config: MapConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
