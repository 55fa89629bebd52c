//! xsmall: smallest end-to-end run of the geomap workspace.
//!
//! Loads a map (an `.osm` file, or the built-in market-town fixture), indexes
//! it, searches, routes between two named places, and extracts the objects
//! around the route's start.
//!
//! ```text
//! xsmall                          # built-in fixture
//! xsmall city.osm "Guildhall" "Station Road"
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) to see ingestion and routing logs.

mod fixture;

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use gm_core::{MapConfig, ObjectKind, ObjectStore};
use gm_ingest::{ingest, xml::read_osm_xml};
use gm_spatial::{extract, find_route, search, DijkstraRouter, ExtractQuery, MapContext};

use fixture::build_fixture;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_FROM: &str = "Market Square";
const DEFAULT_TO:   &str = "Old Mill";
const EXTRACT_HALF_SIZE: i64 = 150; // metres either side of the route start

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let from = args.get(1).map_or(DEFAULT_FROM, String::as_str);
    let to = args.get(2).map_or(DEFAULT_TO, String::as_str);

    println!("=== xsmall — geomap ===");

    // 1. Load the store.
    let t0 = Instant::now();
    let store = match args.first() {
        Some(path) => load_osm(Path::new(path))?,
        None => build_fixture().context("building the demo map")?,
    };
    for kind in ObjectKind::ALL {
        let count = store.by_kind(&[kind]).count();
        if count > 0 {
            println!("  {:<16} {count}", kind.prefix());
        }
    }

    // 2. Index.
    let ctx = MapContext::new(store, MapConfig::default()).context("building map context")?;
    println!(
        "Indexed in {:.1?}: {} grid cells, {} routable points",
        t0.elapsed(),
        ctx.grid().cell_count(),
        ctx.routable_count()
    );
    println!();

    // 3. Search.
    for term in [from, to] {
        let hits = search(ctx.store(), term, ctx.config().search_result_limit);
        println!("search {term:?}: {}", serde_json::to_string(&hits)?);
    }

    // 4. Route.
    let t1 = Instant::now();
    let route = find_route(&ctx, &DijkstraRouter, from, to)
        .with_context(|| format!("routing {from:?} → {to:?}"))?;
    info!("route computed in {:.1?}", t1.elapsed());
    println!(
        "route {from:?} → {to:?}: {} points, {:.0} m",
        route.points.len(),
        route.length
    );
    println!("{}", serde_json::to_string(&route.coords(&ctx))?);
    println!();

    // 5. Extract the neighbourhood of the route start, through the same
    //    parameter parsing a request handler would use.
    let (sx, sy) = route
        .points
        .first()
        .and_then(|&id| ctx.grid().position(id))
        .context("route has no start point")?;
    let params: HashMap<String, String> = [
        ("x", (sx as i64 - EXTRACT_HALF_SIZE).to_string()),
        ("y", (sy as i64 - EXTRACT_HALF_SIZE).to_string()),
        ("width", (2 * EXTRACT_HALF_SIZE).to_string()),
        ("height", (2 * EXTRACT_HALF_SIZE).to_string()),
        ("pathTypes", r#"["primary","secondary"]"#.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    let query = ExtractQuery::from_params(&params)?;
    let extracted = extract(&ctx, &query)?;
    println!("extract {}: {} objects", serde_json::to_string(&query)?, extracted.len());
    println!("{}", extracted.to_json()?);

    Ok(())
}

fn load_osm(path: &Path) -> Result<ObjectStore> {
    let elements =
        read_osm_xml(path).with_context(|| format!("reading {}", path.display()))?;
    let report = ingest(elements).context("ingesting OSM elements")?;
    println!(
        "Ingested {}: {} nodes, {} ways, {} relations ({} dropped nodes)",
        path.display(),
        report.stats.nodes,
        report.stats.ways,
        report.stats.relations,
        report.stats.dropped_nodes
    );
    Ok(report.store)
}
