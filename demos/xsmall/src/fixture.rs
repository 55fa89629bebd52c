//! Built-in demo map.
//!
//! A few hundred metres of a market town in projected metres: High Street
//! running east, Mill Lane branching north from it, a named square just off
//! the road, and a park with a pond drawn as a complex area.

use gm_core::{
    Area, AreaCategory, AreaType, ComplexArea, ComplexAreaPart, MapResult, ObjectStore, PartRole,
    Path, PathType, Point, PointId,
};

/// Build the demo store.
pub fn build_fixture() -> MapResult<ObjectStore> {
    let mut store = ObjectStore::new();

    // High Street: (0,0) → (400,0) every 50 m.
    let high_street = (0..=8)
        .map(|i| store.add_point(Point::new(f64::from(i) * 50.0, 0.0)))
        .collect::<MapResult<Vec<PointId>>>()?;
    let junction = high_street[4];

    // Mill Lane leaves High Street at (200,0) and runs north.
    let mill_lane = std::iter::once(Ok(junction))
        .chain((1..=6).map(|i| store.add_point(Point::new(200.0, f64::from(i) * 50.0))))
        .collect::<MapResult<Vec<PointId>>>()?;

    add_road(&mut store, &high_street, "primary", "High Street")?;
    add_road(&mut store, &mill_lane, "secondary", "Mill Lane")?;

    store.add_point(Point::new(180.0, 40.0).with_tag("name", "Market Square"))?;
    store.add_point(Point::new(330.0, 260.0).with_tag("name", "Old Mill"))?;

    // Abbey Park with its pond.
    let outer = ring(&mut store, (30.0, 210.0), (100.0, 240.0))?;
    let inner = ring(&mut store, (35.0, 215.0), (95.0, 235.0))?;
    let outer = store.add_complex_area_part(ComplexAreaPart {
        area:       Area::new(outer, AreaType::new(AreaCategory::Land, "park")),
        role:       PartRole::Outer,
        source_way: None,
    })?;
    let inner = store.add_complex_area_part(ComplexAreaPart {
        area:       Area::new(inner, AreaType::new(AreaCategory::Land, AreaType::NONE)),
        role:       PartRole::Inner,
        source_way: None,
    })?;
    let mut park = ComplexArea { outer, inner: vec![inner], tags: Default::default() };
    park.tags.insert("name".into(), "Abbey Park".into());
    store.add_complex_area(park)?;

    Ok(store)
}

fn add_road(store: &mut ObjectStore, points: &[PointId], kind: &str, name: &str) -> MapResult<()> {
    if let Some(mut path) = Path::connect_sequential(points, PathType::highway(kind)) {
        path.tags.insert("highway".into(), kind.into());
        path.tags.insert("name".into(), name.into());
        store.add_path(path)?;
    }
    Ok(())
}

/// Axis-aligned rectangle as a closed ring of new points.
fn ring(
    store: &mut ObjectStore,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
) -> MapResult<Vec<PointId>> {
    let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
    let mut ids = corners
        .iter()
        .map(|&(x, y)| store.add_point(Point::new(x, y)))
        .collect::<MapResult<Vec<PointId>>>()?;
    ids.push(ids[0]);
    Ok(ids)
}

