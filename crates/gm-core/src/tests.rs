//! Unit tests for gm-core.

#[cfg(test)]
mod ids {
    use crate::{ComplexAreaPartId, MapError, ObjectId, ObjectKind, PathId, PointId};

    #[test]
    fn display_uses_kind_prefix() {
        assert_eq!(PointId(7).to_string(), "POINT_7");
        assert_eq!(ObjectId::from(PathId(0)).to_string(), "PATH_0");
        assert_eq!(ComplexAreaPartId(3).to_string(), "COMPLEX-AREA-PART_3");
    }

    #[test]
    fn parse_roundtrip_every_kind() {
        for kind in ObjectKind::ALL {
            let id = ObjectId::new(kind, 42);
            let parsed: ObjectId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
            assert_eq!(parsed.kind(), kind);
            assert_eq!(parsed.seq(), 42);
        }
    }

    #[test]
    fn hyphenated_prefixes_are_distinct() {
        let part: ObjectId = "COMPLEX-AREA-PART_1".parse().unwrap();
        let area: ObjectId = "COMPLEX-AREA_1".parse().unwrap();
        assert_eq!(part.kind(), ObjectKind::ComplexAreaPart);
        assert_eq!(area.kind(), ObjectKind::ComplexArea);
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["POINT", "POINT_", "POINT_x", "WIDGET_1", "point_1", "_1"] {
            assert!(
                matches!(bad.parse::<ObjectId>(), Err(MapError::InvalidId(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn typed_parse_checks_kind() {
        assert_eq!("POINT_5".parse::<PointId>().unwrap(), PointId(5));
        let err = "PATH_5".parse::<PointId>().unwrap_err();
        assert!(matches!(err, MapError::KindMismatch { expected: ObjectKind::Point, .. }));
    }
}

#[cfg(test)]
mod geo {
    use crate::geo::{distance, project, EARTH_RADIUS_M};

    #[test]
    fn origin_projects_to_origin() {
        let (x, y) = project(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-9 && y.abs() < 1e-9);
    }

    #[test]
    fn longitude_is_linear() {
        let (x, _) = project(180.0, 0.0).unwrap();
        assert!((x - EARTH_RADIUS_M * std::f64::consts::PI).abs() < 1e-6);
        let (xw, _) = project(-90.0, 0.0).unwrap();
        assert!((xw + EARTH_RADIUS_M * std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn latitude_follows_mercator() {
        let (_, y) = project(0.0, 45.0).unwrap();
        let expected = EARTH_RADIUS_M * 0.881_373_587_019_543;
        assert!((y - expected).abs() < 1e-3, "got {y}");
        let (_, south) = project(0.0, -45.0).unwrap();
        assert!((south + expected).abs() < 1e-3);
    }

    #[test]
    fn poles_and_garbage_are_dropped() {
        assert!(project(0.0, 90.0).is_none());
        assert!(project(0.0, -90.0).is_none());
        assert!(project(f64::NAN, 10.0).is_none());
        assert!(project(10.0, f64::INFINITY).is_none());
    }

    #[test]
    fn euclidean_distance() {
        assert_eq!(distance((0.0, 0.0), (3.0, 4.0)), 5.0);
    }
}

#[cfg(test)]
mod config {
    use crate::{MapConfig, MapError};

    #[test]
    fn default_is_valid() {
        let config = MapConfig::default();
        config.validate().unwrap();
        assert!(config.accepts("primary"));
        assert!(config.accepts("motorway_link"));
        assert!(!config.accepts("footway"));
    }

    #[test]
    fn rejects_bad_cell_size() {
        for cell_size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = MapConfig { cell_size, ..MapConfig::default() };
            assert!(matches!(config.validate(), Err(MapError::Config(_))));
        }
    }

    #[test]
    fn rejects_inverted_snap_radii() {
        let config = MapConfig {
            snap_radius_cells: 10,
            max_snap_radius_cells: 5,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());
        let zero = MapConfig { snap_radius_cells: 0, ..MapConfig::default() };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn json_fills_defaults() {
        let config =
            MapConfig::from_json_str(r#"{"cell_size": 25.0, "accepted_path_types": ["residential"]}"#)
                .unwrap();
        assert_eq!(config.cell_size, 25.0);
        assert!(config.accepts("residential"));
        assert!(!config.accepts("primary"));
        assert_eq!(config.snap_radius_cells, MapConfig::default().snap_radius_cells);
    }

    #[test]
    fn json_is_validated() {
        assert!(MapConfig::from_json_str(r#"{"cell_size": -3.0}"#).is_err());
        assert!(MapConfig::from_json_str("not json").is_err());
    }
}

#[cfg(test)]
mod paths {
    use crate::{ObjectStore, Path, PathType, Point, PointId};

    fn ids(n: u32) -> Vec<PointId> {
        (0..n).map(PointId).collect()
    }

    #[test]
    fn connect_sequential_chains_parts() {
        let path = Path::connect_sequential(&ids(3), PathType::highway("primary")).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.root().point, PointId(0));
        assert_eq!(path.parts()[0].next, vec![1]);
        assert_eq!(path.parts()[1].next, vec![2]);
        assert!(path.parts()[2].next.is_empty());
        assert_eq!(path.points(), ids(3));
    }

    #[test]
    fn empty_sequence_has_no_path() {
        assert!(Path::connect_sequential(&[], PathType::highway("primary")).is_none());
    }

    #[test]
    fn branches_flatten_depth_first() {
        let mut path = Path::connect_sequential(&ids(3), PathType::highway("primary")).unwrap();
        let fork = path.branch(1, PointId(3)).unwrap();
        path.branch(fork, PointId(4)).unwrap();
        assert_eq!(path.parts()[1].next, vec![2, 3]);
        assert_eq!(
            path.points(),
            vec![PointId(0), PointId(1), PointId(2), PointId(3), PointId(4)]
        );
        assert!(path.branch(99, PointId(5)).is_err());
    }

    #[test]
    fn midpoint_is_middle_of_sequence() {
        let odd = Path::connect_sequential(&ids(5), PathType::highway("primary")).unwrap();
        assert_eq!(odd.midpoint(), PointId(2));
        let even = Path::connect_sequential(&ids(4), PathType::highway("primary")).unwrap();
        assert_eq!(even.midpoint(), PointId(2));
        let single = Path::single(PointId(9), PathType::highway("primary"));
        assert_eq!(single.midpoint(), PointId(9));
    }

    #[test]
    fn copy_contents_is_idempotent() {
        let mut source = ObjectStore::new();
        let a = source.add_point(Point::new(0.0, 0.0)).unwrap();
        let b = source.add_point(Point::new(1.0, 0.0).with_tag("name", "Mill Road")).unwrap();
        let unrelated = source.add_point(Point::new(9.0, 9.0)).unwrap();
        let path = Path::connect_sequential(&[a, b, PointId(77)], PathType::highway("primary"))
            .unwrap();

        let mut once = ObjectStore::new();
        assert_eq!(path.copy_contents(&source, &mut once), 2);
        let mut twice = once.clone();
        path.copy_contents(&source, &mut twice);

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
        assert_eq!(twice.point(b), source.point(b));
        assert!(twice.point(unrelated).is_none());
    }
}

#[cfg(test)]
mod areas {
    use crate::{Area, AreaCategory, AreaType, ObjectStore, Point};

    fn unit_square(store: &mut ObjectStore, clockwise: bool) -> Area {
        let mut corners = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        if clockwise {
            corners.reverse();
        }
        let ids = corners
            .into_iter()
            .map(|(x, y)| store.add_point(Point::new(x, y)).unwrap())
            .collect();
        Area::new(ids, AreaType::new(AreaCategory::Land, "grass"))
    }

    #[test]
    fn ring_closes_open_sequence() {
        let mut store = ObjectStore::new();
        let area = unit_square(&mut store, false);
        let ring = area.ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn orientation() {
        let mut store = ObjectStore::new();
        let ccw = unit_square(&mut store, false);
        let cw = unit_square(&mut store, true);
        assert!((ccw.signed_area(&store) - 1.0).abs() < 1e-12);
        assert!(!ccw.is_clockwise(&store));
        assert!(cw.is_clockwise(&store));
    }

    #[test]
    fn point_in_polygon() {
        let mut store = ObjectStore::new();
        let area = unit_square(&mut store, false);
        assert!(area.contains(&store, 0.5, 0.5));
        assert!(!area.contains(&store, 1.5, 0.5));
        assert!(!area.contains(&store, 0.5, -0.1));
    }

    #[test]
    fn none_marks_holes() {
        assert!(AreaType::new(AreaCategory::Land, AreaType::NONE).is_none());
        assert!(!AreaType::new(AreaCategory::Water, "water").is_none());
    }
}

#[cfg(test)]
mod store {
    use crate::{
        GeoObject, MapError, ObjectId, ObjectKind, ObjectStore, Path, PathId, PathType, Point,
        PointId, Tile,
    };

    #[test]
    fn counter_stops_at_the_last_id() {
        let mut store = ObjectStore::new();
        let last = ObjectId::Point(PointId(u32::MAX - 1));
        store.insert(last, GeoObject::Point(Point::new(0.0, 0.0))).unwrap();

        // u32::MAX - 1 was taken, u32::MAX is never handed out.
        assert!(matches!(
            store.add(Point::new(1.0, 1.0)),
            Err(MapError::IdsExhausted(ObjectKind::Point))
        ));
        assert!(store.add_point(Point::new(2.0, 2.0)).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.point(PointId(u32::MAX - 1)).map(|p| p.x), Some(0.0));
    }

    #[test]
    fn point_lookup_preserves_coordinates() {
        let mut store = ObjectStore::new();
        let id = store.add_point(Point::new(12.5, -3.25)).unwrap();
        let point = store.point(id).unwrap();
        assert_eq!((point.x, point.y), (12.5, -3.25));
        assert_eq!(store.require_point(id).unwrap().x, 12.5);
        assert!(matches!(
            store.require_point(PointId(99)),
            Err(MapError::ObjectNotFound(ObjectId::Point(PointId(99))))
        ));
    }

    #[test]
    fn ids_are_assigned_per_kind() {
        let mut store = ObjectStore::new();
        let p0 = store.add(Point::new(0.0, 0.0)).unwrap();
        let p1 = store.add(Point::new(1.0, 0.0)).unwrap();
        let t0 = store.add(Tile::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(p0.to_string(), "POINT_0");
        assert_eq!(p1.to_string(), "POINT_1");
        assert_eq!(t0.to_string(), "TILE_0");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn typed_getter_rejects_other_kinds() {
        let mut store = ObjectStore::new();
        let p = store.add_point(Point::new(0.0, 0.0)).unwrap();
        assert!(store.path(PathId(p.0)).is_none());
    }

    #[test]
    fn by_kind_filters() {
        let mut store = ObjectStore::new();
        let a = store.add_point(Point::new(0.0, 0.0)).unwrap();
        let b = store.add_point(Point::new(1.0, 0.0)).unwrap();
        store.add_path(Path::connect_sequential(&[a, b], PathType::highway("trunk")).unwrap()).unwrap();
        store.add_tile(Tile::new(0.0, 0.0, 1.0)).unwrap();

        assert_eq!(store.by_kind(&[ObjectKind::Point]).count(), 2);
        assert_eq!(store.by_kind(&[ObjectKind::Point, ObjectKind::Path]).count(), 3);
        assert_eq!(store.by_kind(&[ObjectKind::Area]).count(), 0);
        assert_eq!(store.paths().count(), 1);
    }

    #[test]
    fn insert_checks_kind_and_reserves_seq() {
        let mut store = ObjectStore::new();
        let err = store
            .insert(ObjectId::Path(PathId(0)), GeoObject::Point(Point::new(0.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, MapError::KindMismatch { .. }));

        store.insert(ObjectId::Point(PointId(10)), Point::new(0.0, 0.0).into()).unwrap();
        let next = store.add_point(Point::new(1.0, 1.0)).unwrap();
        assert_eq!(next, PointId(11));
    }

    #[test]
    fn merge_overwrites_without_duplicating() {
        let mut left = ObjectStore::new();
        let shared = left.add_point(Point::new(0.0, 0.0)).unwrap();
        left.add_point(Point::new(5.0, 5.0)).unwrap();

        let mut right = ObjectStore::new();
        right.insert(shared.into(), Point::new(0.0, 0.0).into()).unwrap();
        right.add_point(Point::new(7.0, 7.0)).unwrap(); // POINT_1, same ID as left's second point

        left.merge(&right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.point(PointId(1)).unwrap().x, 7.0);

        let mut again = left.clone();
        again.merge(&right);
        assert_eq!(again, left);
    }

    #[test]
    fn subset_copies_existing_only() {
        let mut store = ObjectStore::new();
        let a = store.add_point(Point::new(0.0, 0.0)).unwrap();
        store.add_point(Point::new(1.0, 0.0)).unwrap();
        let sub = store.subset([a.into(), ObjectId::Point(PointId(50))]);
        assert_eq!(sub.len(), 1);
        assert!(sub.point(a).is_some());
    }
}

#[cfg(test)]
mod tiles {
    use crate::{read_tile_catalog, tile_catalog, Tile};

    #[test]
    fn parses_signed_fractional_names() {
        let tile = Tile::from_file_name("-1200x3400.5_2x.png").unwrap();
        assert_eq!(tile, Tile::new(-1200.0, 3400.5, 2.0));
        assert_eq!(tile.file_name(), "-1200x3400.5_2x.png");
        assert_eq!(Tile::from_file_name("0x0_0.5x.png").unwrap().zoom, 0.5);
    }

    #[test]
    fn rejects_other_files() {
        for name in [
            "readme.txt",
            "1x2_3.png",
            "1x2_-3x.png",
            "ax2_3x.png",
            "1x2x.png",
            ".5x2_3x.png",
            "1x2_3x.png.bak",
        ] {
            assert!(Tile::from_file_name(name).is_none(), "{name} should be rejected");
        }
    }

    #[test]
    fn catalog_filters_and_sorts() {
        let tiles = tile_catalog(["b.png", "5x5_1x.png", "-5x5_1x.png"]);
        assert_eq!(tiles, vec![Tile::new(-5.0, 5.0, 1.0), Tile::new(5.0, 5.0, 1.0)]);
    }

    #[test]
    fn catalog_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10x-20_1x.png", "10x-20_2x.png", "notes.md"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let tiles = read_tile_catalog(dir.path()).unwrap();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.iter().all(|t| t.x == 10.0 && t.y == -20.0));
    }
}

#[cfg(all(test, feature = "serde"))]
mod persist {
    use crate::{
        Area, AreaCategory, AreaType, ComplexArea, ComplexAreaPart, MapError, ObjectStore,
        PartRole, Path, PathType, Point, Tags, Tile,
    };

    fn sample_store() -> ObjectStore {
        let mut store = ObjectStore::new();
        let a = store.add_point(Point::new(1.0, 2.0).with_tag("name", "Parker's Piece")).unwrap();
        let b = store.add_point(Point::new(3.0, 4.0)).unwrap();
        let c = store.add_point(Point::new(5.0, 0.0)).unwrap();
        let mut path = Path::connect_sequential(&[a, b], PathType::highway("primary")).unwrap();
        path.branch(0, c).unwrap();
        store.add_path(path).unwrap();
        store.add_area(Area::new(vec![a, b, c], AreaType::new(AreaCategory::Water, "water"))).unwrap();
        let outer = store.add_complex_area_part(ComplexAreaPart {
            area: Area::new(vec![a, b, c], AreaType::new(AreaCategory::Land, "grass")),
            role: PartRole::Outer,
            source_way: Some(1001),
        }).unwrap();
        let inner = store.add_complex_area_part(ComplexAreaPart {
            area: Area::new(vec![b, c, a], AreaType::new(AreaCategory::Land, AreaType::NONE)),
            role: PartRole::Inner,
            source_way: None,
        }).unwrap();
        let mut tags = Tags::new();
        tags.insert("type".into(), "multipolygon".into());
        store.add_complex_area(ComplexArea { outer, inner: vec![inner], tags }).unwrap();
        store.add_tile(Tile::new(-10.0, 20.5, 2.0)).unwrap();
        store
    }

    #[test]
    fn roundtrip_preserves_ids_and_fields() {
        let store = sample_store();
        let json = store.to_json().unwrap();
        let back = ObjectStore::from_json(&json).unwrap();

        let mut before: Vec<_> = store.ids().collect();
        let mut after: Vec<_> = back.ids().collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert_eq!(back, store);
    }

    #[test]
    fn roundtrip_is_bit_exact_for_projected_coordinates() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        use crate::geo;

        let mut rng = SmallRng::seed_from_u64(0x6e0d_a7a5);
        let mut store = ObjectStore::new();
        let mut expected = Vec::new();
        for i in 0..5_000 {
            let (x, y) = if i % 2 == 0 {
                geo::project(rng.gen_range(-0.5..0.5), rng.gen_range(51.5..52.5)).unwrap()
            } else {
                (rng.gen_range(-2.0e7..2.0e7), rng.gen_range(-2.0e7..2.0e7))
            };
            expected.push((store.add_point(Point::new(x, y)).unwrap(), x, y));
        }

        let back = ObjectStore::from_json(&store.to_json().unwrap()).unwrap();
        for (id, x, y) in expected {
            let p = back.point(id).unwrap();
            assert_eq!(
                (p.x.to_bits(), p.y.to_bits()),
                (x.to_bits(), y.to_bits()),
                "{id}: ({x}, {y}) came back as ({}, {})",
                p.x,
                p.y
            );
        }
    }

    #[test]
    fn loading_the_last_id_exhausts_that_kind() {
        let json = r#"{"db": {"POINT_4294967295": {"x": 1.0, "y": 2.0}}}"#;
        let mut store = ObjectStore::from_json(json).unwrap();

        let err = store.add_point(Point::new(3.0, 4.0)).unwrap_err();
        assert!(matches!(err, MapError::IdsExhausted(crate::ObjectKind::Point)));
        let kept = store.point(crate::PointId(u32::MAX)).unwrap();
        assert_eq!((kept.x, kept.y), (1.0, 2.0));
        assert_eq!(store.len(), 1);

        // Other kinds keep their own counters.
        assert_eq!(store.add_tile(Tile::new(0.0, 0.0, 1.0)).unwrap(), crate::TileId(0));
    }

    #[test]
    fn document_shape() {
        let store = sample_store();
        let value: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();
        let db = &value["db"];
        assert_eq!(db["POINT_0"]["x"], 1.0);
        assert_eq!(db["POINT_0"]["tags"]["name"], "Parker's Piece");
        assert_eq!(db["PATH_0"]["pathType"]["first_level_descriptor"], "highway");
        assert_eq!(db["PATH_0"]["parts"][0]["point"], "POINT_0");
        assert_eq!(db["AREA_0"]["mapPointIDs"][2], "POINT_2");
        assert_eq!(db["COMPLEX-AREA-PART_0"]["role"], "outer");
        assert_eq!(db["COMPLEX-AREA-PART_0"]["sourceWay"], 1001);
        assert_eq!(db["COMPLEX-AREA_0"]["outerAreaID"], "COMPLEX-AREA-PART_0");
        assert_eq!(db["COMPLEX-AREA_0"]["innerAreaIDs"][0], "COMPLEX-AREA-PART_1");
        assert_eq!(db["TILE_0"]["zoom"], 2.0);
    }

    #[test]
    fn writer_and_reader_agree() {
        let store = sample_store();
        let mut buf = Vec::new();
        store.to_writer(&mut buf).unwrap();
        let back = ObjectStore::from_reader(buf.as_slice()).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn rejects_cyclic_path() {
        let json = r#"{"db": {"PATH_0": {
            "parts": [{"point": "POINT_0", "next": [1]}, {"point": "POINT_1", "next": [0]}],
            "pathType": {"first_level_descriptor": "highway", "second_level_descriptor": "primary"}
        }}}"#;
        assert!(matches!(ObjectStore::from_json(json), Err(MapError::Json(_))));
    }

    #[test]
    fn rejects_diamond_path() {
        let json = r#"{"db": {"PATH_0": {
            "parts": [
                {"point": "POINT_0", "next": [1, 2]},
                {"point": "POINT_1", "next": [3]},
                {"point": "POINT_2", "next": [3]},
                {"point": "POINT_3"}
            ],
            "pathType": {"first_level_descriptor": "highway", "second_level_descriptor": "primary"}
        }}}"#;
        assert!(ObjectStore::from_json(json).is_err());
    }

    #[test]
    fn rejects_body_not_matching_prefix() {
        let json = r#"{"db": {"POINT_0": {"outerAreaID": "COMPLEX-AREA-PART_0", "innerAreaIDs": []}}}"#;
        assert!(matches!(ObjectStore::from_json(json), Err(MapError::Json(_))));
    }

    #[test]
    fn rejects_unknown_prefix() {
        let json = r#"{"db": {"WIDGET_1": {"x": 0.0, "y": 0.0}}}"#;
        assert!(matches!(ObjectStore::from_json(json), Err(MapError::InvalidId(_))));
    }
}
