use layclip_boolean::{xor, ClipOptions};
use layclip_core::{Point, PolyTree, PolygonSet, Ring};
use layclip_offset::{offset, JoinStyle, OffsetOptions};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ring(coords: &[(i64, i64)]) -> Ring {
    Ring::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
}

fn round_trip(set: &PolygonSet, delta: f64, opts: &OffsetOptions) -> PolyTree {
    let grown = offset(set, delta, opts).unwrap().into_polygon_set();
    offset(&grown, -delta, opts).unwrap()
}

#[test]
fn test_mitre_round_trip_is_exact_on_rectilinear_rings() {
    init_logger();
    let opts = OffsetOptions::default();
    let shapes = [
        PolygonSet::from_rings(vec![ring(&[(0, 0), (50, 0), (50, 30), (0, 30)])]),
        PolygonSet::from_rings(vec![ring(&[
            (0, 0),
            (60, 0),
            (60, 20),
            (20, 20),
            (20, 50),
            (0, 50),
        ])]),
    ];
    for set in &shapes {
        let back = round_trip(set, 7.0, &opts);
        assert_eq!(back.area2(), set.area2());
        let diff = xor(&back.to_polygon_set(), set, &ClipOptions::default()).unwrap();
        assert!(diff.is_empty(), "{diff:?}");
    }
}

#[test]
fn test_round_join_round_trip_within_tolerance() {
    init_logger();
    let set = PolygonSet::from_rings(vec![ring(&[(0, 0), (200, 0), (200, 120), (0, 120)])]);
    let opts = OffsetOptions::with_join(JoinStyle::round(64));
    let back = round_trip(&set, 12.0, &opts);
    assert_eq!(back.len(), 1);
    let lost = (set.area() - back.area()).abs();
    // Corners return slightly rounded; bounded by the four corner
    // differences between a square and an inscribed quarter circle.
    assert!(lost <= 4.0 * 12.0 * 12.0 * (1.0 - std::f64::consts::PI / 4.0) + 20.0, "lost {lost}");
}

#[test]
fn test_offset_of_grown_shape_contains_original() {
    init_logger();
    let set = PolygonSet::from_rings(vec![ring(&[(0, 0), (40, 10), (25, 45), (5, 30)])]);
    for join in [
        JoinStyle::default(),
        JoinStyle::round(32),
        JoinStyle::Square,
        JoinStyle::Bevel,
    ] {
        let grown = offset(&set, 5.0, &OffsetOptions::with_join(join)).unwrap();
        assert_eq!(grown.len(), 1);
        assert!(grown.area() > set.area());
        let grown_set = grown.to_polygon_set();
        for p in set.rings()[0].points() {
            assert!(grown_set.contains_point(*p, layclip_core::FillRule::NonZero));
        }
    }
}

#[test]
fn test_concentric_hole_collapses() {
    init_logger();
    let set = PolygonSet::from_rings(vec![
        ring(&[(0, 0), (100, 0), (100, 100), (0, 100)]),
        ring(&[(40, 40), (40, 60), (60, 60), (60, 40)]),
    ]);
    let result = offset(&set, 15.0, &OffsetOptions::default()).unwrap();
    assert_eq!(result.len(), set.len() - 1);
    assert_eq!(result.hole_count(), 0);
}

#[test]
fn test_thin_feature_disappears_when_shrunk() {
    init_logger();
    // A bar four units thick attached to a large block.
    let set = PolygonSet::from_rings(vec![ring(&[
        (0, 0),
        (40, 0),
        (40, 40),
        (24, 40),
        (24, 44),
        (60, 44),
        (60, 48),
        (0, 48),
    ])]);
    let shrunk = offset(&set, -3.0, &OffsetOptions::default()).unwrap();
    assert_eq!(shrunk.len(), 1);
    let bbox = shrunk.to_polygon_set().bbox().unwrap();
    assert!(bbox.max.x <= 37, "{bbox:?}");
}
