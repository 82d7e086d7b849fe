//! Route → polygon derivation: loops enclose, open paths get a corridor.

use stridelands_server::error::Error;
use stridelands_server::game::geometry::latlng_area_km2;
use stridelands_server::game::route::{derive_polygon, is_closed_loop};
use stridelands_server::game::types::RoutePoint;

const LOOP_TOLERANCE_M: f64 = 50.0;
const CORRIDOR_HALF_WIDTH_M: f64 = 25.0;

/// Degrees of latitude per kilometre (and longitude, at the equator).
const DEG_PER_KM_LAT: f64 = 1.0 / 110.574;
const DEG_PER_KM_LNG: f64 = 1.0 / 111.320;

/// A 1 km × 1 km square loop on the equator, returning to its start.
fn square_loop() -> Vec<RoutePoint> {
    vec![
        RoutePoint::new(0.0, 0.0),
        RoutePoint::new(DEG_PER_KM_LAT, 0.0),
        RoutePoint::new(DEG_PER_KM_LAT, DEG_PER_KM_LNG),
        RoutePoint::new(0.0, DEG_PER_KM_LNG),
        RoutePoint::new(0.0, 0.0),
    ]
}

#[test]
fn loop_detection_uses_the_tolerance() {
    let mut route = square_loop();
    assert!(is_closed_loop(&route, LOOP_TOLERANCE_M));

    // push the last fix ~30 m north: still a loop
    route.last_mut().unwrap().lat += 30.0 * DEG_PER_KM_LAT / 1000.0;
    assert!(is_closed_loop(&route, LOOP_TOLERANCE_M));

    // ~200 m away: no longer a loop
    route.last_mut().unwrap().lat += 200.0 * DEG_PER_KM_LAT / 1000.0;
    assert!(!is_closed_loop(&route, LOOP_TOLERANCE_M));
}

#[test]
fn closed_loop_encloses_its_square_kilometre() {
    let solid = derive_polygon(&square_loop(), LOOP_TOLERANCE_M, CORRIDOR_HALF_WIDTH_M)
        .expect("square loop should derive");
    let area = latlng_area_km2(&solid);
    assert!(
        (area - 1.0).abs() < 0.05,
        "1 km square loop should enclose ~1 km², got {area}"
    );
}

#[test]
fn open_route_gets_a_thin_corridor() {
    // 1 km straight line, nowhere near closing
    let path = vec![
        RoutePoint::new(0.0, 0.0),
        RoutePoint::new(0.0, DEG_PER_KM_LNG * 0.5),
        RoutePoint::new(0.0, DEG_PER_KM_LNG),
    ];
    let solid = derive_polygon(&path, LOOP_TOLERANCE_M, CORRIDOR_HALF_WIDTH_M)
        .expect("open path should derive a corridor");
    let area = latlng_area_km2(&solid);

    // 1 km × 50 m corridor plus the vertex pads
    assert!(
        area > 0.04 && area < 0.08,
        "corridor area should be close to 0.05 km², got {area}"
    );
}

#[test]
fn corridor_width_is_configurable() {
    let path = vec![
        RoutePoint::new(0.0, 0.0),
        RoutePoint::new(0.0, DEG_PER_KM_LNG * 0.5),
        RoutePoint::new(0.0, DEG_PER_KM_LNG),
    ];
    let thin = derive_polygon(&path, LOOP_TOLERANCE_M, 10.0).unwrap();
    let wide = derive_polygon(&path, LOOP_TOLERANCE_M, 50.0).unwrap();
    assert!(
        latlng_area_km2(&wide) > 3.0 * latlng_area_km2(&thin),
        "a 5× wider corridor should claim a lot more area"
    );
}

#[test]
fn short_routes_are_rejected() {
    let stub = vec![RoutePoint::new(0.0, 0.0), RoutePoint::new(0.0, 0.001)];
    let err = derive_polygon(&stub, LOOP_TOLERANCE_M, CORRIDOR_HALF_WIDTH_M).unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");
}
