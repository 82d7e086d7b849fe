//! Route → territory polygon derivation.
//!
//! A closed loop (start ≈ end within the configured tolerance) encloses its
//! own polygon; anything else falls back to a fixed-width corridor around the
//! path so an out-and-back run still stakes a thin claim.

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use crate::error::{Error, Result};
use crate::game::geometry::{self, haversine_m, Projection};
use crate::game::types::RoutePoint;

/// Minimum number of fixes needed to derive any polygon at all.
const MIN_ROUTE_POINTS: usize = 3;

/// True when the route returns to (roughly) where it started.
pub fn is_closed_loop(route: &[RoutePoint], tolerance_m: f64) -> bool {
    match (route.first(), route.last()) {
        (Some(&first), Some(&last)) => haversine_m(first, last) <= tolerance_m,
        _ => false,
    }
}

/// Derive the territory polygon for a route, in lat/lng coordinates.
pub fn derive_polygon(
    route: &[RoutePoint],
    loop_tolerance_m: f64,
    corridor_half_width_m: f64,
) -> Result<MultiPolygon<f64>> {
    if route.len() < MIN_ROUTE_POINTS {
        return Err(Error::Validation(format!(
            "route has {} points, need at least {MIN_ROUTE_POINTS}",
            route.len()
        )));
    }

    let proj = Projection::centered_on(route[0]);
    let plane: Vec<Coord<f64>> = route.iter().map(|&p| proj.to_plane(p)).collect();

    let solid = if is_closed_loop(route, loop_tolerance_m) {
        enclosure(&plane)
    } else {
        corridor(&plane, corridor_half_width_m / 1000.0)
    };

    Ok(proj.unproject(&solid))
}

/// Snap the ring shut and let the boolean kernel resolve any
/// self-intersections the GPS trace picked up.
fn enclosure(plane: &[Coord<f64>]) -> MultiPolygon<f64> {
    let mut ring = plane.to_vec();
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    let raw = MultiPolygon::from(Polygon::new(LineString::from(ring), Vec::new()));
    raw.union(&geometry::empty())
}

/// Fixed-width corridor: one quad per segment plus a square pad per vertex to
/// fill the elbows, all unioned into a single solid.
fn corridor(plane: &[Coord<f64>], half_width_km: f64) -> MultiPolygon<f64> {
    let mut solid = geometry::empty();

    for pair in plane.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len = (dx * dx + dy * dy).sqrt();
        if len < f64::EPSILON {
            continue;
        }
        // unit normal, scaled to the half-width
        let nx = -dy / len * half_width_km;
        let ny = dx / len * half_width_km;
        let quad = Polygon::new(
            LineString::from(vec![
                Coord {
                    x: a.x + nx,
                    y: a.y + ny,
                },
                Coord {
                    x: b.x + nx,
                    y: b.y + ny,
                },
                Coord {
                    x: b.x - nx,
                    y: b.y - ny,
                },
                Coord {
                    x: a.x - nx,
                    y: a.y - ny,
                },
            ]),
            Vec::new(),
        );
        solid = solid.union(&MultiPolygon::from(quad));
    }

    for &p in plane {
        let pad = Polygon::new(
            LineString::from(vec![
                Coord {
                    x: p.x - half_width_km,
                    y: p.y - half_width_km,
                },
                Coord {
                    x: p.x + half_width_km,
                    y: p.y - half_width_km,
                },
                Coord {
                    x: p.x + half_width_km,
                    y: p.y + half_width_km,
                },
                Coord {
                    x: p.x - half_width_km,
                    y: p.y + half_width_km,
                },
            ]),
            Vec::new(),
        );
        solid = solid.union(&MultiPolygon::from(pad));
    }

    solid
}
