//! Planar geometry helpers on top of the `geo` crate.
//!
//! Persisted polygons use lat/lng coordinates (x = lng, y = lat). All boolean
//! and area math runs in a local equirectangular plane measured in kilometres,
//! which is planar-enough at game scale for areas to be meaningful.

use geo::{Area, Coord, MapCoords, MultiPolygon};

use crate::game::types::RoutePoint;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const KM_PER_DEG_LAT: f64 = 110.574;
const KM_PER_DEG_LNG_EQUATOR: f64 = 111.320;

/// Areas below this are treated as empty (boolean-op slivers, dead rivals).
pub const MIN_AREA_KM2: f64 = 1e-9;

/// Great-circle distance between two fixes, in metres.
pub fn haversine_m(a: RoutePoint, b: RoutePoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Local equirectangular projection anchored on one reference fix. Every
/// polygon taking part in one claim is projected through the same instance so
/// unions and intersections line up.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    lat0: f64,
    lng0: f64,
    km_per_deg_lng: f64,
}

impl Projection {
    pub fn centered_on(anchor: RoutePoint) -> Self {
        Projection {
            lat0: anchor.lat,
            lng0: anchor.lng,
            km_per_deg_lng: KM_PER_DEG_LNG_EQUATOR * anchor.lat.to_radians().cos(),
        }
    }

    /// lat/lng → plane km.
    pub fn to_plane(&self, p: RoutePoint) -> Coord<f64> {
        Coord {
            x: (p.lng - self.lng0) * self.km_per_deg_lng,
            y: (p.lat - self.lat0) * KM_PER_DEG_LAT,
        }
    }

    /// plane km → lat/lng.
    pub fn to_latlng(&self, c: Coord<f64>) -> RoutePoint {
        RoutePoint {
            lat: self.lat0 + c.y / KM_PER_DEG_LAT,
            lng: self.lng0 + c.x / self.km_per_deg_lng,
        }
    }

    /// Project a stored lat/lng multipolygon (x = lng, y = lat) into the plane.
    pub fn project(&self, latlng: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        latlng.map_coords(|c| {
            self.to_plane(RoutePoint {
                lat: c.y,
                lng: c.x,
            })
        })
    }

    /// Map a plane multipolygon back to lat/lng coordinates for storage.
    pub fn unproject(&self, plane: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        plane.map_coords(|c| {
            let p = self.to_latlng(c);
            Coord { x: p.lng, y: p.lat }
        })
    }
}

/// Total area of a plane multipolygon in km².
pub fn area_km2(plane: &MultiPolygon<f64>) -> f64 {
    plane.unsigned_area()
}

/// Area of a stored lat/lng multipolygon, measured through a projection
/// anchored on its first vertex.
pub fn latlng_area_km2(latlng: &MultiPolygon<f64>) -> f64 {
    let Some(first) = latlng.0.first().and_then(|p| p.exterior().0.first()) else {
        return 0.0;
    };
    let proj = Projection::centered_on(RoutePoint {
        lat: first.y,
        lng: first.x,
    });
    area_km2(&proj.project(latlng))
}

pub fn is_empty(plane: &MultiPolygon<f64>) -> bool {
    plane.0.is_empty() || area_km2(plane) < MIN_AREA_KM2
}

pub fn empty() -> MultiPolygon<f64> {
    MultiPolygon::new(Vec::new())
}
