use geo::{Bearing, Distance, Geodesic, InterpolatePoint, Point};
use serde::{Deserialize, Serialize};

pub const FEET_PER_METER: f64 = 3.28084;
pub const SQUARE_FEET_PER_SQUARE_METER: f64 = 10.7639;

/// Equirectangular scale factor, meters per degree at the equator.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Point pairs closer than this are treated as the same point.
pub const MIN_SEPARATION_METERS: f64 = 0.01;

/// WGS84 position: degrees east/north, height above the ellipsoid in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub height: f64,
}

impl Geodetic {
    pub fn new(lon: f64, lat: f64, height: f64) -> Self {
        Self { lon, lat, height }
    }

    pub fn on_surface(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, 0.0)
    }

    pub fn to_point(self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

impl From<Geodetic> for Point {
    fn from(g: Geodetic) -> Self {
        g.to_point()
    }
}

/// Ellipsoidal geodesic distance in meters, valid for arbitrarily
/// separated pairs including near-antipodal ones.
pub fn distance_meters(a: Geodetic, b: Geodetic) -> f64 {
    Geodesic.distance(a.to_point(), b.to_point())
}

/// Initial bearing of the geodesic from `a` to `b`, degrees clockwise
/// from north, normalized to `[0, 360)`.
pub fn initial_bearing(a: Geodetic, b: Geodetic) -> f64 {
    Geodesic.bearing(a.to_point(), b.to_point()).rem_euclid(360.0)
}

/// Rotation for a label drawn along a line with the given bearing.
///
/// Bearings in (90°, 270°) are flipped by 180° so the text is never
/// rendered upside-down; the normalized result always lands in
/// `[0, 90] ∪ [270, 360)`.
pub fn label_rotation(bearing_deg: f64) -> f64 {
    let bearing = bearing_deg.rem_euclid(360.0);
    if bearing > 90.0 && bearing < 270.0 {
        bearing - 180.0
    } else {
        bearing
    }
}

/// Geodesic midpoint, with heights averaged linearly.
pub fn midpoint(a: Geodetic, b: Geodetic) -> Geodetic {
    let mid = Geodesic.point_at_ratio_between(a.to_point(), b.to_point(), 0.5);
    Geodetic::new(mid.x(), mid.y(), (a.height + b.height) / 2.0)
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

pub fn square_meters_to_square_feet(square_meters: f64) -> f64 {
    square_meters * SQUARE_FEET_PER_SQUARE_METER
}

/// Shoelace area over raw (lon, lat) pairs scaled by `METERS_PER_DEGREE²`.
///
/// This is a planar equirectangular approximation, not a geodesic polygon
/// area: it degrades at high latitude and for large rings. Kept as-is on
/// purpose; the precision contract of the measurement display is tied to
/// this formula.
pub fn ring_area_square_meters(ring: &[Geodetic]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut doubled = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        doubled += a.lon * b.lat - b.lon * a.lat;
    }
    0.5 * doubled.abs() * METERS_PER_DEGREE * METERS_PER_DEGREE
}

/// Arithmetic mean of the ring vertices, used to anchor area labels.
pub fn ring_centroid(ring: &[Geodetic]) -> Option<Geodetic> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (lon, lat, height) = ring.iter().fold((0.0, 0.0, 0.0), |acc, g| {
        (acc.0 + g.lon, acc.1 + g.lat, acc.2 + g.height)
    });
    Some(Geodetic::new(lon / n, lat / n, height / n))
}
