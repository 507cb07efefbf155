// Horizontal distance and polygon area on the sphere
use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// WGS84 equatorial radius in meters, used by the area accumulation.
pub const WGS84_EQUATORIAL_RADIUS: f64 = 6_378_137.0;

/// A clicked map location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    // geo works in (x, y) = (lng, lat)
    fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

/// Great-circle distance between two points in meters.
pub fn horizontal_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    Haversine::distance(a.to_point(), b.to_point())
}

/// Unsigned area in square meters of the ring formed by `points`, closing
/// last -> first implicitly. Fewer than three points enclose nothing and
/// yield exactly 0.
///
/// Each edge contributes with its own two endpoints (closed-ring form), not
/// relative to a fixed anchor vertex, so the constant terms cancel around the
/// ring.
///
/// Spherical-excess style accumulation over each edge; no winding or
/// self-intersection handling, so a self-intersecting ring gives a
/// well-defined but meaningless number.
pub fn geodesic_area(points: &[GeoPoint]) -> f64 {
    let n = points.len();
    if n <= 2 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let d_lng = (p2.lng - p1.lng).to_radians();
        sum += d_lng * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin());
    }

    (sum * WGS84_EQUATORIAL_RADIUS * WGS84_EQUATORIAL_RADIUS / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Side of a ~100 m square expressed in degrees at the equator
    fn hundred_meters_in_degrees() -> f64 {
        100.0 / (2.0 * std::f64::consts::PI * WGS84_EQUATORIAL_RADIUS / 360.0)
    }

    #[test]
    fn area_of_degenerate_rings_is_zero() {
        assert_eq!(geodesic_area(&[]), 0.0);
        assert_eq!(geodesic_area(&[GeoPoint::new(-36.88, 174.78)]), 0.0);
        assert_eq!(
            geodesic_area(&[GeoPoint::new(-36.88, 174.78), GeoPoint::new(-36.89, 174.79)]),
            0.0
        );
    }

    #[test]
    fn small_equatorial_square_matches_planar_area() {
        let d = hundred_meters_in_degrees();
        let square = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, d),
            GeoPoint::new(d, d),
            GeoPoint::new(d, 0.0),
        ];

        let area = geodesic_area(&square);
        assert!((area - 10_000.0).abs() / 10_000.0 < 0.03, "area was {}", area);
    }

    #[test]
    fn area_ignores_winding_direction() {
        let d = hundred_meters_in_degrees();
        let ccw = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, d),
            GeoPoint::new(d, d),
            GeoPoint::new(d, 0.0),
        ];
        let mut cw = ccw;
        cw.reverse();

        assert!((geodesic_area(&ccw) - geodesic_area(&cw)).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric_and_positive() {
        let a = GeoPoint::new(-36.8830, 174.7804);
        let b = GeoPoint::new(-36.8835, 174.7809);

        let ab = horizontal_distance(a, b);
        let ba = horizontal_distance(b, a);
        assert!(ab > 0.0);
        assert!((ab - ba).abs() < 1e-9);
        // ~70 m apart
        assert!(ab > 60.0 && ab < 80.0, "distance was {}", ab);
        assert_eq!(horizontal_distance(a, a), 0.0);
    }
}
