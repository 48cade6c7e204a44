//! Geographic utilities: great-circle distance and path length.

use crate::GpsPoint;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine (great-circle) distance between two points, in meters.
///
/// # Example
/// ```
/// use walk_tracker::GpsPoint;
/// use walk_tracker::geo_utils::haversine_distance;
///
/// let a = GpsPoint::new(51.5074, -0.1278); // London
/// let b = GpsPoint::new(48.8566, 2.3522);  // Paris
/// let d = haversine_distance(&a, &b);
/// assert!((d - 343_500.0).abs() < 1_000.0);
/// ```
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = (p2.latitude - p1.latitude).to_radians();
    let dlng = (p2.longitude - p1.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Total length of a path in meters (sum of consecutive segment distances).
pub fn path_distance(points: &[GpsPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = GpsPoint::new(51.5074, -0.1278);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // One degree of latitude is ~111.2 km
        let a = GpsPoint::new(51.0, 0.0);
        let b = GpsPoint::new(52.0, 0.0);
        let d = haversine_distance(&a, &b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GpsPoint::new(51.5074, -0.1278);
        let b = GpsPoint::new(48.8566, 2.3522);
        let d1 = haversine_distance(&a, &b);
        let d2 = haversine_distance(&b, &a);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_path_distance_sums_segments() {
        let points = vec![
            GpsPoint::new(51.0, 0.0),
            GpsPoint::new(51.001, 0.0),
            GpsPoint::new(51.002, 0.0),
        ];
        let total = path_distance(&points);
        let seg1 = haversine_distance(&points[0], &points[1]);
        let seg2 = haversine_distance(&points[1], &points[2]);
        assert!((total - (seg1 + seg2)).abs() < 1e-9);
    }

    #[test]
    fn test_path_distance_short_inputs() {
        assert_eq!(path_distance(&[]), 0.0);
        assert_eq!(path_distance(&[GpsPoint::new(51.0, 0.0)]), 0.0);
    }
}
