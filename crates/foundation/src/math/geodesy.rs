/// Mean Earth radius (kilometers) used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite and inside the usual degree ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= 90.0
            && self.lng.abs() <= 180.0
    }

    /// Unit vector on the sphere: x toward (0, 0), y toward (0, 90E), z toward the north pole.
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lng = self.lng.to_radians();
        [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
    }
}

/// Great-circle distance between two points (kilometers).
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng * 0.5).sin().powi(2);
    // Rounding can push `h` a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Wraps a longitude into `[-180, 180)`.
pub fn normalize_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Largest per-axis angular change between two orientations (degrees).
///
/// The longitude delta takes the short way around the antimeridian.
pub fn angular_delta_deg(current: LatLng, previous: LatLng) -> f64 {
    let d_lat = (current.lat - previous.lat).abs();
    let d_lng = normalize_lng(current.lng - previous.lng).abs();
    d_lat.max(d_lng)
}

/// True when the camera moved by more than `threshold_deg` on either axis.
///
/// Used to ignore sub-degree jitter from drag gestures and camera damping.
pub fn is_significant_rotation(current: LatLng, previous: LatLng, threshold_deg: f64) -> bool {
    let delta = angular_delta_deg(current, previous);
    delta.is_finite() && delta > threshold_deg
}

/// Arithmetic mean of the valid points, or `None` if there are none.
pub fn mean_centroid<I>(points: I) -> Option<LatLng>
where
    I: IntoIterator<Item = LatLng>,
{
    weighted_centroid(points.into_iter().map(|p| (p, 1.0)))
}

/// Weighted mean of the valid points.
///
/// Points that are not [`LatLng::is_valid`] or carry a non-positive weight are skipped.
pub fn weighted_centroid<I>(points: I) -> Option<LatLng>
where
    I: IntoIterator<Item = (LatLng, f64)>,
{
    let mut lat = 0.0;
    let mut lng = 0.0;
    let mut total = 0.0;
    for (p, w) in points {
        if !p.is_valid() || !w.is_finite() || w <= 0.0 {
            continue;
        }
        lat += p.lat * w;
        lng += p.lng * w;
        total += w;
    }
    if total <= 0.0 {
        return None;
    }
    Some(LatLng::new(lat / total, lng / total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn haversine_zero_for_same_point() {
        let p = LatLng::new(37.5, 127.0);
        assert_close(haversine_km(p, p), 0.0, 1e-9);
    }

    #[test]
    fn haversine_seoul_tokyo() {
        let seoul = LatLng::new(37.5665, 126.978);
        let tokyo = LatLng::new(35.6762, 139.6503);
        // Published great-circle distance is ~1,150 km.
        assert_close(haversine_km(seoul, tokyo), 1_150.0, 5.0);
    }

    #[test]
    fn haversine_one_degree_of_longitude_on_equator() {
        let d = haversine_km(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        assert_close(d, 111.19, 0.05);
    }

    #[test]
    fn haversine_antipodes_is_half_circumference() {
        let d = haversine_km(LatLng::new(0.0, 0.0), LatLng::new(0.0, 180.0));
        assert_close(d, std::f64::consts::PI * EARTH_RADIUS_KM, 1e-6);
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert_close(normalize_lng(190.0), -170.0, 1e-12);
        assert_close(normalize_lng(-190.0), 170.0, 1e-12);
        assert_close(normalize_lng(45.0), 45.0, 1e-12);
    }

    #[test]
    fn rotation_delta_takes_short_way_across_antimeridian() {
        let a = LatLng::new(10.0, 179.0);
        let b = LatLng::new(10.0, -179.0);
        assert_close(angular_delta_deg(a, b), 2.0, 1e-9);
    }

    #[test]
    fn significant_rotation_is_strictly_above_threshold() {
        let base = LatLng::new(0.0, 0.0);
        assert!(!is_significant_rotation(LatLng::new(0.0, 2.0), base, 2.0));
        assert!(is_significant_rotation(LatLng::new(0.0, 2.5), base, 2.0));
        assert!(is_significant_rotation(LatLng::new(-3.0, 0.0), base, 2.0));
        assert!(!is_significant_rotation(LatLng::new(f64::NAN, 0.0), base, 2.0));
    }

    #[test]
    fn mean_centroid_skips_invalid_points() {
        let c = mean_centroid([
            LatLng::new(35.6, 139.7),
            LatLng::new(34.7, 135.5),
            LatLng::new(f64::NAN, 10.0),
        ])
        .unwrap();
        assert_close(c.lat, 35.15, 1e-9);
        assert_close(c.lng, 137.6, 1e-9);
    }

    #[test]
    fn centroid_of_nothing_is_none() {
        assert!(mean_centroid(std::iter::empty()).is_none());
        assert!(mean_centroid([LatLng::new(95.0, 0.0)]).is_none());
    }

    #[test]
    fn weighted_centroid_pulls_toward_heavier_point() {
        let c = weighted_centroid([(LatLng::new(0.0, 0.0), 3.0), (LatLng::new(0.0, 10.0), 1.0)])
            .unwrap();
        assert_close(c.lng, 2.5, 1e-12);
    }
}
