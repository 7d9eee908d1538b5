use super::LatLng;

/// Orthographic view of a unit globe, looking straight down at `center`.
///
/// `altitude` is expressed in globe radii above the surface, the unit the
/// renderer's camera uses. Points on the far hemisphere do not project.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthographicCamera {
    pub center: LatLng,
    pub altitude: f64,
    pub viewport_px: [f64; 2],
}

/// Smallest altitude the projection scale is computed from.
const MIN_ALTITUDE: f64 = 0.05;

impl OrthographicCamera {
    pub fn new(center: LatLng, altitude: f64, viewport_px: [f64; 2]) -> Self {
        Self {
            center,
            altitude,
            viewport_px,
        }
    }

    /// Pixels per globe radius at the current altitude.
    pub fn scale_px(&self) -> f64 {
        let min_side = self.viewport_px[0].min(self.viewport_px[1]).max(1.0);
        0.5 * min_side / self.altitude.max(MIN_ALTITUDE)
    }

    pub fn project(&self, point: LatLng) -> Option<[f64; 2]> {
        if !point.is_valid() || !self.center.is_valid() {
            return None;
        }
        let p = point.to_unit_vector();
        let forward = self.center.to_unit_vector();
        if dot(p, forward) < 0.0 {
            return None;
        }

        let lat = self.center.lat.to_radians();
        let lng = self.center.lng.to_radians();
        let east = [-lng.sin(), lng.cos(), 0.0];
        let north = [-lat.sin() * lng.cos(), -lat.sin() * lng.sin(), lat.cos()];

        let scale = self.scale_px();
        let x = self.viewport_px[0] * 0.5 + dot(p, east) * scale;
        // Screen y grows downward.
        let y = self.viewport_px[1] * 0.5 - dot(p, north) * scale;
        Some([x, y])
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
