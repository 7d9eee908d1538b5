use foundation::math::{LatLng, OrthographicCamera};
use globe::GlobeEvent;

pub const DEFAULT_VIEWPORT_PX: [f64; 2] = [1280.0, 720.0];

/// Minimal stand-in for the browser renderer: an orthographic camera that
/// follows the camera instructions a session emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandInRenderer {
    pub camera: OrthographicCamera,
}

impl StandInRenderer {
    pub fn new(camera: OrthographicCamera) -> Self {
        Self { camera }
    }

    pub fn looking_at(lat: f64, lng: f64, altitude: f64) -> Self {
        Self::new(OrthographicCamera::new(
            LatLng::new(lat, lng),
            altitude,
            DEFAULT_VIEWPORT_PX,
        ))
    }

    /// Rotation input from the user: the camera now looks at `(lat, lng)`.
    pub fn rotate_to(&mut self, lat: f64, lng: f64) {
        self.camera.center = LatLng::new(lat, lng);
    }

    pub fn zoom_to(&mut self, altitude: f64) {
        self.camera.altitude = altitude;
    }

    pub fn apply(&mut self, event: &GlobeEvent) {
        match event {
            GlobeEvent::CameraMove(mv) => {
                self.camera.center = LatLng::new(mv.lat, mv.lng);
                self.camera.altitude = mv.altitude;
            }
            GlobeEvent::SnapZoom { altitude } => self.camera.altitude = *altitude,
            GlobeEvent::ModeChanged { .. } | GlobeEvent::Collapsed => {}
        }
    }
}
