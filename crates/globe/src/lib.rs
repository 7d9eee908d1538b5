//! Interactive globe state: drill-in navigation, rotation-driven collapse
//! and camera fitting on top of the `layers` cluster builder.

pub mod camera;
pub mod config;
pub mod mode;
pub mod navigation;
pub mod rotation;
pub mod session;

pub use camera::{CameraMove, fit_camera};
pub use config::*;
pub use mode::Mode;
pub use navigation::{ClickOutcome, DrillFrame, Navigator, ZoomOutcome};
pub use rotation::{RotationOutcome, RotationWatcher};
pub use session::{GlobeEvent, GlobeSession};
