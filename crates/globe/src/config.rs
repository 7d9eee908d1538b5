use layers::ClusterConfig;
use serde::{Deserialize, Serialize};

/// Camera altitude (globe radii) the view starts at and resets to.
pub const DEFAULT_ZOOM: f64 = 2.5;
/// Zooming out to this multiple of [`DEFAULT_ZOOM`] switches to continent mode and clears history.
pub const CONTINENT_ZOOM_RATIO: f64 = 1.2;
/// Smallest zoom-out step that counts as "the user zoomed out" for undo.
pub const ZOOM_EPSILON: f64 = 0.01;
/// Zoom changes at or below this are treated as jitter and not tracked.
pub const SMOOTH_ZOOM_THRESHOLD: f64 = 0.05;
/// Altitude separating city-level from country-level viewing.
pub const CITY_COUNTRY_BOUNDARY: f64 = 0.6;
/// How long rotation is ignored after a drill into a country while the camera flies.
pub const ZOOM_ANIMATION_S: f64 = 1.2;

pub const ROTATION_THRESHOLD_DEG: f64 = 3.0;
pub const ROTATION_COLLAPSE_DELAY_S: f64 = 1.0;
/// Blend factor toward the newest rotation sample outside city mode.
pub const ROTATION_SMOOTHING: f64 = 0.2;

pub const FLY_DURATION_MS: u32 = 1_000;
pub const MIN_FIT_ALTITUDE: f64 = 0.2;
pub const ALTITUDE_PER_DEGREE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "globe config is not valid JSON: {msg}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    pub default_zoom: f64,
    pub continent_zoom_ratio: f64,
    pub zoom_epsilon: f64,
    pub smooth_zoom_threshold: f64,
    pub city_country_boundary: f64,
    pub zoom_animation_s: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_zoom: DEFAULT_ZOOM,
            continent_zoom_ratio: CONTINENT_ZOOM_RATIO,
            zoom_epsilon: ZOOM_EPSILON,
            smooth_zoom_threshold: SMOOTH_ZOOM_THRESHOLD,
            city_country_boundary: CITY_COUNTRY_BOUNDARY,
            zoom_animation_s: ZOOM_ANIMATION_S,
        }
    }
}

impl NavigationConfig {
    pub fn continent_threshold(&self) -> f64 {
        self.default_zoom * self.continent_zoom_ratio
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RotationConfig {
    pub threshold_deg: f64,
    pub collapse_delay_s: f64,
    pub smoothing: f64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            threshold_deg: ROTATION_THRESHOLD_DEG,
            collapse_delay_s: ROTATION_COLLAPSE_DELAY_S,
            smoothing: ROTATION_SMOOTHING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    pub fly_duration_ms: u32,
    pub min_altitude: f64,
    pub max_altitude: f64,
    pub altitude_per_degree: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fly_duration_ms: FLY_DURATION_MS,
            min_altitude: MIN_FIT_ALTITUDE,
            max_altitude: DEFAULT_ZOOM,
            altitude_per_degree: ALTITUDE_PER_DEGREE,
        }
    }
}

/// Every tunable of one globe view.
///
/// Missing JSON fields fall back to the defaults above, so a config file only
/// needs to list what it overrides.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobeConfig {
    pub clusters: ClusterConfig,
    pub navigation: NavigationConfig,
    pub rotation: RotationConfig,
    pub camera: CameraConfig,
}

impl GlobeConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: GlobeConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.clusters;
        ratio("clusters.effectiveWidthRatio", c.effective_width_ratio)?;
        ratio("clusters.overlapRatio", c.overlap_ratio)?;
        positive("clusters.geoMergeKm", c.geo_merge_km)?;

        let n = &self.navigation;
        positive("navigation.defaultZoom", n.default_zoom)?;
        positive("navigation.continentZoomRatio", n.continent_zoom_ratio)?;
        non_negative("navigation.zoomEpsilon", n.zoom_epsilon)?;
        non_negative("navigation.smoothZoomThreshold", n.smooth_zoom_threshold)?;
        positive("navigation.cityCountryBoundary", n.city_country_boundary)?;
        non_negative("navigation.zoomAnimationS", n.zoom_animation_s)?;

        let r = &self.rotation;
        non_negative("rotation.thresholdDeg", r.threshold_deg)?;
        non_negative("rotation.collapseDelayS", r.collapse_delay_s)?;
        ratio("rotation.smoothing", r.smoothing)?;

        let cam = &self.camera;
        positive("camera.minAltitude", cam.min_altitude)?;
        positive("camera.altitudePerDegree", cam.altitude_per_degree)?;
        if cam.max_altitude < cam.min_altitude {
            return Err(ConfigError::Invalid {
                field: "camera.maxAltitude",
                reason: format!("{} is below minAltitude {}", cam.max_altitude, cam.min_altitude),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("{value} must be a positive number"),
    })
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("{value} must be zero or more"),
    })
}

fn ratio(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("{value} must be in (0, 1]"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_overrides_defaults() {
        let config = GlobeConfig::from_json_str(
            r#"{ "navigation": { "defaultZoom": 2.0 }, "rotation": { "collapseDelayS": 0.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.navigation.default_zoom, 2.0);
        assert_eq!(config.navigation.zoom_epsilon, ZOOM_EPSILON);
        assert_eq!(config.rotation.collapse_delay_s, 0.5);
        assert_eq!(config.clusters, ClusterConfig::default());
    }

    #[test]
    fn continent_threshold_scales_default_zoom() {
        let n = NavigationConfig::default();
        assert!((n.continent_threshold() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = GlobeConfig::from_json_str(r#"{ "clusters": { "overlapRatio": 1.5 } }"#)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                field: "clusters.overlapRatio",
                reason: "1.5 must be in (0, 1]".to_string()
            }
        );

        let err = GlobeConfig::from_json_str(r#"{ "camera": { "maxAltitude": 0.1 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.maxAltitude", .. }));
    }

    #[test]
    fn rejects_broken_json() {
        assert!(matches!(
            GlobeConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
