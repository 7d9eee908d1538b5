use foundation::math::LatLng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PLACE_COLOR: &str = "#3b82f6";

/// A visited city as delivered by the diary API.
///
/// Coordinates are optional on the wire; use [`Place::position`] to get a
/// validated location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub country_id: String,
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
    #[serde(default)]
    pub has_records: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Last diary update, milliseconds since the Unix epoch.
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at_ms: Option<u64>,
}

fn default_color() -> String {
    DEFAULT_PLACE_COLOR.to_string()
}

impl Place {
    pub fn new(country_id: impl Into<String>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            country_id: country_id.into(),
            name: name.into(),
            lat: Some(lat),
            lng: Some(lng),
            color: default_color(),
            city_id: None,
            has_records: false,
            thumbnail_url: None,
            updated_at_ms: None,
        }
    }

    pub fn with_city_id(mut self, city_id: impl Into<String>) -> Self {
        self.city_id = Some(city_id.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_records(mut self, thumbnail_url: Option<&str>, updated_at_ms: Option<u64>) -> Self {
        self.has_records = true;
        self.thumbnail_url = thumbnail_url.map(str::to_string);
        self.updated_at_ms = updated_at_ms;
        self
    }

    /// The place's location, if both coordinates are present and in range.
    pub fn position(&self) -> Option<LatLng> {
        let p = LatLng::new(self.lat?, self.lng?);
        p.is_valid().then_some(p)
    }

    pub fn is_locatable(&self) -> bool {
        self.position().is_some()
    }
}
