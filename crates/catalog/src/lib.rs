pub mod countries;
pub mod place;

use std::collections::BTreeMap;

use tracing::warn;

pub use countries::{Continent, CountryInfo, continent_of, country, country_name, flag_emoji};
pub use place::Place;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Parse(String),
    InvalidPlace { index: usize, reason: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(msg) => write!(f, "place list is not valid JSON: {msg}"),
            CatalogError::InvalidPlace { index, reason } => {
                write!(f, "place #{index} is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only list of visited places for one globe view.
///
/// Places keep the order the API returned them in. Entries without a country
/// are dropped at load time; entries without usable coordinates are kept (they
/// still belong to their country) but never contribute to any centroid.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlaceCatalog {
    places: Vec<Place>,
}

impl PlaceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_places(places: Vec<Place>) -> Self {
        let mut kept = Vec::with_capacity(places.len());
        for (index, place) in places.into_iter().enumerate() {
            if let Err(err) = validate(index, &place) {
                warn!("dropping place: {err}");
                continue;
            }
            if !place.is_locatable() {
                warn!(
                    "place #{index} ({}/{}) has no usable coordinates",
                    place.country_id, place.name
                );
            }
            kept.push(place);
        }
        Self { places: kept }
    }

    /// Parses a JSON array of places.
    ///
    /// An empty string or `null` is treated as "no places".
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let places = serde_json::from_str::<Option<Vec<Place>>>(raw)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(Self::from_places(places.unwrap_or_default()))
    }

    /// Strict variant of [`PlaceCatalog::from_places`]: the first invalid entry is an error.
    pub fn try_from_places(places: Vec<Place>) -> Result<Self, CatalogError> {
        for (index, place) in places.iter().enumerate() {
            validate(index, place)?;
        }
        Ok(Self { places })
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn into_places(self) -> Vec<Place> {
        self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Places grouped by country code, in code order.
    pub fn by_country(&self) -> BTreeMap<&str, Vec<&Place>> {
        let mut out: BTreeMap<&str, Vec<&Place>> = BTreeMap::new();
        for place in &self.places {
            out.entry(place.country_id.as_str()).or_default().push(place);
        }
        out
    }
}

fn validate(index: usize, place: &Place) -> Result<(), CatalogError> {
    if place.country_id.trim().is_empty() {
        return Err(CatalogError::InvalidPlace {
            index,
            reason: format!("'{}' has no country", place.name),
        });
    }
    Ok(())
}
