use layers::ClusterMode;
use serde::Serialize;

/// Label granularity the globe is showing.
///
/// Only city mode carries an expanded country.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mode {
    Continent,
    #[default]
    Country,
    City {
        #[serde(rename = "expandedCountry")]
        expanded_country: String,
    },
}

impl Mode {
    pub fn is_city(&self) -> bool {
        matches!(self, Mode::City { .. })
    }

    pub fn expanded_country(&self) -> Option<&str> {
        match self {
            Mode::City { expanded_country } => Some(expanded_country.as_str()),
            Mode::Continent | Mode::Country => None,
        }
    }

    pub fn cluster_mode(&self) -> ClusterMode<'_> {
        match self {
            Mode::Continent => ClusterMode::Continent,
            Mode::Country => ClusterMode::Country,
            Mode::City { expanded_country } => ClusterMode::City {
                country_id: expanded_country,
            },
        }
    }
}
