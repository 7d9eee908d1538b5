//! Compiled-in country table: ISO 3166-1 alpha-2 code → display name and continent.
//!
//! Continent membership drives continent-level label merging on the globe.
//! Transcontinental countries are listed under the continent most travellers
//! would file them under (Russia and Turkey under Europe, Egypt under Africa).

use serde::{Deserialize, Serialize};

use Continent::{
    Africa as AF, Antarctica as AN, Asia as AS, Europe as EU, NorthAmerica as NA, Oceania as OC,
    SouthAmerica as SA,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Continent {
    Asia,
    Europe,
    Africa,
    NorthAmerica,
    SouthAmerica,
    Oceania,
    Antarctica,
}

impl Continent {
    pub const ALL: [Continent; 7] = [
        Continent::Asia,
        Continent::Europe,
        Continent::Africa,
        Continent::NorthAmerica,
        Continent::SouthAmerica,
        Continent::Oceania,
        Continent::Antarctica,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::Africa => "Africa",
            Continent::NorthAmerica => "North America",
            Continent::SouthAmerica => "South America",
            Continent::Oceania => "Oceania",
            Continent::Antarctica => "Antarctica",
        }
    }

    /// Short stable key used in cluster ids.
    pub fn key(self) -> &'static str {
        match self {
            Continent::Asia => "asia",
            Continent::Europe => "europe",
            Continent::Africa => "africa",
            Continent::NorthAmerica => "north-america",
            Continent::SouthAmerica => "south-america",
            Continent::Oceania => "oceania",
            Continent::Antarctica => "antarctica",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub continent: Continent,
}

const fn c(code: &'static str, name: &'static str, continent: Continent) -> CountryInfo {
    CountryInfo {
        code,
        name,
        continent,
    }
}

/// Sorted by code so lookups can binary search.
pub const COUNTRIES: &[CountryInfo] = &[
    c("AD", "Andorra", EU),
    c("AE", "United Arab Emirates", AS),
    c("AF", "Afghanistan", AS),
    c("AG", "Antigua and Barbuda", NA),
    c("AL", "Albania", EU),
    c("AM", "Armenia", AS),
    c("AO", "Angola", AF),
    c("AQ", "Antarctica", AN),
    c("AR", "Argentina", SA),
    c("AT", "Austria", EU),
    c("AU", "Australia", OC),
    c("AZ", "Azerbaijan", AS),
    c("BA", "Bosnia and Herzegovina", EU),
    c("BB", "Barbados", NA),
    c("BD", "Bangladesh", AS),
    c("BE", "Belgium", EU),
    c("BF", "Burkina Faso", AF),
    c("BG", "Bulgaria", EU),
    c("BH", "Bahrain", AS),
    c("BI", "Burundi", AF),
    c("BJ", "Benin", AF),
    c("BN", "Brunei", AS),
    c("BO", "Bolivia", SA),
    c("BR", "Brazil", SA),
    c("BS", "Bahamas", NA),
    c("BT", "Bhutan", AS),
    c("BW", "Botswana", AF),
    c("BY", "Belarus", EU),
    c("BZ", "Belize", NA),
    c("CA", "Canada", NA),
    c("CD", "DR Congo", AF),
    c("CF", "Central African Republic", AF),
    c("CG", "Congo", AF),
    c("CH", "Switzerland", EU),
    c("CI", "Côte d'Ivoire", AF),
    c("CL", "Chile", SA),
    c("CM", "Cameroon", AF),
    c("CN", "China", AS),
    c("CO", "Colombia", SA),
    c("CR", "Costa Rica", NA),
    c("CU", "Cuba", NA),
    c("CV", "Cape Verde", AF),
    c("CY", "Cyprus", EU),
    c("CZ", "Czechia", EU),
    c("DE", "Germany", EU),
    c("DJ", "Djibouti", AF),
    c("DK", "Denmark", EU),
    c("DM", "Dominica", NA),
    c("DO", "Dominican Republic", NA),
    c("DZ", "Algeria", AF),
    c("EC", "Ecuador", SA),
    c("EE", "Estonia", EU),
    c("EG", "Egypt", AF),
    c("ER", "Eritrea", AF),
    c("ES", "Spain", EU),
    c("ET", "Ethiopia", AF),
    c("FI", "Finland", EU),
    c("FJ", "Fiji", OC),
    c("FM", "Micronesia", OC),
    c("FR", "France", EU),
    c("GA", "Gabon", AF),
    c("GB", "United Kingdom", EU),
    c("GD", "Grenada", NA),
    c("GE", "Georgia", AS),
    c("GH", "Ghana", AF),
    c("GL", "Greenland", NA),
    c("GM", "Gambia", AF),
    c("GN", "Guinea", AF),
    c("GQ", "Equatorial Guinea", AF),
    c("GR", "Greece", EU),
    c("GT", "Guatemala", NA),
    c("GU", "Guam", OC),
    c("GW", "Guinea-Bissau", AF),
    c("GY", "Guyana", SA),
    c("HK", "Hong Kong", AS),
    c("HN", "Honduras", NA),
    c("HR", "Croatia", EU),
    c("HT", "Haiti", NA),
    c("HU", "Hungary", EU),
    c("ID", "Indonesia", AS),
    c("IE", "Ireland", EU),
    c("IL", "Israel", AS),
    c("IN", "India", AS),
    c("IQ", "Iraq", AS),
    c("IR", "Iran", AS),
    c("IS", "Iceland", EU),
    c("IT", "Italy", EU),
    c("JM", "Jamaica", NA),
    c("JO", "Jordan", AS),
    c("JP", "Japan", AS),
    c("KE", "Kenya", AF),
    c("KG", "Kyrgyzstan", AS),
    c("KH", "Cambodia", AS),
    c("KI", "Kiribati", OC),
    c("KM", "Comoros", AF),
    c("KN", "Saint Kitts and Nevis", NA),
    c("KP", "North Korea", AS),
    c("KR", "South Korea", AS),
    c("KW", "Kuwait", AS),
    c("KZ", "Kazakhstan", AS),
    c("LA", "Laos", AS),
    c("LB", "Lebanon", AS),
    c("LC", "Saint Lucia", NA),
    c("LI", "Liechtenstein", EU),
    c("LK", "Sri Lanka", AS),
    c("LR", "Liberia", AF),
    c("LS", "Lesotho", AF),
    c("LT", "Lithuania", EU),
    c("LU", "Luxembourg", EU),
    c("LV", "Latvia", EU),
    c("LY", "Libya", AF),
    c("MA", "Morocco", AF),
    c("MC", "Monaco", EU),
    c("MD", "Moldova", EU),
    c("ME", "Montenegro", EU),
    c("MG", "Madagascar", AF),
    c("MH", "Marshall Islands", OC),
    c("MK", "North Macedonia", EU),
    c("ML", "Mali", AF),
    c("MM", "Myanmar", AS),
    c("MN", "Mongolia", AS),
    c("MO", "Macao", AS),
    c("MR", "Mauritania", AF),
    c("MT", "Malta", EU),
    c("MU", "Mauritius", AF),
    c("MV", "Maldives", AS),
    c("MW", "Malawi", AF),
    c("MX", "Mexico", NA),
    c("MY", "Malaysia", AS),
    c("MZ", "Mozambique", AF),
    c("NA", "Namibia", AF),
    c("NC", "New Caledonia", OC),
    c("NE", "Niger", AF),
    c("NG", "Nigeria", AF),
    c("NI", "Nicaragua", NA),
    c("NL", "Netherlands", EU),
    c("NO", "Norway", EU),
    c("NP", "Nepal", AS),
    c("NR", "Nauru", OC),
    c("NZ", "New Zealand", OC),
    c("OM", "Oman", AS),
    c("PA", "Panama", NA),
    c("PE", "Peru", SA),
    c("PF", "French Polynesia", OC),
    c("PG", "Papua New Guinea", OC),
    c("PH", "Philippines", AS),
    c("PK", "Pakistan", AS),
    c("PL", "Poland", EU),
    c("PR", "Puerto Rico", NA),
    c("PS", "Palestine", AS),
    c("PT", "Portugal", EU),
    c("PW", "Palau", OC),
    c("PY", "Paraguay", SA),
    c("QA", "Qatar", AS),
    c("RO", "Romania", EU),
    c("RS", "Serbia", EU),
    c("RU", "Russia", EU),
    c("RW", "Rwanda", AF),
    c("SA", "Saudi Arabia", AS),
    c("SB", "Solomon Islands", OC),
    c("SC", "Seychelles", AF),
    c("SD", "Sudan", AF),
    c("SE", "Sweden", EU),
    c("SG", "Singapore", AS),
    c("SI", "Slovenia", EU),
    c("SK", "Slovakia", EU),
    c("SL", "Sierra Leone", AF),
    c("SM", "San Marino", EU),
    c("SN", "Senegal", AF),
    c("SO", "Somalia", AF),
    c("SR", "Suriname", SA),
    c("SS", "South Sudan", AF),
    c("ST", "São Tomé and Príncipe", AF),
    c("SV", "El Salvador", NA),
    c("SY", "Syria", AS),
    c("SZ", "Eswatini", AF),
    c("TD", "Chad", AF),
    c("TG", "Togo", AF),
    c("TH", "Thailand", AS),
    c("TJ", "Tajikistan", AS),
    c("TL", "Timor-Leste", AS),
    c("TM", "Turkmenistan", AS),
    c("TN", "Tunisia", AF),
    c("TO", "Tonga", OC),
    c("TR", "Türkiye", EU),
    c("TT", "Trinidad and Tobago", NA),
    c("TV", "Tuvalu", OC),
    c("TW", "Taiwan", AS),
    c("TZ", "Tanzania", AF),
    c("UA", "Ukraine", EU),
    c("UG", "Uganda", AF),
    c("US", "United States", NA),
    c("UY", "Uruguay", SA),
    c("UZ", "Uzbekistan", AS),
    c("VA", "Vatican City", EU),
    c("VC", "Saint Vincent and the Grenadines", NA),
    c("VE", "Venezuela", SA),
    c("VN", "Vietnam", AS),
    c("VU", "Vanuatu", OC),
    c("WS", "Samoa", OC),
    c("XK", "Kosovo", EU),
    c("YE", "Yemen", AS),
    c("ZA", "South Africa", AF),
    c("ZM", "Zambia", AF),
    c("ZW", "Zimbabwe", AF),
];

/// Looks up a country by alpha-2 code (case-insensitive).
pub fn country(code: &str) -> Option<&'static CountryInfo> {
    let code = code.trim().to_ascii_uppercase();
    COUNTRIES
        .binary_search_by(|entry| entry.code.cmp(code.as_str()))
        .ok()
        .map(|idx| &COUNTRIES[idx])
}

pub fn continent_of(code: &str) -> Option<Continent> {
    country(code).map(|c| c.continent)
}

/// Display name for a country code, falling back to the code itself.
pub fn country_name(code: &str) -> String {
    country(code)
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Flag emoji built from regional indicator symbols; empty for non alpha-2 codes.
pub fn flag_emoji(code: &str) -> String {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return String::new();
    }
    code.chars()
        .filter_map(|ch| {
            let offset = ch.to_ascii_uppercase() as u32 - 'A' as u32;
            char::from_u32(0x1F1E6 + offset)
        })
        .collect()
}
