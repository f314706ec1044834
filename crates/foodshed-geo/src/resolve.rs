//! Free-text location resolution against the static postal/city table.

use foodshed_core::datasets::PostalTable;
use foodshed_core::types::{Coordinates, LocationKind, ResolvedLocation};
use regex::Regex;
use serde::Serialize;

use crate::distance::distance_km;

/// Halifax, the designated fallback when no location input is supplied.
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    latitude: 44.6488,
    longitude: -63.5752,
};

const DEFAULT_REVERSE_LOOKUP_KM: f64 = 50.0;

/// Nearest-city result from reverse lookup.
#[derive(Debug, Clone, Serialize)]
pub struct NearestCity {
    pub city: String,
    pub region: String,
    pub distance_km: f64,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationSuggestion {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationSuggestions {
    pub cities: Vec<LocationSuggestion>,
    pub postal_codes: Vec<LocationSuggestion>,
}

/// Resolves user location text to coordinates using the postal/city table.
pub struct Geolocator {
    table: PostalTable,
    full_postal: Regex,
    partial_postal: Regex,
}

impl Geolocator {
    #[must_use]
    pub fn new(table: PostalTable) -> Self {
        Self {
            table,
            full_postal: Regex::new(r"(?i)^[A-Z]\d[A-Z]\s?\d[A-Z]\d$")
                .expect("valid postal code regex"),
            partial_postal: Regex::new(r"(?i)^[A-Z]\d[A-Z]$").expect("valid partial postal regex"),
        }
    }

    /// Resolve free-text input to coordinates.
    ///
    /// Postal-code shaped input (full or partial) is looked up by its FSA —
    /// the first three characters. Anything else is tried as a
    /// case-insensitive city name. Returns `None` when nothing matches;
    /// callers degrade to [`DEFAULT_COORDINATES`], this is not an error.
    #[must_use]
    pub fn resolve(&self, input: &str) -> Option<ResolvedLocation> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if self.full_postal.is_match(input) || self.partial_postal.is_match(input) {
            let cleaned: String = input
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase();
            let fsa = &cleaned[..3];
            if let Some(entry) = self.table.postal_codes.get(fsa) {
                return Some(ResolvedLocation {
                    coordinates: Coordinates {
                        latitude: entry.latitude,
                        longitude: entry.longitude,
                    },
                    kind: LocationKind::PostalCode,
                    region: Some(entry.region.clone()),
                    original_input: Some(input.to_string()),
                });
            }
        }

        let city_key = input.to_lowercase();
        self.table.cities.get(&city_key).map(|entry| ResolvedLocation {
            coordinates: Coordinates {
                latitude: entry.latitude,
                longitude: entry.longitude,
            },
            kind: LocationKind::City,
            region: entry.region.clone(),
            original_input: Some(input.to_string()),
        })
    }

    /// The fallback location used when no input is supplied.
    #[must_use]
    pub fn default_location() -> ResolvedLocation {
        ResolvedLocation {
            coordinates: DEFAULT_COORDINATES,
            kind: LocationKind::Default,
            region: None,
            original_input: None,
        }
    }

    /// Reverse lookup: the nearest city-table entry within
    /// `max_distance_km` (default 50), falling back to the postal-region
    /// table when no city qualifies.
    ///
    /// Ties are deterministic: smaller distance wins, exact ties go to the
    /// lexically smaller name.
    #[must_use]
    pub fn city_from_coordinates(
        &self,
        coordinates: Coordinates,
        max_distance_km: Option<f64>,
    ) -> Option<NearestCity> {
        let max_km = max_distance_km.unwrap_or(DEFAULT_REVERSE_LOOKUP_KM);

        let from_cities = self
            .table
            .cities
            .iter()
            .filter_map(|(name, entry)| {
                let entry_coords = Coordinates {
                    latitude: entry.latitude,
                    longitude: entry.longitude,
                };
                let distance = distance_km(coordinates, entry_coords);
                (distance <= max_km).then(|| NearestCity {
                    city: display_case(name),
                    region: entry
                        .region
                        .clone()
                        .unwrap_or_else(|| "Nova Scotia".to_string()),
                    distance_km: distance,
                    coordinates: entry_coords,
                })
            })
            .min_by(|a, b| {
                a.distance_km
                    .total_cmp(&b.distance_km)
                    .then_with(|| a.city.cmp(&b.city))
            });

        if from_cities.is_some() {
            return from_cities;
        }

        self.table
            .postal_codes
            .iter()
            .filter_map(|(_, entry)| {
                let entry_coords = Coordinates {
                    latitude: entry.latitude,
                    longitude: entry.longitude,
                };
                let distance = distance_km(coordinates, entry_coords);
                (distance <= max_km).then(|| NearestCity {
                    city: entry.region.clone(),
                    region: entry.region.clone(),
                    distance_km: distance,
                    coordinates: entry_coords,
                })
            })
            .min_by(|a, b| {
                a.distance_km
                    .total_cmp(&b.distance_km)
                    .then_with(|| a.city.cmp(&b.city))
            })
    }

    /// Autocomplete suggestions: every known city and postal prefix.
    #[must_use]
    pub fn suggestions(&self) -> LocationSuggestions {
        let cities = self
            .table
            .cities
            .keys()
            .map(|name| LocationSuggestion {
                name: display_case(name),
                kind: LocationKind::City,
                value: name.clone(),
            })
            .collect();

        let postal_codes = self
            .table
            .postal_codes
            .keys()
            .map(|code| LocationSuggestion {
                name: code.clone(),
                kind: LocationKind::PostalCode,
                value: code.clone(),
            })
            .collect();

        LocationSuggestions {
            cities,
            postal_codes,
        }
    }
}

/// Uppercase the first character of a lowercase table key for display.
fn display_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
