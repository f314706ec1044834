//! Static dataset loading.
//!
//! The site directory, the inventory table and the postal-code/city table
//! are YAML files read once at process start. Each loader parses and then
//! validates; a malformed file is a startup failure, never a request-time
//! error.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{InventoryItem, Site};

#[derive(Debug, Deserialize)]
pub struct SitesFile {
    pub food_banks: Vec<Site>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryFile {
    pub items: Vec<InventoryItem>,
}

/// One forward-sortation-area entry in the postal table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalEntry {
    pub latitude: f64,
    pub longitude: f64,
    pub region: String,
}

/// One city entry in the postal table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityEntry {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub postal_codes: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// The combined postal-prefix and city lookup table.
///
/// Keys are 3-character FSAs (uppercase) and lowercase city names. Both maps
/// are ordered so iteration — and therefore reverse-lookup scanning — is
/// deterministic.
#[derive(Debug, Clone, Deserialize)]
pub struct PostalTable {
    pub postal_codes: BTreeMap<String, PostalEntry>,
    pub cities: BTreeMap<String, CityEntry>,
}

/// Load and validate the food-bank directory.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read, parsed, or contains
/// duplicate/empty site ids or out-of-range coordinates.
pub fn load_sites(path: &Path) -> Result<SitesFile, ConfigError> {
    let file: SitesFile = read_yaml(path)?;
    validate_sites(&file)?;
    Ok(file)
}

/// Load and validate the inventory table.
///
/// Allergen lists are deduplicated in place after parsing.
///
/// # Errors
///
/// Returns [`ConfigError`] on read/parse failure, duplicate item ids, or an
/// item with an empty owning-site id.
pub fn load_inventory(path: &Path) -> Result<InventoryFile, ConfigError> {
    let mut file: InventoryFile = read_yaml(path)?;
    validate_inventory(&file)?;
    for item in &mut file.items {
        dedupe_in_place(&mut item.allergens);
        dedupe_in_place(&mut item.dietary_tags);
    }
    Ok(file)
}

/// Load and validate the postal-code/city table.
///
/// # Errors
///
/// Returns [`ConfigError`] on read/parse failure, a malformed FSA key, or a
/// city key that is not lowercase.
pub fn load_postal_table(path: &Path) -> Result<PostalTable, ConfigError> {
    let table: PostalTable = read_yaml(path)?;
    validate_postal_table(&table)?;
    Ok(table)
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DatasetIo {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::DatasetParse {
        path: path.display().to_string(),
        source: e,
    })
}

fn validate_sites(file: &SitesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for site in &file.food_banks {
        if site.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "site '{}' has an empty id",
                site.name
            )));
        }
        if !seen.insert(site.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site id: '{}'",
                site.id
            )));
        }
        if let Some(coords) = &site.coordinates {
            if !(-90.0..=90.0).contains(&coords.latitude)
                || !(-180.0..=180.0).contains(&coords.longitude)
            {
                return Err(ConfigError::Validation(format!(
                    "site '{}' has out-of-range coordinates",
                    site.id
                )));
            }
        }
    }
    Ok(())
}

fn validate_inventory(file: &InventoryFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for item in &file.items {
        if !seen.insert(item.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate inventory item id: '{}'",
                item.id
            )));
        }
        if item.site_id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "inventory item '{}' has an empty site id",
                item.id
            )));
        }
    }
    Ok(())
}

fn validate_postal_table(table: &PostalTable) -> Result<(), ConfigError> {
    for fsa in table.postal_codes.keys() {
        if !is_valid_fsa(fsa) {
            return Err(ConfigError::Validation(format!(
                "malformed FSA key: '{fsa}' (expected letter-digit-letter)"
            )));
        }
    }
    for city in table.cities.keys() {
        if city.trim().is_empty() || city.chars().any(char::is_uppercase) {
            return Err(ConfigError::Validation(format!(
                "city key must be non-empty lowercase: '{city}'"
            )));
        }
    }
    Ok(())
}

fn is_valid_fsa(key: &str) -> bool {
    let chars: Vec<char> = key.chars().collect();
    chars.len() == 3
        && chars[0].is_ascii_uppercase()
        && chars[1].is_ascii_digit()
        && chars[2].is_ascii_uppercase()
}

fn dedupe_in_place(values: &mut Vec<String>) {
    let mut seen = HashSet::new();
    values.retain(|v| seen.insert(v.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        f.write_all(content.as_bytes()).expect("write temp file");
        f
    }

    #[test]
    fn load_sites_accepts_valid_file() {
        let f = write_temp(
            r"
food_banks:
  - id: fb-1
    name: Test Pantry
    address: 1 Main St
    coordinates: { latitude: 44.6, longitude: -63.5 }
    hours: 'Mon 9-5'
    accommodations: [halal]
  - id: fb-2
    name: No Coords Pantry
    address: 2 Main St
    hours:
      monday: '9-5'
",
        );
        let sites = load_sites(f.path()).unwrap();
        assert_eq!(sites.food_banks.len(), 2);
        assert!(sites.food_banks[1].coordinates.is_none());
    }

    #[test]
    fn load_sites_rejects_duplicate_ids() {
        let f = write_temp(
            r"
food_banks:
  - { id: fb-1, name: A, address: x, hours: 'Mon' }
  - { id: fb-1, name: B, address: y, hours: 'Tue' }
",
        );
        let err = load_sites(f.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate site id"));
    }

    #[test]
    fn load_sites_rejects_out_of_range_coordinates() {
        let f = write_temp(
            r"
food_banks:
  - id: fb-1
    name: A
    address: x
    coordinates: { latitude: 95.0, longitude: -63.5 }
    hours: 'Mon'
",
        );
        let err = load_sites(f.path()).unwrap_err();
        assert!(err.to_string().contains("out-of-range"));
    }

    #[test]
    fn load_inventory_dedupes_allergens() {
        let f = write_temp(
            r"
items:
  - id: inv-1
    siteId: fb-1
    name: Peanut Butter
    category: pantry
    quantity: 12
    allergens: [nuts, nuts, peanuts]
",
        );
        let inv = load_inventory(f.path()).unwrap();
        assert_eq!(inv.items[0].allergens, vec!["nuts", "peanuts"]);
    }

    #[test]
    fn load_postal_table_rejects_bad_fsa() {
        let f = write_temp(
            r"
postal_codes:
  '3BK': { latitude: 44.6, longitude: -63.5, region: Halifax }
cities: {}
",
        );
        let err = load_postal_table(f.path()).unwrap_err();
        assert!(err.to_string().contains("malformed FSA"));
    }

    #[test]
    fn load_postal_table_rejects_uppercase_city_key() {
        let f = write_temp(
            r"
postal_codes: {}
cities:
  Halifax: { latitude: 44.6, longitude: -63.5 }
",
        );
        let err = load_postal_table(f.path()).unwrap_err();
        assert!(err.to_string().contains("lowercase"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_sites(Path::new("/nonexistent/sites.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::DatasetIo { .. }));
    }
}
