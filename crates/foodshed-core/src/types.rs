//! Domain records shared across the workspace.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Opening hours: either one free-text string or a per-weekday mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hours {
    Simple(String),
    Weekly(BTreeMap<String, String>),
}

/// A food-distribution site from the static directory.
///
/// A site without coordinates is a valid record; it is simply skipped by
/// every proximity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub hours: Hours,
    /// Free-text accommodation labels, e.g. "halal" or
    /// "gluten-free-accommodation".
    #[serde(default)]
    pub accommodations: Vec<String>,
}

/// Closed set of inventory categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    FreshProduce,
    CannedGoods,
    Dairy,
    Meat,
    Grains,
    Frozen,
    Pantry,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::FreshProduce => "fresh-produce",
            Category::CannedGoods => "canned-goods",
            Category::Dairy => "dairy",
            Category::Meat => "meat",
            Category::Grains => "grains",
            Category::Frozen => "frozen",
            Category::Pantry => "pantry",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fresh-produce" => Ok(Category::FreshProduce),
            "canned-goods" => Ok(Category::CannedGoods),
            "dairy" => Ok(Category::Dairy),
            "meat" => Ok(Category::Meat),
            "grains" => Ok(Category::Grains),
            "frozen" => Ok(Category::Frozen),
            "pantry" => Ok(Category::Pantry),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// One line item in a site's inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub site_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub category: Category,
    pub quantity: u32,
    /// Allergens present in the item, deduplicated free text.
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

/// How a free-text location input was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    PostalCode,
    City,
    /// No input (or empty input) was supplied; the fallback city was used.
    Default,
}

/// A location query resolved to coordinates. Transient, one per request.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub kind: LocationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_input: Option<String>,
}

/// Allergen accommodation vocabulary accepted by the search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllergenFilter {
    DairyFree,
    GlutenFree,
    NutFree,
    ShellfishFree,
    EggFree,
    SoyFree,
    SesameFree,
}

impl AllergenFilter {
    pub const ALL: [AllergenFilter; 7] = [
        AllergenFilter::DairyFree,
        AllergenFilter::GlutenFree,
        AllergenFilter::NutFree,
        AllergenFilter::ShellfishFree,
        AllergenFilter::EggFree,
        AllergenFilter::SoyFree,
        AllergenFilter::SesameFree,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AllergenFilter::DairyFree => "dairy-free",
            AllergenFilter::GlutenFree => "gluten-free",
            AllergenFilter::NutFree => "nut-free",
            AllergenFilter::ShellfishFree => "shellfish-free",
            AllergenFilter::EggFree => "egg-free",
            AllergenFilter::SoyFree => "soy-free",
            AllergenFilter::SesameFree => "sesame-free",
        }
    }

    /// The allergen name with its `-free` suffix stripped, used by the
    /// accommodation-matching predicate.
    #[must_use]
    pub fn allergen_name(self) -> &'static str {
        match self {
            AllergenFilter::DairyFree => "dairy",
            AllergenFilter::GlutenFree => "gluten",
            AllergenFilter::NutFree => "nut",
            AllergenFilter::ShellfishFree => "shellfish",
            AllergenFilter::EggFree => "egg",
            AllergenFilter::SoyFree => "soy",
            AllergenFilter::SesameFree => "sesame",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == s)
    }
}

impl std::fmt::Display for AllergenFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cultural/dietary accommodation vocabulary accepted by the search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CulturalFilter {
    Halal,
    Kosher,
    Vegan,
    Vegetarian,
    Indigenous,
    Organic,
    LowSodium,
    DiabeticFriendly,
}

impl CulturalFilter {
    pub const ALL: [CulturalFilter; 8] = [
        CulturalFilter::Halal,
        CulturalFilter::Kosher,
        CulturalFilter::Vegan,
        CulturalFilter::Vegetarian,
        CulturalFilter::Indigenous,
        CulturalFilter::Organic,
        CulturalFilter::LowSodium,
        CulturalFilter::DiabeticFriendly,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CulturalFilter::Halal => "halal",
            CulturalFilter::Kosher => "kosher",
            CulturalFilter::Vegan => "vegan",
            CulturalFilter::Vegetarian => "vegetarian",
            CulturalFilter::Indigenous => "indigenous",
            CulturalFilter::Organic => "organic",
            CulturalFilter::LowSodium => "low-sodium",
            CulturalFilter::DiabeticFriendly => "diabetic-friendly",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == s)
    }
}

impl std::fmt::Display for CulturalFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated search parameters. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct SearchCriteria {
    pub radius_km: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergens: Option<Vec<AllergenFilter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural: Option<Vec<CulturalFilter>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_serde() {
        let json = serde_json::to_string(&Category::FreshProduce).unwrap();
        assert_eq!(json, "\"fresh-produce\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::FreshProduce);
    }

    #[test]
    fn hours_deserializes_both_shapes() {
        let simple: Hours = serde_json::from_str("\"Mon-Fri 9-5\"").unwrap();
        assert_eq!(simple, Hours::Simple("Mon-Fri 9-5".to_string()));

        let weekly: Hours = serde_json::from_str(r#"{"monday": "9-5"}"#).unwrap();
        match weekly {
            Hours::Weekly(map) => assert_eq!(map.get("monday").map(String::as_str), Some("9-5")),
            Hours::Simple(_) => panic!("expected weekly hours"),
        }
    }

    #[test]
    fn allergen_filter_parse_and_strip() {
        let f = AllergenFilter::parse("dairy-free").unwrap();
        assert_eq!(f.allergen_name(), "dairy");
        assert!(AllergenFilter::parse("made-up-tag").is_none());
    }

    #[test]
    fn cultural_filter_vocabulary_is_complete() {
        assert_eq!(CulturalFilter::ALL.len(), 8);
        for f in CulturalFilter::ALL {
            assert_eq!(CulturalFilter::parse(f.as_str()), Some(f));
        }
    }

    #[test]
    fn site_without_coordinates_deserializes() {
        let yaml = r"
id: test-1
name: Test Pantry
address: 1 Main St
hours: 'Mon 9-5'
";
        let site: Site = serde_yaml::from_str(yaml).unwrap();
        assert!(site.coordinates.is_none());
        assert!(site.accommodations.is_empty());
    }
}
