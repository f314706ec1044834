use foodshed_core::types::InventoryItem;
use serde::{Deserialize, Serialize};

/// A product as returned by the catalog API, mapped to our schema.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogProduct {
    pub barcode: Option<String>,
    pub name: String,
    pub brand: String,
    /// Best available image, front image preferred over the general one.
    pub image: Option<String>,
    pub allergens: Vec<String>,
    pub categories: Vec<String>,
    pub labels: Vec<String>,
    pub nutritional_info: serde_json::Value,
}

/// Where an item's catalog payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    CatalogSearch,
    StaticMapping,
}

/// Catalog metadata attached to an enriched inventory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    pub source: CatalogSource,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub nutritional_info: serde_json::Value,
}

impl CatalogData {
    #[must_use]
    pub fn static_mapping() -> Self {
        Self {
            source: CatalogSource::StaticMapping,
            allergens: Vec::new(),
            categories: Vec::new(),
            labels: Vec::new(),
            nutritional_info: serde_json::Value::Null,
        }
    }
}

/// An inventory item plus optional catalog metadata. Derived per request,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: InventoryItem,
    #[serde(
        rename = "openFoodFactsData",
        skip_serializing_if = "Option::is_none"
    )]
    pub catalog: Option<CatalogData>,
}

impl EnrichedItem {
    /// An item with no catalog data attached — the fallback when every
    /// enrichment tier comes up empty or fails.
    #[must_use]
    pub fn basic(item: InventoryItem) -> Self {
        Self {
            item,
            catalog: None,
        }
    }
}
