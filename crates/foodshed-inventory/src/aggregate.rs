//! Presentation-level rollups derived from raw inventory.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use serde::Serialize;

use foodshed_core::types::{Category, InventoryItem};

const LOW_STOCK_THRESHOLD: u32 = 10;
const EXPIRING_SOON_DAYS: i64 = 30;

/// Stock level bucket, a pure function of total quantity. Recomputed on
/// every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityTier {
    Empty,
    Low,
    Moderate,
    High,
}

impl AvailabilityTier {
    #[must_use]
    pub fn from_total(total: u32) -> Self {
        match total {
            0 => AvailabilityTier::Empty,
            1..=49 => AvailabilityTier::Low,
            50..=199 => AvailabilityTier::Moderate,
            _ => AvailabilityTier::High,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AvailabilityTier::Empty => "empty",
            AvailabilityTier::Low => "low",
            AvailabilityTier::Moderate => "moderate",
            AvailabilityTier::High => "high",
        }
    }

    /// Human-readable status line shown alongside the tier.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            AvailabilityTier::Empty => "No items currently available",
            AvailabilityTier::Low => "Limited items available",
            AvailabilityTier::Moderate => "Good selection available",
            AvailabilityTier::High => "Wide selection available",
        }
    }
}

/// A line item flagged for low stock in a summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub name: String,
    pub quantity: u32,
    pub category: Category,
}

/// Per-site inventory rollup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_items: usize,
    pub total_quantity: u32,
    /// Quantity per category, only categories actually stocked.
    pub categories: BTreeMap<Category, u32>,
    /// True when any item expires within the next 30 days.
    pub has_expiring_soon: bool,
    /// Items with fewer than 10 units left.
    pub low_stock_items: Vec<LowStockItem>,
}

/// Builds the summary in a single pass over the items.
#[must_use]
pub fn summarize(items: &[InventoryItem]) -> InventorySummary {
    let cutoff = Utc::now().date_naive() + Duration::days(EXPIRING_SOON_DAYS);

    let mut summary = InventorySummary {
        total_items: items.len(),
        total_quantity: 0,
        categories: BTreeMap::new(),
        has_expiring_soon: false,
        low_stock_items: Vec::new(),
    };

    for item in items {
        summary.total_quantity += item.quantity;
        *summary.categories.entry(item.category).or_insert(0) += item.quantity;

        if item.expiry_date.is_some_and(|d| d <= cutoff) {
            summary.has_expiring_soon = true;
        }

        if item.quantity < LOW_STOCK_THRESHOLD {
            summary.low_stock_items.push(LowStockItem {
                name: item.name.clone(),
                quantity: item.quantity,
                category: item.category,
            });
        }
    }

    summary
}

/// Display tags for a site, derived from its inventory.
///
/// Always opens with "Emergency Food"; category tags come next in enum
/// order, then allergen-coverage tags, then a halal marker for large
/// Halifax sites. Capped at 8 tags.
#[must_use]
pub fn site_tags(city: Option<&str>, items: &[InventoryItem]) -> Vec<String> {
    let mut tags = vec!["Emergency Food".to_string()];

    let mut categories: Vec<Category> = items.iter().map(|item| item.category).collect();
    categories.sort_unstable();
    categories.dedup();
    for category in categories {
        let tag = match category {
            Category::FreshProduce => "Fresh Produce",
            Category::CannedGoods => "Canned Goods",
            Category::Dairy => "Dairy Products",
            Category::Meat => "Meat & Protein",
            Category::Grains => "Grains & Bread",
            Category::Frozen => "Frozen Items",
            Category::Pantry => continue,
        };
        tags.push(tag.to_string());
    }

    let push_unique = |tags: &mut Vec<String>, tag: &str| {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    };
    for item in items {
        if item.allergens.is_empty() {
            push_unique(&mut tags, "Allergen-Free Options");
        } else {
            if !item.allergens.iter().any(|a| a == "gluten") {
                push_unique(&mut tags, "Gluten-Free");
            }
            if !item.allergens.iter().any(|a| a == "dairy") {
                push_unique(&mut tags, "Dairy-Free");
            }
            if !item.allergens.iter().any(|a| a == "nuts") {
                push_unique(&mut tags, "Nut-Free");
            }
        }
    }

    if city == Some("Halifax") && items.len() > 50 {
        tags.push("Halal Options".to_string());
    }

    tags.truncate(8);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(category: Category, quantity: u32, allergens: &[&str]) -> InventoryItem {
        InventoryItem {
            id: "x".to_string(),
            site_id: "site-1".to_string(),
            name: "thing".to_string(),
            brand: None,
            category,
            quantity,
            allergens: allergens.iter().map(ToString::to_string).collect(),
            dietary_tags: Vec::new(),
            barcode: None,
            image: None,
            expiry_date: None,
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(AvailabilityTier::from_total(0), AvailabilityTier::Empty);
        assert_eq!(AvailabilityTier::from_total(1), AvailabilityTier::Low);
        assert_eq!(AvailabilityTier::from_total(49), AvailabilityTier::Low);
        assert_eq!(AvailabilityTier::from_total(50), AvailabilityTier::Moderate);
        assert_eq!(AvailabilityTier::from_total(199), AvailabilityTier::Moderate);
        assert_eq!(AvailabilityTier::from_total(200), AvailabilityTier::High);
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_string(&AvailabilityTier::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
    }

    #[test]
    fn summary_counts_categories_and_low_stock() {
        let items = vec![
            item(Category::CannedGoods, 30, &[]),
            item(Category::CannedGoods, 5, &[]),
            item(Category::Dairy, 80, &["dairy"]),
        ];
        let summary = summarize(&items);
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.total_quantity, 115);
        assert_eq!(summary.categories.get(&Category::CannedGoods), Some(&35));
        assert_eq!(summary.low_stock_items.len(), 1);
        assert!(!summary.has_expiring_soon);
    }

    #[test]
    fn summary_flags_near_expiry() {
        let mut soon = item(Category::FreshProduce, 20, &[]);
        soon.expiry_date = Some(Utc::now().date_naive() + Duration::days(5));
        let summary = summarize(&[soon]);
        assert!(summary.has_expiring_soon);

        let mut far = item(Category::FreshProduce, 20, &[]);
        far.expiry_date = Some(NaiveDate::from_ymd_opt(2099, 1, 1).unwrap());
        let summary = summarize(&[far]);
        assert!(!summary.has_expiring_soon);
    }

    #[test]
    fn tags_start_with_emergency_food() {
        let tags = site_tags(None, &[]);
        assert_eq!(tags, vec!["Emergency Food"]);
    }

    #[test]
    fn tags_reflect_categories_and_allergen_coverage() {
        let items = vec![
            item(Category::FreshProduce, 10, &[]),
            item(Category::Dairy, 10, &["dairy"]),
        ];
        let tags = site_tags(Some("Sydney"), &items);
        assert_eq!(tags[0], "Emergency Food");
        assert!(tags.contains(&"Fresh Produce".to_string()));
        assert!(tags.contains(&"Dairy Products".to_string()));
        assert!(tags.contains(&"Allergen-Free Options".to_string()));
        assert!(tags.contains(&"Gluten-Free".to_string()));
        assert!(!tags.contains(&"Dairy-Free".to_string()));
    }

    #[test]
    fn large_halifax_sites_get_halal_tag() {
        let items: Vec<InventoryItem> =
            (0..60).map(|_| item(Category::Pantry, 1, &["x"])).collect();
        let tags = site_tags(Some("Halifax"), &items);
        assert!(tags.contains(&"Halal Options".to_string()));
        assert!(tags.len() <= 8);
    }
}
