use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use foodshed_core::types::{Category, InventoryItem};

use crate::aggregate::{summarize, InventorySummary};

/// Filters applied when reading a site's inventory.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilters {
    /// Allergen-free requirements, e.g. `dairy-free`. An item passes when
    /// the stripped allergen name is absent from its allergen list.
    pub allergens: Vec<String>,
    pub category: Option<Category>,
}

/// Owned in-memory inventory, shared across request handlers via `Arc`.
///
/// Reads take a shared lock and clone out what they need; writes go through
/// the exclusive lock. Critical sections never await.
pub struct InventoryStore {
    items: RwLock<Vec<InventoryItem>>,
}

impl InventoryStore {
    #[must_use]
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// All items belonging to one site, in load order.
    #[must_use]
    pub fn items_for(&self, site_id: &str) -> Vec<InventoryItem> {
        self.read()
            .iter()
            .filter(|item| item.site_id == site_id)
            .cloned()
            .collect()
    }

    /// Items for one site with [`InventoryFilters`] applied.
    #[must_use]
    pub fn filtered_items_for(&self, site_id: &str, filters: &InventoryFilters) -> Vec<InventoryItem> {
        self.read()
            .iter()
            .filter(|item| item.site_id == site_id)
            .filter(|item| filters.category.map_or(true, |c| item.category == c))
            .filter(|item| {
                filters.allergens.iter().all(|label| {
                    let allergen = label.strip_suffix("-free").unwrap_or(label);
                    !item.allergens.iter().any(|a| a == allergen)
                })
            })
            .cloned()
            .collect()
    }

    /// Number of distinct line items for a site.
    #[must_use]
    pub fn count(&self, site_id: &str) -> usize {
        self.read()
            .iter()
            .filter(|item| item.site_id == site_id)
            .count()
    }

    /// Sum of quantities across a site's items.
    #[must_use]
    pub fn total_quantity(&self, site_id: &str) -> u32 {
        self.read()
            .iter()
            .filter(|item| item.site_id == site_id)
            .map(|item| item.quantity)
            .sum()
    }

    /// Full rollup for one site: totals, category breakdown, expiry and
    /// low-stock flags.
    #[must_use]
    pub fn summary(&self, site_id: &str) -> InventorySummary {
        let items = self.items_for(site_id);
        summarize(&items)
    }

    /// Line-item counts for many sites in one pass over the store.
    #[must_use]
    pub fn counts_for(&self, site_ids: &[String]) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> =
            site_ids.iter().map(|id| (id.clone(), 0)).collect();
        for item in self.read().iter() {
            if let Some(count) = counts.get_mut(&item.site_id) {
                *count += 1;
            }
        }
        counts
    }

    /// Distinct categories stocked at a site, in enum order.
    #[must_use]
    pub fn categories_for(&self, site_id: &str) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .read()
            .iter()
            .filter(|item| item.site_id == site_id)
            .map(|item| item.category)
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Distinct allergens present anywhere in a site's stock, sorted.
    #[must_use]
    pub fn allergen_options_for(&self, site_id: &str) -> Vec<String> {
        let mut allergens: Vec<String> = self
            .read()
            .iter()
            .filter(|item| item.site_id == site_id)
            .flat_map(|item| item.allergens.iter().cloned())
            .collect();
        allergens.sort_unstable();
        allergens.dedup();
        allergens
    }

    /// Appends a new item, forcing its `site_id` to the given site.
    pub fn add_item(&self, site_id: &str, mut item: InventoryItem) -> InventoryItem {
        item.site_id = site_id.to_string();
        self.write().push(item.clone());
        item
    }

    /// Sets the quantity of one item. Returns the updated item, or `None`
    /// when no item matches the site/item pair.
    pub fn set_quantity(
        &self,
        site_id: &str,
        item_id: &str,
        quantity: u32,
    ) -> Option<InventoryItem> {
        let mut items = self.write();
        let item = items
            .iter_mut()
            .find(|item| item.site_id == site_id && item.id == item_id)?;
        item.quantity = quantity;
        Some(item.clone())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<InventoryItem>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<InventoryItem>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, site: &str, category: Category, quantity: u32, allergens: &[&str]) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            site_id: site.to_string(),
            name: format!("item {id}"),
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

    fn store() -> InventoryStore {
        InventoryStore::new(vec![
            item("a", "site-1", Category::CannedGoods, 30, &["gluten"]),
            item("b", "site-1", Category::Dairy, 5, &["dairy"]),
            item("c", "site-1", Category::CannedGoods, 100, &[]),
            item("d", "site-2", Category::FreshProduce, 12, &[]),
        ])
    }

    #[test]
    fn counts_and_quantities_per_site() {
        let store = store();
        assert_eq!(store.count("site-1"), 3);
        assert_eq!(store.total_quantity("site-1"), 135);
        assert_eq!(store.count("site-3"), 0);
        assert_eq!(store.total_quantity("site-3"), 0);
    }

    #[test]
    fn counts_for_many_sites_in_one_pass() {
        let store = store();
        let counts = store.counts_for(&["site-1".to_string(), "site-3".to_string()]);
        assert_eq!(counts.get("site-1"), Some(&3));
        assert_eq!(counts.get("site-3"), Some(&0));
        assert!(!counts.contains_key("site-2"));
    }

    #[test]
    fn categories_deduped_and_ordered() {
        let store = store();
        assert_eq!(
            store.categories_for("site-1"),
            vec![Category::CannedGoods, Category::Dairy]
        );
    }

    #[test]
    fn allergen_options_sorted_unique() {
        let store = store();
        assert_eq!(store.allergen_options_for("site-1"), vec!["dairy", "gluten"]);
    }

    #[test]
    fn allergen_filter_excludes_items_containing_the_allergen() {
        let store = store();
        let filters = InventoryFilters {
            allergens: vec!["dairy-free".to_string()],
            category: None,
        };
        let items = store.filtered_items_for("site-1", &filters);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn category_filter_narrows_results() {
        let store = store();
        let filters = InventoryFilters {
            allergens: Vec::new(),
            category: Some(Category::Dairy),
        };
        let items = store.filtered_items_for("site-1", &filters);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "b");
    }

    #[test]
    fn add_item_pins_site_id() {
        let store = store();
        let added = store.add_item("site-2", item("e", "elsewhere", Category::Pantry, 7, &[]));
        assert_eq!(added.site_id, "site-2");
        assert_eq!(store.count("site-2"), 2);
    }

    #[test]
    fn set_quantity_updates_matching_item() {
        let store = store();
        let updated = store.set_quantity("site-1", "b", 42);
        assert_eq!(updated.map(|i| i.quantity), Some(42));
        assert_eq!(store.total_quantity("site-1"), 172);
    }

    #[test]
    fn set_quantity_misses_wrong_site() {
        let store = store();
        assert!(store.set_quantity("site-2", "b", 42).is_none());
    }
}
