//! Item enrichment: catalog lookups, caching and fallbacks.
//!
//! The enricher never fails a request. A catalog error is logged and
//! treated as an empty result, after which the static image mapping still
//! gets its chance before the item falls through unchanged.

use std::sync::Arc;

use dashmap::DashMap;
use futures::StreamExt;

use foodshed_core::types::InventoryItem;

use crate::client::CatalogClient;
use crate::static_images::static_product_image;
use crate::types::{CatalogData, CatalogProduct, CatalogSource, EnrichedItem};

/// Catalog labels that translate into dietary tags on the item.
const LABEL_TAGS: &[(&str, &str)] = &[
    ("en:vegetarian", "Vegetarian"),
    ("en:vegan", "Vegan"),
    ("en:gluten-free", "Gluten-Free"),
    ("en:organic", "Organic"),
    ("en:fair-trade", "Fair Trade"),
    ("en:kosher", "Kosher"),
    ("en:halal", "Halal"),
];

/// Enriches inventory items with catalog metadata.
///
/// Results are cached per item identity for the lifetime of the process;
/// [`Enricher::reset`] clears the cache. Batch enrichment runs lookups with
/// bounded parallelism and preserves input order.
pub struct Enricher {
    client: Arc<dyn CatalogClient>,
    cache: DashMap<String, EnrichedItem>,
    concurrency: usize,
}

impl Enricher {
    #[must_use]
    pub fn new(client: Arc<dyn CatalogClient>, concurrency: usize) -> Self {
        Self {
            client,
            cache: DashMap::new(),
            concurrency: concurrency.max(1),
        }
    }

    /// Enriches a single item. Infallible: any catalog failure degrades to
    /// the next fallback tier, and the worst case is the item unchanged.
    pub async fn enhance(&self, item: InventoryItem) -> EnrichedItem {
        let key = cache_key(&item);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(item = %item.name, "enrichment cache hit");
            return hit.clone();
        }

        let enriched = self.enhance_uncached(item).await;
        self.cache.insert(key, enriched.clone());
        enriched
    }

    /// Enriches a batch, preserving order, with at most `concurrency`
    /// catalog lookups in flight.
    pub async fn enhance_batch(&self, items: Vec<InventoryItem>) -> Vec<EnrichedItem> {
        futures::stream::iter(items)
            .map(|item| self.enhance(item))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Drops every cached result.
    pub fn reset(&self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    async fn enhance_uncached(&self, item: InventoryItem) -> EnrichedItem {
        let products = self.search(&item).await;

        match products.into_iter().next() {
            Some(product) if product.image.is_some() => {
                self.merge_catalog(item, product).await
            }
            _ => {
                // Static image tier: known staples with no live catalog hit.
                if let Some(url) = static_product_image(item.brand.as_deref(), &item.name) {
                    tracing::debug!(item = %item.name, "using static product image");
                    let mut item = item;
                    if item.image.is_none() {
                        item.image = Some(url.to_string());
                    }
                    EnrichedItem {
                        item,
                        catalog: Some(CatalogData::static_mapping()),
                    }
                } else {
                    EnrichedItem::basic(item)
                }
            }
        }
    }

    /// Searches brand + name first, retrying with the bare name if the
    /// branded query comes back empty or fails. A failed call counts as an
    /// empty result at every step.
    async fn search(&self, item: &InventoryItem) -> Vec<CatalogProduct> {
        let brand = item.brand.as_deref();
        let branded = self
            .client
            .search_products(&item.name, brand)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(item = %item.name, error = %e, "catalog search failed");
                Vec::new()
            });
        if !branded.is_empty() || brand.is_none() {
            return branded;
        }

        tracing::debug!(item = %item.name, "branded search empty, retrying name only");
        self.client
            .search_products(&item.name, None)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(item = %item.name, error = %e, "catalog search failed");
                Vec::new()
            })
    }

    async fn merge_catalog(&self, mut item: InventoryItem, product: CatalogProduct) -> EnrichedItem {
        if item.image.is_none() {
            item.image = product.image.clone();
        }
        if item.barcode.is_none() {
            item.barcode = product.barcode.clone();
        }

        // Barcode lookup fills in richer nutrition data when available.
        let detail = match &product.barcode {
            Some(code) => match self.client.product_by_barcode(code).await {
                Ok(detail) => detail,
                Err(e) => {
                    tracing::warn!(barcode = %code, error = %e, "barcode lookup failed");
                    None
                }
            },
            None => None,
        };
        let detail = detail.unwrap_or_else(|| product.clone());

        for tag in derive_dietary_tags(&detail.labels) {
            if !item.dietary_tags.iter().any(|t| t == &tag) {
                item.dietary_tags.push(tag);
            }
        }

        EnrichedItem {
            item,
            catalog: Some(CatalogData {
                source: CatalogSource::CatalogSearch,
                allergens: detail.allergens,
                categories: detail.categories,
                labels: detail.labels,
                nutritional_info: detail.nutritional_info,
            }),
        }
    }
}

fn cache_key(item: &InventoryItem) -> String {
    format!(
        "{}|{}|{}",
        item.id,
        item.name,
        item.brand.as_deref().unwrap_or_default()
    )
}

/// Dietary tags implied by the catalog's label tags.
fn derive_dietary_tags(labels: &[String]) -> Vec<String> {
    LABEL_TAGS
        .iter()
        .filter(|(label, _)| labels.iter().any(|l| l == label))
        .map(|(_, tag)| (*tag).to_string())
        .collect()
}
