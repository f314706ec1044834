//! HTTP client for the Open Food Facts API.
//!
//! Wraps `reqwest` with per-endpoint timeouts and typed response mapping.
//! The production API exposes two operations: free-text product search and
//! direct barcode lookup. Both are best-effort; callers treat any error as
//! "no data".

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::CatalogError;
use crate::types::CatalogProduct;

const DEFAULT_SEARCH_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl";
const DEFAULT_PRODUCT_URL: &str = "https://world.openfoodfacts.org/api/v0/product";

const SEARCH_PAGE_SIZE: u32 = 5;
const SEARCH_FIELDS: &str = "code,product_name,brands,image_url,image_front_url,nutriments,\
                             allergens_tags,labels_tags,categories_tags";

/// Capability seam for catalog lookups, so the enricher can be driven by a
/// test double instead of the live API.
pub trait CatalogClient: Send + Sync {
    /// Free-text product search; `brand` is prepended to the search term
    /// when present. Returns up to a handful of candidates, best first.
    fn search_products<'a>(
        &'a self,
        name: &'a str,
        brand: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Vec<CatalogProduct>, CatalogError>>;

    /// Direct barcode lookup. `Ok(None)` means the catalog has no such
    /// product.
    fn product_by_barcode<'a>(
        &'a self,
        barcode: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogProduct>, CatalogError>>;
}

/// Client for the Open Food Facts REST API.
///
/// Use [`OpenFoodFactsClient::new`] for production or
/// [`OpenFoodFactsClient::with_base_urls`] to point at a mock server in
/// tests.
pub struct OpenFoodFactsClient {
    client: Client,
    search_url: Url,
    product_url: Url,
    search_timeout: Duration,
    product_timeout: Duration,
}

impl OpenFoodFactsClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        user_agent: &str,
        search_timeout_secs: u64,
        product_timeout_secs: u64,
    ) -> Result<Self, CatalogError> {
        Self::with_base_urls(
            user_agent,
            search_timeout_secs,
            product_timeout_secs,
            DEFAULT_SEARCH_URL,
            DEFAULT_PRODUCT_URL,
        )
    }

    /// Creates a client with custom base URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CatalogError::Deserialize`] if a base URL
    /// does not parse.
    pub fn with_base_urls(
        user_agent: &str,
        search_timeout_secs: u64,
        product_timeout_secs: u64,
        search_url: &str,
        product_url: &str,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent.to_owned())
            .build()?;

        Ok(Self {
            client,
            search_url: parse_url(search_url)?,
            product_url: parse_url(product_url)?,
            search_timeout: Duration::from_secs(search_timeout_secs),
            product_timeout: Duration::from_secs(product_timeout_secs),
        })
    }

    async fn search_impl(
        &self,
        name: &str,
        brand: Option<&str>,
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        let term = match brand.map(str::trim).filter(|b| !b.is_empty()) {
            Some(brand) => format!("{brand} {name}"),
            None => name.to_owned(),
        };

        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("search_terms", &term)
            .append_pair("search_simple", "1")
            .append_pair("action", "process")
            .append_pair("json", "1")
            .append_pair("page_size", &SEARCH_PAGE_SIZE.to_string())
            .append_pair("fields", SEARCH_FIELDS);

        tracing::debug!(%term, "searching catalog");
        let body = self.request_json(url, self.search_timeout).await?;

        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| CatalogError::Deserialize {
                context: format!("search(term={term})"),
                source: e,
            })?;

        Ok(response.products.into_iter().map(map_product).collect())
    }

    async fn barcode_impl(&self, barcode: &str) -> Result<Option<CatalogProduct>, CatalogError> {
        let mut url = self.product_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                CatalogError::Api(format!(
                    "product base URL '{}' does not support path segments",
                    self.product_url
                ))
            })?;
            segments.push(&format!("{barcode}.json"));
        }

        let body = self.request_json(url, self.product_timeout).await?;

        let response: BarcodeResponse =
            serde_json::from_value(body).map_err(|e| CatalogError::Deserialize {
                context: format!("product(barcode={barcode})"),
                source: e,
            })?;

        Ok(response.product.map(map_product))
    }

    /// Sends a GET request with the given per-call timeout, asserts a 2xx
    /// status, and parses the body as JSON.
    async fn request_json(
        &self,
        url: Url,
        timeout: Duration,
    ) -> Result<serde_json::Value, CatalogError> {
        let response = self.client.get(url.clone()).timeout(timeout).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

impl CatalogClient for OpenFoodFactsClient {
    fn search_products<'a>(
        &'a self,
        name: &'a str,
        brand: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Vec<CatalogProduct>, CatalogError>> {
        Box::pin(self.search_impl(name, brand))
    }

    fn product_by_barcode<'a>(
        &'a self,
        barcode: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogProduct>, CatalogError>> {
        Box::pin(self.barcode_impl(barcode))
    }
}

fn parse_url(raw: &str) -> Result<Url, CatalogError> {
    Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| CatalogError::Api(format!("invalid base URL '{raw}': {e}")))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<RawProduct>,
}

#[derive(Debug, Deserialize)]
struct BarcodeResponse {
    #[serde(default)]
    product: Option<RawProduct>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    brands: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_front_url: Option<String>,
    #[serde(default)]
    nutriments: Option<serde_json::Value>,
    #[serde(default)]
    allergens_tags: Vec<String>,
    #[serde(default)]
    labels_tags: Vec<String>,
    #[serde(default)]
    categories_tags: Vec<String>,
}

fn map_product(raw: RawProduct) -> CatalogProduct {
    let image = best_image(raw.image_front_url.as_deref(), raw.image_url.as_deref());
    CatalogProduct {
        barcode: raw.code,
        name: raw
            .product_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown Product".to_string()),
        brand: raw.brands.unwrap_or_default(),
        image,
        allergens: extract_allergens(&raw.allergens_tags),
        categories: raw.categories_tags,
        labels: raw.labels_tags,
        nutritional_info: raw.nutriments.unwrap_or(serde_json::Value::Null),
    }
}

/// Image priority: front image, then the general image, then none. Only
/// http(s) URLs are accepted.
fn best_image(front: Option<&str>, general: Option<&str>) -> Option<String> {
    [front, general]
        .into_iter()
        .flatten()
        .find(|url| is_valid_image_url(url))
        .map(ToOwned::to_owned)
}

fn is_valid_image_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Maps the catalog's namespaced allergen tags to our short vocabulary,
/// deduplicated, dropping anything unrecognized.
fn extract_allergens(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let mapped = match tag.as_str() {
            "en:gluten" => "gluten",
            "en:milk" => "dairy",
            "en:eggs" => "eggs",
            "en:fish" => "fish",
            "en:crustaceans" | "en:molluscs" => "shellfish",
            "en:tree-nuts" => "nuts",
            "en:peanuts" => "peanuts",
            "en:soybeans" => "soy",
            "en:sesame-seeds" => "sesame",
            "en:sulphur-dioxide-and-sulphites" => "sulfites",
            _ => continue,
        };
        if !out.iter().any(|a| a == mapped) {
            out.push(mapped.to_string());
        }
    }
    out
}
