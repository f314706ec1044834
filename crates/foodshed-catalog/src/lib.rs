//! External product-catalog integration.
//!
//! [`OpenFoodFactsClient`] wraps the Open Food Facts HTTP API behind the
//! [`CatalogClient`] trait so tests can inject a double. [`Enricher`] layers
//! caching, a two-tier image fallback (catalog → static mapping → original)
//! and label-to-tag normalization on top. Catalog lookups are strictly
//! best-effort: no failure in this crate ever surfaces to a search request.

mod client;
mod enrich;
mod error;
mod static_images;
mod types;

pub use client::{CatalogClient, OpenFoodFactsClient};
pub use enrich::Enricher;
pub use error::CatalogError;
pub use static_images::static_product_image;
pub use types::{CatalogData, CatalogProduct, CatalogSource, EnrichedItem};
