//! Search pipeline: validated criteria in, ordered enriched sites out.
//!
//! [`filter`] holds the pure filtering stages; [`SearchService`] wires them
//! together with location resolution, inventory aggregation and catalog
//! enrichment.

pub mod filter;
mod service;

pub use filter::{accommodates_allergen, AllergenInfo, SiteHit};
pub use service::{
    CoordinatesResponse, CriteriaEcho, InventoryQuery, LocationInfo, SearchError, SearchParams,
    SearchResponse, SearchResults, SearchService, SiteResult,
};
