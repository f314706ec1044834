//! In-memory inventory store and per-site aggregation.
//!
//! [`InventoryStore`] owns the full item list behind a `RwLock`; reads are
//! cheap snapshots, writes are serialized. [`aggregate`] derives the
//! presentation-level rollups: availability tiers, summaries and display
//! tags.

pub mod aggregate;
mod store;

pub use aggregate::{site_tags, AvailabilityTier, InventorySummary, LowStockItem};
pub use store::{InventoryFilters, InventoryStore};
