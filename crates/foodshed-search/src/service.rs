//! Search orchestration: one linear pipeline per request.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use foodshed_catalog::{EnrichedItem, Enricher};
use foodshed_core::types::{Category, Coordinates, SearchCriteria, Site};
use foodshed_core::validate::{
    validate_allergens, validate_coordinates, validate_cultural, validate_radius, ValidationError,
};
use foodshed_geo::{nearby, Geolocator, LocationSuggestions};
use foodshed_inventory::{site_tags, AvailabilityTier, InventoryFilters, InventoryStore, InventorySummary};

use crate::filter::{self, SiteHit};

/// Raw query inputs, straight from the HTTP layer. Validated on entry to
/// every search operation.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub location: Option<String>,
    pub radius: Option<String>,
    pub allergens: Option<Vec<String>>,
    pub cultural: Option<Vec<String>>,
}

/// Options for an inventory read.
#[derive(Debug, Clone)]
pub struct InventoryQuery {
    /// Allergen-free requirements, e.g. `dairy-free`.
    pub allergens: Vec<String>,
    pub category: Option<Category>,
    /// Attach catalog data. Defaults to true at the HTTP layer.
    pub enhanced: bool,
}

/// Failures a search request can produce. Everything downstream of
/// validation degrades instead of failing.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Echo of the validated criteria, for the response envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaEcho {
    pub location: String,
    pub coordinates: Coordinates,
    pub radius: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergens: Option<Vec<foodshed_core::types::AllergenFilter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural: Option<Vec<foodshed_core::types::CulturalFilter>>,
}

/// Where the search thinks the user is. A reverse lookup that lands
/// outside every known city degrades to marker values rather than
/// dropping the fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    pub city: String,
    pub region: String,
    pub found: bool,
    pub is_default: bool,
}

const UNKNOWN_CITY: &str = "Unknown Location";
const DEFAULT_REGION: &str = "Nova Scotia";

/// A fully enriched site in a search response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteResult {
    #[serde(flatten)]
    pub hit: SiteHit,
    pub tags: Vec<String>,
    pub inventory_count: usize,
    pub total_quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_summary: Option<InventorySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_categories: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_allergen_options: Option<Vec<String>>,
    pub availability_status: AvailabilityTier,
    pub availability_message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub total_found: usize,
    pub food_banks: Vec<SiteResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub search_criteria: CriteriaEcho,
    pub location_info: LocationInfo,
    pub results: SearchResults,
}

/// Response shape for coordinate-based search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatesResponse {
    pub coordinates: Coordinates,
    pub location_info: LocationInfo,
    pub radius: u32,
    pub results: SearchResults,
}

/// Orchestrates a search: validate, resolve, match, filter, enrich.
pub struct SearchService {
    geolocator: Geolocator,
    store: Arc<InventoryStore>,
    enricher: Arc<Enricher>,
}

impl SearchService {
    #[must_use]
    pub fn new(geolocator: Geolocator, store: Arc<InventoryStore>, enricher: Arc<Enricher>) -> Self {
        Self {
            geolocator,
            store,
            enricher,
        }
    }

    /// Full search over free-text location input.
    ///
    /// # Errors
    ///
    /// [`SearchError::Validation`] for bad radius/filter values or location
    /// text that resolves to nothing. Absent location input is not an
    /// error; it falls back to the default city.
    pub fn search(
        &self,
        params: &SearchParams,
        sites: &[Site],
    ) -> Result<SearchResponse, SearchError> {
        let radius = validate_radius(params.radius.as_deref())?;
        let allergens = validate_allergens(params.allergens.as_deref())?;
        let cultural = validate_cultural(params.cultural.as_deref())?;

        let location_text = params
            .location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let resolved = match location_text {
            Some(text) => {
                self.geolocator
                    .resolve(text)
                    .ok_or_else(|| ValidationError::UnknownLocation {
                        input: text.to_string(),
                    })?
            }
            None => Geolocator::default_location(),
        };
        let is_default = location_text.is_none();

        let criteria = SearchCriteria {
            radius_km: radius,
            allergens,
            cultural,
        };

        let mut hits: Vec<SiteHit> = nearby(sites, resolved.coordinates, f64::from(radius))
            .into_iter()
            .map(|(site, distance)| SiteHit::new(site, distance))
            .collect();
        filter::apply_all(&mut hits, &criteria);

        tracing::debug!(
            matches = hits.len(),
            radius,
            default_location = is_default,
            "search matched sites"
        );

        let food_banks: Vec<SiteResult> = hits
            .into_iter()
            .map(|hit| self.enrich_full(hit))
            .collect();

        let location_info = match self
            .geolocator
            .city_from_coordinates(resolved.coordinates, None)
        {
            Some(c) => LocationInfo {
                city: c.city,
                region: c.region,
                found: !is_default,
                is_default,
            },
            None => LocationInfo {
                city: UNKNOWN_CITY.to_string(),
                region: DEFAULT_REGION.to_string(),
                found: false,
                is_default,
            },
        };

        Ok(SearchResponse {
            search_criteria: CriteriaEcho {
                location: location_text
                    .map_or_else(|| "Default (Halifax)".to_string(), ToString::to_string),
                coordinates: resolved.coordinates,
                radius: criteria.radius_km,
                allergens: criteria.allergens,
                cultural: criteria.cultural,
            },
            location_info,
            results: SearchResults {
                total_found: food_banks.len(),
                food_banks,
            },
        })
    }

    /// Coordinate search with lighter enrichment: counts and availability
    /// only, no summaries or allergen rollups.
    ///
    /// # Errors
    ///
    /// [`SearchError::Validation`] for non-numeric or out-of-bounds
    /// coordinates, or a bad radius.
    pub fn search_by_coordinates(
        &self,
        lat: &str,
        lon: &str,
        radius: Option<&str>,
        sites: &[Site],
    ) -> Result<CoordinatesResponse, SearchError> {
        let coordinates = validate_coordinates(lat, lon)?;
        let radius = validate_radius(radius)?;

        let mut hits: Vec<SiteHit> = nearby(sites, coordinates, f64::from(radius))
            .into_iter()
            .map(|(site, distance)| SiteHit::new(site, distance))
            .collect();
        filter::sort_by_distance(&mut hits);

        let food_banks: Vec<SiteResult> = hits
            .into_iter()
            .map(|hit| self.enrich_light(hit))
            .collect();

        let location_info = match self.geolocator.city_from_coordinates(coordinates, None) {
            Some(c) => LocationInfo {
                city: c.city,
                region: c.region,
                found: true,
                is_default: false,
            },
            None => LocationInfo {
                city: UNKNOWN_CITY.to_string(),
                region: DEFAULT_REGION.to_string(),
                found: false,
                is_default: false,
            },
        };

        Ok(CoordinatesResponse {
            coordinates,
            location_info,
            radius,
            results: SearchResults {
                total_found: food_banks.len(),
                food_banks,
            },
        })
    }

    /// Autocomplete payload for the location input.
    #[must_use]
    pub fn location_suggestions(&self) -> LocationSuggestions {
        self.geolocator.suggestions()
    }

    /// A site's inventory with filters applied, catalog-enhanced unless
    /// the caller opted out.
    pub async fn inventory(&self, site_id: &str, query: &InventoryQuery) -> Vec<EnrichedItem> {
        let filters = InventoryFilters {
            allergens: query.allergens.clone(),
            category: query.category,
        };
        let items = self.store.filtered_items_for(site_id, &filters);

        if query.enhanced {
            self.enricher.enhance_batch(items).await
        } else {
            items.into_iter().map(EnrichedItem::basic).collect()
        }
    }

    /// Line-item counts for a set of sites, one store pass.
    #[must_use]
    pub fn inventory_counts(&self, site_ids: &[String]) -> BTreeMap<String, usize> {
        self.store.counts_for(site_ids)
    }

    /// Every site with light enrichment, for the directory listing. No
    /// distance is attached since there is no origin.
    #[must_use]
    pub fn list_sites(&self, sites: &[Site]) -> Vec<SiteResult> {
        sites
            .iter()
            .map(|site| {
                self.enrich_light(SiteHit {
                    site: site.clone(),
                    distance_km: None,
                    allergen_info: None,
                })
            })
            .collect()
    }

    /// One site with full enrichment.
    #[must_use]
    pub fn site_detail(&self, site: &Site) -> SiteResult {
        self.enrich_full(SiteHit {
            site: site.clone(),
            distance_km: None,
            allergen_info: None,
        })
    }

    fn enrich_full(&self, hit: SiteHit) -> SiteResult {
        let site_id = hit.site.id.clone();
        let items = self.store.items_for(&site_id);
        let total_quantity = self.store.total_quantity(&site_id);
        let tier = AvailabilityTier::from_total(total_quantity);

        SiteResult {
            tags: site_tags(hit.site.city.as_deref(), &items),
            inventory_count: items.len(),
            total_quantity,
            inventory_summary: Some(self.store.summary(&site_id)),
            available_categories: Some(self.store.categories_for(&site_id)),
            available_allergen_options: Some(self.store.allergen_options_for(&site_id)),
            availability_status: tier,
            availability_message: tier.message(),
            hit,
        }
    }

    fn enrich_light(&self, hit: SiteHit) -> SiteResult {
        let site_id = hit.site.id.clone();
        let items = self.store.items_for(&site_id);
        let total_quantity = self.store.total_quantity(&site_id);
        let tier = AvailabilityTier::from_total(total_quantity);

        SiteResult {
            tags: site_tags(hit.site.city.as_deref(), &items),
            inventory_count: items.len(),
            total_quantity,
            inventory_summary: None,
            available_categories: None,
            available_allergen_options: None,
            availability_status: tier,
            availability_message: tier.message(),
            hit,
        }
    }
}
