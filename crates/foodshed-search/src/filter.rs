//! Pure filtering stages over proximity-matched sites.
//!
//! Stage order matters and is fixed by [`apply_all`]: distance cut, then
//! cultural filter (removes sites), then allergen annotation (never removes
//! sites), then the distance sort.

use serde::Serialize;

use foodshed_core::types::{AllergenFilter, CulturalFilter, SearchCriteria, Site};

/// Allergen accommodation annotation attached to a site when the search
/// requested allergen filters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenInfo {
    pub has_allergen_free_options: bool,
    pub supported_allergens: Vec<AllergenFilter>,
}

/// A site matched by proximity, carrying its per-request annotations.
#[derive(Debug, Clone, Serialize)]
pub struct SiteHit {
    #[serde(flatten)]
    pub site: Site,
    #[serde(rename = "distance", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(rename = "allergenInfo", skip_serializing_if = "Option::is_none")]
    pub allergen_info: Option<AllergenInfo>,
}

impl SiteHit {
    #[must_use]
    pub fn new(site: Site, distance_km: f64) -> Self {
        Self {
            site,
            distance_km: Some(distance_km),
            allergen_info: None,
        }
    }
}

/// Whether a site's accommodation tags cover one allergen filter.
///
/// Deliberately a substring match: the filter's allergen name (its `-free`
/// suffix stripped) anywhere inside an accommodation tag counts, so
/// `dairy-free` matches a `dairy-free-accommodation` tag. Note that `nut`
/// also matches inside `coconut-safe`; the vocabulary is curated with that
/// in mind.
#[must_use]
pub fn accommodates_allergen(site: &Site, filter: AllergenFilter) -> bool {
    let name = filter.allergen_name();
    site.accommodations.iter().any(|tag| tag.contains(name))
}

/// Drops hits beyond `max_km`. Hits without a distance are dropped too.
pub fn by_distance(hits: &mut Vec<SiteHit>, max_km: u32) {
    hits.retain(|hit| {
        hit.distance_km
            .map_or(false, |d| d <= f64::from(max_km))
    });
}

/// Keeps hits accommodating at least one requested cultural filter.
/// No-op when the filter list is empty.
pub fn by_cultural(hits: &mut Vec<SiteHit>, cultural: &[CulturalFilter]) {
    if cultural.is_empty() {
        return;
    }
    hits.retain(|hit| {
        cultural
            .iter()
            .any(|c| hit.site.accommodations.iter().any(|tag| tag == c.as_str()))
    });
}

/// Annotates every hit with allergen accommodation info. Never removes a
/// hit: a site with no matching accommodations is still useful to show.
pub fn annotate_allergens(hits: &mut [SiteHit], allergens: &[AllergenFilter]) {
    if allergens.is_empty() {
        return;
    }
    for hit in hits {
        let supported: Vec<AllergenFilter> = allergens
            .iter()
            .copied()
            .filter(|a| accommodates_allergen(&hit.site, *a))
            .collect();
        hit.allergen_info = Some(AllergenInfo {
            has_allergen_free_options: !supported.is_empty(),
            supported_allergens: supported,
        });
    }
}

/// Sorts ascending by distance. A missing distance sorts as zero, which
/// floats those hits to the front.
pub fn sort_by_distance(hits: &mut [SiteHit]) {
    hits.sort_by(|a, b| {
        a.distance_km
            .unwrap_or(0.0)
            .total_cmp(&b.distance_km.unwrap_or(0.0))
    });
}

/// Runs the full pipeline in its fixed order.
pub fn apply_all(hits: &mut Vec<SiteHit>, criteria: &SearchCriteria) {
    by_distance(hits, criteria.radius_km);
    if let Some(cultural) = &criteria.cultural {
        by_cultural(hits, cultural);
    }
    if let Some(allergens) = &criteria.allergens {
        annotate_allergens(hits, allergens);
    }
    sort_by_distance(hits);
}
