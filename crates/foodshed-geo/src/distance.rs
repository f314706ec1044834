//! Great-circle distance engine.
//!
//! Standard Haversine with a fixed Earth radius; results are rounded to one
//! decimal so distances are stable across platforms and comparisons against
//! the radius cutoff behave the same everywhere.

use foodshed_core::types::{Coordinates, Site};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinate pairs, in km, rounded to one
/// decimal place.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Clamp guards against h creeping past 1.0 for antipodal pairs.
    let c = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();

    round_one_decimal(EARTH_RADIUS_KM * c)
}

/// All sites with coordinates within `radius_km` of `origin`, paired with
/// their distance and sorted ascending (stable, so equidistant sites keep
/// their directory order). Sites without coordinates are skipped, never an
/// error. A zero radius admits only exact-coincident points.
#[must_use]
pub fn nearby(sites: &[Site], origin: Coordinates, radius_km: f64) -> Vec<(Site, f64)> {
    let mut hits: Vec<(Site, f64)> = sites
        .iter()
        .filter_map(|site| {
            let coords = site.coordinates?;
            let distance = distance_km(origin, coords);
            (distance <= radius_km).then(|| (site.clone(), distance))
        })
        .collect();

    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
