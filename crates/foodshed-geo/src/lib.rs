//! Location resolution and proximity search.
//!
//! [`Geolocator`] maps free-text input (postal codes, city names) onto
//! coordinates using the static postal table, and reverse-maps coordinates
//! back to a display city. [`distance_km`] and [`nearby`] implement the
//! great-circle distance engine used by the search pipeline.

mod distance;
mod resolve;

pub use distance::{distance_km, nearby, EARTH_RADIUS_KM};
pub use resolve::{
    Geolocator, LocationSuggestion, LocationSuggestions, NearestCity, DEFAULT_COORDINATES,
};
