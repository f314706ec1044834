//! Search-parameter validation.
//!
//! Pure functions over raw query-string inputs. Every failure is a
//! [`ValidationError`] carrying a client-facing message and, where it makes
//! sense, the list of valid values or example inputs — the HTTP layer maps
//! these to 400 responses without further translation.

use thiserror::Error;

use crate::types::{AllergenFilter, Coordinates, CulturalFilter};

pub const DEFAULT_RADIUS_KM: u32 = 50;
pub const MAX_RADIUS_KM: u32 = 500;

/// Nova Scotia bounding box used by the coordinate check.
pub const LAT_RANGE: (f64, f64) = (43.4, 47.1);
pub const LON_RANGE: (f64, f64) = (-66.4, -59.7);

/// Example inputs surfaced with location-related rejections.
pub const LOCATION_EXAMPLES: [&str; 4] = ["B3K 5H6", "Halifax", "Sydney", "Truro"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid radius. Please provide a positive number in kilometers.")]
    InvalidRadius,

    #[error("Radius too large. Maximum allowed is {MAX_RADIUS_KM}km.")]
    RadiusTooLarge,

    #[error("Invalid coordinates. Latitude and longitude must be valid numbers.")]
    NonNumericCoordinates,

    #[error("Coordinates appear to be outside Nova Scotia bounds.")]
    CoordinatesOutOfBounds,

    #[error("Invalid allergen filters: {}", invalid.join(", "))]
    UnknownAllergens { invalid: Vec<String> },

    #[error("Invalid cultural filters: {}", invalid.join(", "))]
    UnknownCultural { invalid: Vec<String> },

    #[error(
        "Invalid location format. Please provide a valid Nova Scotia postal code or city name."
    )]
    UnknownLocation { input: String },
}

impl ValidationError {
    /// The full vocabulary for rejections caused by an unknown filter value.
    #[must_use]
    pub fn valid_options(&self) -> Option<Vec<&'static str>> {
        match self {
            ValidationError::UnknownAllergens { .. } => {
                Some(AllergenFilter::ALL.iter().map(|f| f.as_str()).collect())
            }
            ValidationError::UnknownCultural { .. } => {
                Some(CulturalFilter::ALL.iter().map(|f| f.as_str()).collect())
            }
            _ => None,
        }
    }

    /// Example inputs for rejections caused by an unparsable location.
    #[must_use]
    pub fn examples(&self) -> Option<Vec<&'static str>> {
        match self {
            ValidationError::UnknownLocation { .. } => Some(LOCATION_EXAMPLES.to_vec()),
            _ => None,
        }
    }
}

/// Normalize and bounds-check a raw radius parameter.
///
/// Absent (or blank) input falls back to [`DEFAULT_RADIUS_KM`]. Fractional
/// values are truncated toward zero before the bounds check.
///
/// # Errors
///
/// [`ValidationError::InvalidRadius`] for non-numeric or non-positive input,
/// [`ValidationError::RadiusTooLarge`] above [`MAX_RADIUS_KM`].
pub fn validate_radius(raw: Option<&str>) -> Result<u32, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_RADIUS_KM);
    };

    let parsed: f64 = raw.parse().map_err(|_| ValidationError::InvalidRadius)?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(ValidationError::InvalidRadius);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let value = parsed.trunc() as u32;
    if value == 0 {
        return Err(ValidationError::InvalidRadius);
    }
    if value > MAX_RADIUS_KM {
        return Err(ValidationError::RadiusTooLarge);
    }
    Ok(value)
}

/// Parse and bounds-check a raw coordinate pair against the Nova Scotia box.
///
/// # Errors
///
/// [`ValidationError::NonNumericCoordinates`] if either value fails to parse,
/// [`ValidationError::CoordinatesOutOfBounds`] outside the bounding box.
pub fn validate_coordinates(lat: &str, lon: &str) -> Result<Coordinates, ValidationError> {
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| ValidationError::NonNumericCoordinates)?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|_| ValidationError::NonNumericCoordinates)?;

    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(ValidationError::NonNumericCoordinates);
    }
    if latitude < LAT_RANGE.0
        || latitude > LAT_RANGE.1
        || longitude < LON_RANGE.0
        || longitude > LON_RANGE.1
    {
        return Err(ValidationError::CoordinatesOutOfBounds);
    }

    Ok(Coordinates {
        latitude,
        longitude,
    })
}

/// Validate allergen filter values against the fixed vocabulary.
///
/// Absent input means "no allergen filtering" and maps to `None`.
///
/// # Errors
///
/// [`ValidationError::UnknownAllergens`] naming every offending value.
pub fn validate_allergens(
    raw: Option<&[String]>,
) -> Result<Option<Vec<AllergenFilter>>, ValidationError> {
    let Some(raw) = raw.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let mut parsed = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();
    for value in raw {
        match AllergenFilter::parse(value) {
            Some(f) => parsed.push(f),
            None => invalid.push(value.clone()),
        }
    }

    if invalid.is_empty() {
        Ok(Some(parsed))
    } else {
        Err(ValidationError::UnknownAllergens { invalid })
    }
}

/// Validate cultural filter values against the fixed vocabulary.
///
/// # Errors
///
/// [`ValidationError::UnknownCultural`] naming every offending value.
pub fn validate_cultural(
    raw: Option<&[String]>,
) -> Result<Option<Vec<CulturalFilter>>, ValidationError> {
    let Some(raw) = raw.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let mut parsed = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();
    for value in raw {
        match CulturalFilter::parse(value) {
            Some(f) => parsed.push(f),
            None => invalid.push(value.clone()),
        }
    }

    if invalid.is_empty() {
        Ok(Some(parsed))
    } else {
        Err(ValidationError::UnknownCultural { invalid })
    }
}
