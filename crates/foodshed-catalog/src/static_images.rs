//! Static product-image fallback table.
//!
//! Real catalog image URLs for common donation staples, keyed by a
//! normalized `brand_name` token. Used when the live catalog search yields
//! no usable image.

/// Known product images, keyed by [`product_key`] output.
const PRODUCT_IMAGE_MAP: &[(&str, &str)] = &[
    (
        "jif_peanut_butter",
        "https://images.openfoodfacts.org/images/products/051/500/25515/front_en.16.400.jpg",
    ),
    (
        "barilla_whole_grain_pasta",
        "https://images.openfoodfacts.org/images/products/076/808/50000/front_en.125.400.jpg",
    ),
    (
        "bushs_black_beans",
        "https://images.openfoodfacts.org/images/products/003/960/06270/front_en.95.400.jpg",
    ),
    (
        "green_giant_sweet_corn",
        "https://images.openfoodfacts.org/images/products/020/000/14697/front_en.117.400.jpg",
    ),
    (
        "starkist_tuna",
        "https://images.openfoodfacts.org/images/products/001/120/13421/front_en.80.400.jpg",
    ),
    (
        "wonder_whole_wheat_bread",
        "https://images.openfoodfacts.org/images/products/007/286/00047/front_en.22.400.jpg",
    ),
    (
        "hunts_diced_tomatoes",
        "https://images.openfoodfacts.org/images/products/002/700/00309/front_en.99.400.jpg",
    ),
    (
        "uncle_bens_brown_rice",
        "https://images.openfoodfacts.org/images/products/054/800/02500/front_en.104.400.jpg",
    ),
    (
        "carnation_evaporated_milk",
        "https://images.openfoodfacts.org/images/products/001/280/00057/front_en.85.400.jpg",
    ),
    (
        "aunt_jemima_pancake_mix",
        "https://images.openfoodfacts.org/images/products/001/930/00210/front_en.42.400.jpg",
    ),
];

/// Multi-word product phrases collapsed to single tokens before the generic
/// whitespace pass, so "Whole Grain Pasta" and "whole-grain pasta" land on
/// the same key.
const PHRASE_TOKENS: &[(&str, &str)] = &[
    ("whole grain", "whole_grain"),
    ("whole wheat", "whole_wheat"),
    ("sweet corn", "sweet_corn"),
    ("diced tomatoes", "diced_tomatoes"),
    ("brown rice", "brown_rice"),
    ("evaporated milk", "evaporated_milk"),
    ("pancake mix", "pancake_mix"),
    ("peanut butter", "peanut_butter"),
    ("black beans", "black_beans"),
    ("tuna in water", "tuna"),
];

/// Look up a static image for a brand + product name pair.
#[must_use]
pub fn static_product_image(brand: Option<&str>, name: &str) -> Option<&'static str> {
    let key = product_key(brand, name);
    PRODUCT_IMAGE_MAP
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, url)| *url)
}

/// Normalized lookup key: lowercase, punctuation stripped, known phrases
/// collapsed, whitespace folded to underscores.
fn product_key(brand: Option<&str>, name: &str) -> String {
    let brand_part: String = brand
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let mut name_part = name.to_lowercase();
    for (phrase, token) in PHRASE_TOKENS {
        name_part = name_part.replace(phrase, token);
    }
    let name_part: String = name_part
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    format!("{brand_part}_{name_part}")
}
