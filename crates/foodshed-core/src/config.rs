use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var has an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var has an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("FOODSHED_ENV", "development"));
    let bind_addr = parse_addr("FOODSHED_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("FOODSHED_LOG_LEVEL", "info");

    let sites_path = PathBuf::from(or_default("FOODSHED_SITES_PATH", "./config/food-banks.yaml"));
    let inventory_path = PathBuf::from(or_default(
        "FOODSHED_INVENTORY_PATH",
        "./config/inventory.yaml",
    ));
    let postal_codes_path = PathBuf::from(or_default(
        "FOODSHED_POSTAL_CODES_PATH",
        "./config/postal-codes.yaml",
    ));

    let catalog_search_url = or_default(
        "FOODSHED_CATALOG_SEARCH_URL",
        "https://world.openfoodfacts.org/cgi/search.pl",
    );
    let catalog_product_url = or_default(
        "FOODSHED_CATALOG_PRODUCT_URL",
        "https://world.openfoodfacts.org/api/v0/product",
    );
    let catalog_search_timeout_secs = parse_u64("FOODSHED_CATALOG_SEARCH_TIMEOUT_SECS", "8")?;
    let catalog_product_timeout_secs = parse_u64("FOODSHED_CATALOG_PRODUCT_TIMEOUT_SECS", "5")?;
    let catalog_user_agent = or_default("FOODSHED_CATALOG_USER_AGENT", "foodshed/0.1 (site-search)");
    let enrich_concurrency = parse_usize("FOODSHED_ENRICH_CONCURRENCY", "4")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sites_path,
        inventory_path,
        postal_codes_path,
        catalog_search_url,
        catalog_product_url,
        catalog_search_timeout_secs,
        catalog_product_timeout_secs,
        catalog_user_agent,
        enrich_concurrency,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
