//! Command line front-end over the search pipeline.
//!
//! Loads the same datasets as the server and runs searches locally, printing
//! JSON to stdout. Useful for smoke-testing data files without standing up
//! the HTTP service.

use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use foodshed_catalog::{Enricher, OpenFoodFactsClient};
use foodshed_core::datasets;
use foodshed_core::types::Category;
use foodshed_geo::Geolocator;
use foodshed_inventory::InventoryStore;
use foodshed_search::{InventoryQuery, SearchParams, SearchService};

#[derive(Debug, Parser)]
#[command(name = "foodshed-cli")]
#[command(about = "Food distribution site search command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for sites near a location.
    Search {
        /// Postal code or city name. Defaults to Halifax when omitted.
        #[arg(long)]
        location: Option<String>,
        /// Search radius in kilometers (1-500, default 50).
        #[arg(long)]
        radius: Option<String>,
        /// Comma-separated allergen filters, e.g. dairy-free,nut-free.
        #[arg(long)]
        allergens: Option<String>,
        /// Comma-separated cultural filters, e.g. halal,vegan.
        #[arg(long)]
        cultural: Option<String>,
    },
    /// Print known cities and postal prefixes.
    Suggest,
    /// Print a site's inventory.
    Inventory {
        site_id: String,
        /// Restrict to one category, e.g. canned-goods.
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated allergen-free requirements.
        #[arg(long)]
        allergens: Option<String>,
        /// Attach catalog data from the product API.
        #[arg(long)]
        enhanced: bool,
    },
}

fn split_csv(raw: Option<&str>) -> Option<Vec<String>> {
    let values: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    (!values.is_empty()).then_some(values)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = foodshed_core::load_app_config()?;
    let sites = datasets::load_sites(&config.sites_path)?.food_banks;
    let inventory = datasets::load_inventory(&config.inventory_path)?.items;
    let postal_table = datasets::load_postal_table(&config.postal_codes_path)?;
    tracing::info!(
        sites = sites.len(),
        items = inventory.len(),
        "datasets loaded"
    );

    let client = OpenFoodFactsClient::with_base_urls(
        &config.catalog_user_agent,
        config.catalog_search_timeout_secs,
        config.catalog_product_timeout_secs,
        &config.catalog_search_url,
        &config.catalog_product_url,
    )?;
    let store = Arc::new(InventoryStore::new(inventory));
    let service = SearchService::new(
        Geolocator::new(postal_table),
        Arc::clone(&store),
        Arc::new(Enricher::new(Arc::new(client), config.enrich_concurrency)),
    );

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            location,
            radius,
            allergens,
            cultural,
        } => {
            let params = SearchParams {
                location,
                radius,
                allergens: split_csv(allergens.as_deref()),
                cultural: split_csv(cultural.as_deref()),
            };
            let response = service.search(&params, &sites)?;
            tracing::info!(
                matches = response.results.total_found,
                "search complete"
            );
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Suggest => {
            let suggestions = service.location_suggestions();
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
        Commands::Inventory {
            site_id,
            category,
            allergens,
            enhanced,
        } => {
            let category = category
                .as_deref()
                .map(Category::from_str)
                .transpose()
                .map_err(|e| anyhow::anyhow!(e))?;
            let query = InventoryQuery {
                allergens: split_csv(allergens.as_deref()).unwrap_or_default(),
                category,
                enhanced,
            };
            let items = service.inventory(&site_id, &query).await;
            tracing::info!(site = %site_id, items = items.len(), "inventory read");
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }

    Ok(())
}
