mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use foodshed_catalog::{Enricher, OpenFoodFactsClient};
use foodshed_core::datasets;
use foodshed_geo::Geolocator;
use foodshed_inventory::InventoryStore;
use foodshed_search::SearchService;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = foodshed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let sites = datasets::load_sites(&config.sites_path)?.food_banks;
    let inventory = datasets::load_inventory(&config.inventory_path)?.items;
    let postal_table = datasets::load_postal_table(&config.postal_codes_path)?;
    tracing::info!(
        sites = sites.len(),
        items = inventory.len(),
        postal_codes = postal_table.postal_codes.len(),
        "datasets loaded"
    );

    let client = OpenFoodFactsClient::with_base_urls(
        &config.catalog_user_agent,
        config.catalog_search_timeout_secs,
        config.catalog_product_timeout_secs,
        &config.catalog_search_url,
        &config.catalog_product_url,
    )?;
    let enricher = Arc::new(Enricher::new(Arc::new(client), config.enrich_concurrency));
    let store = Arc::new(InventoryStore::new(inventory));
    let service = Arc::new(SearchService::new(
        Geolocator::new(postal_table),
        Arc::clone(&store),
        enricher,
    ));

    let app = build_app(AppState {
        sites: Arc::new(sites),
        service,
        store,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
