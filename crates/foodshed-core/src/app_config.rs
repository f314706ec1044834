use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub sites_path: PathBuf,
    pub inventory_path: PathBuf,
    pub postal_codes_path: PathBuf,
    pub catalog_search_url: String,
    pub catalog_product_url: String,
    pub catalog_search_timeout_secs: u64,
    pub catalog_product_timeout_secs: u64,
    pub catalog_user_agent: String,
    pub enrich_concurrency: usize,
}
