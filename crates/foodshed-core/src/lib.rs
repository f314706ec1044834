//! Shared domain types, validation, configuration and static dataset
//! loading for the foodshed workspace.

mod app_config;
mod config;
pub mod datasets;
mod error;
pub mod types;
pub mod validate;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use validate::ValidationError;
