use thiserror::Error;

/// Errors raised while loading configuration or static datasets at startup.
///
/// These are programming/deployment-level failures: they abort process
/// startup and are never produced while serving a request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read dataset file {path}: {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset file {path}: {source}")]
    DatasetParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("dataset validation failed: {0}")]
    Validation(String),
}
