use thiserror::Error;

/// Errors returned by the catalog API client.
///
/// These never propagate past the enricher: a failed lookup degrades to
/// "no catalog data" for that one item.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Client misconfiguration, e.g. an unparsable base URL.
    #[error("catalog API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
