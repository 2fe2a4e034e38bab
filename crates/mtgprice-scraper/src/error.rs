use thiserror::Error;

/// Failure of a single outbound store call. Never escapes a lookup: the
/// executor converts every variant into the unavailable outcome.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid store URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("store {store_id} has no inventory endpoint configured")]
    MissingInventoryEndpoint { store_id: String },
}
