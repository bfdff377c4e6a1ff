use model::record::RecordError;
use thiserror::Error;

/// Failures reading the paged source collection.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid cursor for source: {0}")]
    InvalidCursor(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed source row: {0}")]
    MalformedRow(#[from] RecordError),

    #[error("Source fetch failed: {0}")]
    Fetch(String),
}

/// Failures writing to or reading from a batch container.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write '{subscriber_key}' to container '{container}': {reason}")]
    Write {
        container: String,
        subscriber_key: String,
        reason: String,
    },

    #[error("Container '{0}' does not exist")]
    MissingContainer(String),

    #[error("Container store error: {0}")]
    Backend(String),
}

/// Failures talking to the provider's REST surface.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing or invalid token; deletion aborts before the delete call.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("Delete backend error: {0}")]
    Backend(String),
}
