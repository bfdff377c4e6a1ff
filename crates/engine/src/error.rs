use connectors::error::{ProviderError, SourceError, StoreError};
use model::{cursor::RowCursor, naming::BatchNumber};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Failed to open ledger store: {0}")]
    Open(String),

    #[error("Failed to read ledger: {0}")]
    Read(String),

    /// On append failure the entry must be assumed unpersisted.
    #[error("Failed to append ledger entry: {0}")]
    Append(String),

    #[error("Failed to encode ledger entry: {0}")]
    Encode(String),

    #[error("Failed to decode ledger entry: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Failed to fetch page at cursor {cursor}: {source}")]
    Fetch {
        cursor: RowCursor,
        #[source]
        source: SourceError,
    },

    #[error("Failed to replicate '{subscriber_key}' into batch {batch}: {source}")]
    Replicate {
        batch: BatchNumber,
        subscriber_key: String,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Error)]
pub enum DeletionError {
    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Provider call failed: {0}")]
    Provider(#[from] ProviderError),

    /// The provider accepted the request but reported errors; the batch
    /// stays pending for the next run.
    #[error("Provider reported errors deleting container '{container}'")]
    DeletionReported { container: String },
}
