use connectors::error::{ProviderError, StoreError};
use engine::error::LedgerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger store error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Container store error: {0}")]
    Store(#[from] StoreError),

    #[error("Provider configuration error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Could not determine home directory")]
    NoHomeDir,
}
