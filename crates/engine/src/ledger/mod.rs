use crate::error::LedgerError;
use async_trait::async_trait;
use model::ledger::{LedgerCategory, LedgerEntry};

pub mod memory;
pub mod sled_store;

/// Durable append-only progress log; the sole authority for resume
/// state.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Entry with the numerically greatest batch number for the
    /// category, or `None` when nothing was ever committed.
    /// Implementations must select by batch number explicitly rather
    /// than rely on insertion order.
    async fn latest(&self, category: LedgerCategory) -> Result<Option<LedgerEntry>, LedgerError>;

    /// Appends one committed unit of work. If this fails the entry must
    /// be assumed unpersisted.
    async fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerError>;
}
