use crate::{error::LedgerError, ledger::LedgerStore};
use async_trait::async_trait;
use model::ledger::{LedgerCategory, LedgerEntry};
use tokio::sync::Mutex;

/// Ledger kept in memory, for tests.
#[derive(Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        MemoryLedger::default()
    }

    pub async fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn latest(&self, category: LedgerCategory) -> Result<Option<LedgerEntry>, LedgerError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|e| e.category == category)
            .max_by_key(|e| e.batch_number)
            .cloned())
    }

    async fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        self.entries.lock().await.push(entry.clone());
        Ok(())
    }
}
