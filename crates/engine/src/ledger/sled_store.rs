use crate::{error::LedgerError, ledger::LedgerStore};
use async_trait::async_trait;
use model::ledger::{LedgerCategory, LedgerEntry};
use std::path::Path;

/// Sled-backed ledger. Values are bincode; keys zero-pad the batch
/// number so the prefix scan walks entries in batch order, but `latest`
/// still takes an explicit maximum rather than trusting key order.
pub struct SledLedger {
    db: sled::Db,
}

impl SledLedger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let db = sled::open(path).map_err(|e| LedgerError::Open(e.to_string()))?;
        Ok(SledLedger { db })
    }

    #[inline]
    fn entry_key(category: LedgerCategory, batch_number: u64) -> String {
        format!("ledger:{}:{:020}", category.as_str(), batch_number)
    }

    #[inline]
    fn category_prefix(category: LedgerCategory) -> String {
        format!("ledger:{}:", category.as_str())
    }
}

#[async_trait]
impl LedgerStore for SledLedger {
    async fn latest(&self, category: LedgerCategory) -> Result<Option<LedgerEntry>, LedgerError> {
        let mut latest: Option<LedgerEntry> = None;
        for item in self.db.scan_prefix(Self::category_prefix(category)) {
            let (_key, value) = item.map_err(|e| LedgerError::Read(e.to_string()))?;
            let entry: LedgerEntry =
                bincode::deserialize(&value).map_err(|e| LedgerError::Decode(e.to_string()))?;
            if latest
                .as_ref()
                .is_none_or(|l| entry.batch_number > l.batch_number)
            {
                latest = Some(entry);
            }
        }
        Ok(latest)
    }

    async fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let key = Self::entry_key(entry.category, entry.batch_number.0);
        let value = bincode::serialize(entry).map_err(|e| LedgerError::Encode(e.to_string()))?;

        self.db
            .insert(key, value)
            .map_err(|e| LedgerError::Append(e.to_string()))?;
        // The ledger commit is the one irreversible step; make sure it
        // actually reached disk before reporting success.
        self.db
            .flush_async()
            .await
            .map_err(|e| LedgerError::Append(e.to_string()))?;
        Ok(())
    }
}
