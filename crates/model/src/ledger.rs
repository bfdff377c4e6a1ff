use crate::{cursor::RowCursor, naming::BatchNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work a ledger entry commits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerCategory {
    BatchCreation,
    BatchDeletion,
}

impl LedgerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerCategory::BatchCreation => "BatchCreation",
            LedgerCategory::BatchDeletion => "BatchDeletion",
        }
    }
}

impl fmt::Display for LedgerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One committed unit of work.
///
/// Entries are append-only: written exactly once by the orchestrator
/// that committed the work, never mutated, never deleted. For
/// `BatchCreation` the entry with the greatest batch number carries the
/// authoritative resume cursor; for `BatchDeletion` it marks the highest
/// batch fully deleted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub category: LedgerCategory,
    pub batch_number: BatchNumber,
    pub batch_label: String,
    pub last_row_key: RowCursor,
    pub committed_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Entry committing an extracted batch, carrying the final cursor.
    pub fn creation(batch_number: BatchNumber, last_row_key: RowCursor) -> Self {
        LedgerEntry {
            category: LedgerCategory::BatchCreation,
            batch_number,
            batch_label: batch_number.label(),
            last_row_key,
            committed_at: Utc::now(),
        }
    }

    /// Entry committing a clean deletion of a batch's active container.
    pub fn deletion(batch_number: BatchNumber) -> Self {
        LedgerEntry {
            category: LedgerCategory::BatchDeletion,
            batch_number,
            batch_label: batch_number.label(),
            last_row_key: RowCursor::Start,
            committed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_derived_not_hand_built() {
        let entry = LedgerEntry::creation(BatchNumber(9), RowCursor::At(120));
        assert_eq!(entry.batch_label, "S-9");
        assert_eq!(entry.category, LedgerCategory::BatchCreation);
        assert_eq!(entry.last_row_key, RowCursor::At(120));
    }

    #[test]
    fn deletion_entries_carry_no_cursor() {
        let entry = LedgerEntry::deletion(BatchNumber(4));
        assert_eq!(entry.category, LedgerCategory::BatchDeletion);
        assert_eq!(entry.last_row_key, RowCursor::Start);
        assert_eq!(entry.batch_label, "S-4");
    }
}
