use model::{
    cursor::RowCursor,
    ledger::{LedgerCategory, LedgerEntry},
    naming::BatchNumber,
};

/// What a single extraction run will do: exactly one target batch,
/// resumed from the last committed cursor. Continuing into further
/// batch numbers is always deferred to a later invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub batch: BatchNumber,
    pub resume: RowCursor,
}

impl RunPlan {
    /// Derives the next run from the latest committed `BatchCreation`
    /// entry. No entry means batch 1 from the start of the source.
    pub fn next(latest: Option<&LedgerEntry>) -> RunPlan {
        match latest {
            Some(entry) => {
                debug_assert_eq!(entry.category, LedgerCategory::BatchCreation);
                RunPlan {
                    batch: entry.batch_number.next(),
                    resume: entry.last_row_key,
                }
            }
            None => RunPlan {
                batch: BatchNumber::FIRST,
                resume: RowCursor::Start,
            },
        }
    }
}

/// Capacity policy: a batch is full once this many records were routed
/// into it during the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPolicy {
    threshold: usize,
}

impl CapacityPolicy {
    pub fn new(threshold: usize) -> Self {
        CapacityPolicy {
            threshold: threshold.max(1),
        }
    }

    pub fn is_full(&self, routed: usize) -> bool {
        routed >= self.threshold
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
