use crate::{
    error::ExtractionError,
    ledger::LedgerStore,
    replicator::DualWriter,
    router::{CapacityPolicy, RunPlan},
};
use connectors::{log::DebugLog, source::SubscriberSource};
use model::{
    cursor::RowCursor,
    ledger::{LedgerCategory, LedgerEntry},
    naming::BatchNumber,
};
use std::sync::Arc;
use tracing::{error, info};

/// How an extraction run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A batch was committed to the ledger.
    Committed {
        batch: BatchNumber,
        rows: usize,
        cursor: RowCursor,
        /// Whether the batch stopped at capacity rather than source
        /// exhaustion; a full batch means another run has work to do.
        batch_full: bool,
    },

    /// The source held nothing beyond the committed cursor; nothing was
    /// committed and no batch number was consumed.
    SourceDrained { cursor: RowCursor },

    /// The run failed before commit. The next run resumes from the last
    /// committed cursor and redoes any uncommitted writes.
    Failed { error: String },
}

/// Drives one page-then-write pass over the source and commits a single
/// ledger entry for the batch it filled.
///
/// The commit is the only irreversible step and happens strictly after
/// every write for the run, which is what rules out gaps and
/// double-counting across crashes.
pub struct ExtractionOrchestrator {
    ledger: Arc<dyn LedgerStore>,
    source: Arc<dyn SubscriberSource>,
    writer: DualWriter,
    capacity: CapacityPolicy,
    debug_log: Arc<dyn DebugLog>,
}

impl ExtractionOrchestrator {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        source: Arc<dyn SubscriberSource>,
        writer: DualWriter,
        capacity: CapacityPolicy,
        debug_log: Arc<dyn DebugLog>,
    ) -> Self {
        ExtractionOrchestrator {
            ledger,
            source,
            writer,
            capacity,
            debug_log,
        }
    }

    /// Runs one extraction pass. Errors never escape to the scheduler:
    /// they are logged, the run commits nothing, and the next run
    /// resumes from the last committed cursor.
    pub async fn run(&self) -> RunOutcome {
        match self.execute().await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "extraction run failed, nothing committed");
                self.debug_log
                    .append(&format!("Error in batch extraction: {err}"))
                    .await;
                RunOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    async fn execute(&self) -> Result<RunOutcome, ExtractionError> {
        let latest = self.ledger.latest(LedgerCategory::BatchCreation).await?;
        let plan = RunPlan::next(latest.as_ref());
        info!(batch = %plan.batch, resume = %plan.resume, "starting extraction run");
        self.debug_log
            .append(&format!("Starting point: {}", plan.resume))
            .await;

        let mut cursor = plan.resume;
        let mut routed = 0usize;
        let mut batch_full = false;

        'pages: loop {
            let page = self
                .source
                .fetch_page(cursor)
                .await
                .map_err(|source| ExtractionError::Fetch { cursor, source })?;
            if page.is_empty() {
                break;
            }

            for record in &page.records {
                self.writer
                    .replicate(plan.batch, record)
                    .await
                    .map_err(|source| ExtractionError::Replicate {
                        batch: plan.batch,
                        subscriber_key: record.subscriber_key.clone(),
                        source,
                    })?;

                // The record only counts as consumed once both container
                // writes succeeded.
                cursor = cursor.advance(record.row_key);
                routed += 1;
                if self.capacity.is_full(routed) {
                    batch_full = true;
                    break 'pages;
                }
            }
        }

        if routed == 0 {
            // Committing here would burn a batch number whose container
            // was never written; the cursor is already authoritative.
            info!(cursor = %cursor, "source drained, nothing to commit");
            return Ok(RunOutcome::SourceDrained { cursor });
        }

        let entry = LedgerEntry::creation(plan.batch, cursor);
        self.ledger.append(&entry).await?;
        info!(
            batch = %plan.batch,
            rows = routed,
            cursor = %cursor,
            full = batch_full,
            "batch committed"
        );
        self.debug_log
            .append(&format!(
                "Last processed row in {}: {}",
                entry.batch_label, cursor
            ))
            .await;

        Ok(RunOutcome::Committed {
            batch: plan.batch,
            rows: routed,
            cursor,
            batch_full,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger::memory::MemoryLedger, settings::EngineSettings};
    use async_trait::async_trait;
    use connectors::{
        container::ContainerStore,
        error::StoreError,
        memory::{MemoryContainers, MemoryLog, MemorySource},
    };
    use model::{
        naming::ContainerKey,
        record::{BatchRecord, SourceRecord},
    };
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn rows(n: u64) -> Vec<SourceRecord> {
        (1..=n)
            .map(|k| SourceRecord::new(k, format!("sub-{k}"), None))
            .collect()
    }

    fn orchestrator(
        ledger: Arc<MemoryLedger>,
        source: Arc<dyn SubscriberSource>,
        store: Arc<dyn ContainerStore>,
        capacity: usize,
    ) -> ExtractionOrchestrator {
        let settings = EngineSettings::default().with_capacity(capacity);
        ExtractionOrchestrator::new(
            ledger,
            source,
            DualWriter::new(store, settings.naming.clone()),
            CapacityPolicy::new(settings.batch_capacity),
            Arc::new(MemoryLog::new()),
        )
    }

    #[tokio::test]
    async fn threshold_rollover_stops_after_exactly_three_records() {
        let ledger = Arc::new(MemoryLedger::new());
        let store = Arc::new(MemoryContainers::new());
        let source = Arc::new(MemorySource::new(rows(7), 5));

        let outcome = orchestrator(ledger.clone(), source.clone(), store.clone(), 3)
            .run()
            .await;
        assert_eq!(
            outcome,
            RunOutcome::Committed {
                batch: BatchNumber(1),
                rows: 3,
                cursor: RowCursor::At(3),
                batch_full: true,
            }
        );

        // The next run must resume at row 4 into batch 2.
        let outcome = orchestrator(ledger.clone(), source, store, 3).run().await;
        assert_eq!(
            outcome,
            RunOutcome::Committed {
                batch: BatchNumber(2),
                rows: 3,
                cursor: RowCursor::At(6),
                batch_full: true,
            }
        );
    }

    #[tokio::test]
    async fn drained_source_commits_nothing() {
        let ledger = Arc::new(MemoryLedger::new());
        let store = Arc::new(MemoryContainers::new());
        let source = Arc::new(MemorySource::new(Vec::new(), 5));

        let outcome = orchestrator(ledger.clone(), source, store, 3).run().await;
        assert_eq!(
            outcome,
            RunOutcome::SourceDrained {
                cursor: RowCursor::Start
            }
        );
        assert!(ledger.entries().await.is_empty());
    }

    /// Store that starts failing after a fixed number of writes.
    struct FlakyStore {
        inner: MemoryContainers,
        writes: AtomicUsize,
        fail_from: usize,
    }

    #[async_trait]
    impl ContainerStore for FlakyStore {
        async fn upsert(
            &self,
            container: &ContainerKey,
            record: &BatchRecord,
        ) -> Result<(), StoreError> {
            if self.writes.fetch_add(1, Ordering::SeqCst) >= self.fail_from {
                return Err(StoreError::Write {
                    container: container.as_str().to_string(),
                    subscriber_key: record.subscriber_key.clone(),
                    reason: "simulated outage".into(),
                });
            }
            self.inner.upsert(container, record).await
        }

        async fn len(&self, container: &ContainerKey) -> Result<usize, StoreError> {
            self.inner.len(container).await
        }

        async fn truncate(&self, container: &ContainerKey) -> Result<(), StoreError> {
            self.inner.truncate(container).await
        }

        async fn records(&self, container: &ContainerKey) -> Result<Vec<BatchRecord>, StoreError> {
            self.inner.records(container).await
        }
    }

    #[tokio::test]
    async fn write_failure_mid_page_commits_nothing_and_the_retry_completes() {
        let ledger = Arc::new(MemoryLedger::new());
        let source = Arc::new(MemorySource::new(rows(5), 5));
        // Three dual-writes (six upserts) succeed, then the store fails
        // partway through the page.
        let store = Arc::new(FlakyStore {
            inner: MemoryContainers::new(),
            writes: AtomicUsize::new(0),
            fail_from: 6,
        });

        let outcome = orchestrator(ledger.clone(), source.clone(), store, 100)
            .run()
            .await;
        assert!(matches!(outcome, RunOutcome::Failed { .. }));
        assert!(ledger.entries().await.is_empty());

        // Next run re-fetches the same page from the committed cursor
        // and finishes the batch.
        let store = Arc::new(MemoryContainers::new());
        let outcome = orchestrator(ledger.clone(), source, store.clone(), 100)
            .run()
            .await;
        assert_eq!(
            outcome,
            RunOutcome::Committed {
                batch: BatchNumber(1),
                rows: 5,
                cursor: RowCursor::At(5),
                batch_full: false,
            }
        );
    }
}
