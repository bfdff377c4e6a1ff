use connectors::{
    container::ContainerStore,
    delete::StoreBackedDeleter,
    memory::{FixedTokenProvider, MemoryContainers, MemoryLog, MemorySource},
    source::SubscriberSource,
};
use engine::{
    delete::{DeletionOrchestrator, DeletionOutcome},
    extract::{ExtractionOrchestrator, RunOutcome},
    ledger::memory::MemoryLedger,
    replicator::DualWriter,
    router::CapacityPolicy,
    settings::EngineSettings,
};
use model::{
    naming::{BatchNumber, NamingScheme},
    record::SourceRecord,
};
use std::sync::Arc;

fn rows(n: u64) -> Vec<SourceRecord> {
    (1..=n)
        .map(|k| SourceRecord::new(k, format!("sub-{k}"), None))
        .collect()
}

async fn extract_all(
    ledger: Arc<MemoryLedger>,
    store: Arc<dyn ContainerStore>,
    total_rows: u64,
    capacity: usize,
) {
    let settings = EngineSettings::default().with_capacity(capacity);
    let source: Arc<dyn SubscriberSource> = Arc::new(MemorySource::new(rows(total_rows), 10));
    loop {
        let orchestrator = ExtractionOrchestrator::new(
            ledger.clone(),
            source.clone(),
            DualWriter::new(store.clone(), settings.naming.clone()),
            CapacityPolicy::new(settings.batch_capacity),
            Arc::new(MemoryLog::new()),
        );
        match orchestrator.run().await {
            RunOutcome::Committed { .. } => {}
            RunOutcome::SourceDrained { .. } => return,
            RunOutcome::Failed { error } => panic!("extraction failed: {error}"),
        }
    }
}

fn deletion(ledger: Arc<MemoryLedger>, store: Arc<dyn ContainerStore>) -> DeletionOrchestrator {
    DeletionOrchestrator::new(
        ledger,
        Arc::new(FixedTokenProvider::default()),
        Arc::new(StoreBackedDeleter::new(store)),
        NamingScheme::default(),
        Arc::new(MemoryLog::new()),
    )
}

#[tokio::test]
async fn deletion_empties_the_active_container_and_spares_the_backup() {
    let ledger = Arc::new(MemoryLedger::new());
    let store: Arc<dyn ContainerStore> = Arc::new(MemoryContainers::new());
    let naming = NamingScheme::default();

    extract_all(ledger.clone(), store.clone(), 6, 3).await;

    let outcome = deletion(ledger.clone(), store.clone()).run().await;
    assert_eq!(
        outcome,
        DeletionOutcome::Committed {
            batch: BatchNumber(1),
            container: naming.active(BatchNumber(1)),
        }
    );

    assert_eq!(store.len(&naming.active(BatchNumber(1))).await.unwrap(), 0);
    assert_eq!(store.len(&naming.backup(BatchNumber(1))).await.unwrap(), 3);
    // Batch 2 is untouched until its own run retires it.
    assert_eq!(store.len(&naming.active(BatchNumber(2))).await.unwrap(), 3);
}

#[tokio::test]
async fn scheduled_runs_retire_batches_oldest_first_then_idle() {
    let ledger = Arc::new(MemoryLedger::new());
    let store: Arc<dyn ContainerStore> = Arc::new(MemoryContainers::new());

    extract_all(ledger.clone(), store.clone(), 9, 3).await;

    let mut retired = Vec::new();
    loop {
        match deletion(ledger.clone(), store.clone()).run().await {
            DeletionOutcome::Committed { batch, .. } => retired.push(batch),
            DeletionOutcome::NothingPending => break,
            DeletionOutcome::Failed { error, .. } => panic!("deletion failed: {error}"),
        }
    }
    assert_eq!(
        retired,
        vec![BatchNumber(1), BatchNumber(2), BatchNumber(3)]
    );

    // Nothing left to delete on the next schedule either.
    assert_eq!(
        deletion(ledger, store).run().await,
        DeletionOutcome::NothingPending
    );
}

#[tokio::test]
async fn deleting_an_already_empty_container_still_commits() {
    let ledger = Arc::new(MemoryLedger::new());
    let store: Arc<dyn ContainerStore> = Arc::new(MemoryContainers::new());
    let naming = NamingScheme::default();

    extract_all(ledger.clone(), store.clone(), 2, 100).await;

    // The container was emptied out-of-band before the scheduled
    // deletion ran.
    store.truncate(&naming.active(BatchNumber(1))).await.unwrap();

    let outcome = deletion(ledger.clone(), store.clone()).run().await;
    assert_eq!(
        outcome,
        DeletionOutcome::Committed {
            batch: BatchNumber(1),
            container: naming.active(BatchNumber(1)),
        }
    );
    assert_eq!(store.len(&naming.backup(BatchNumber(1))).await.unwrap(), 2);
}
