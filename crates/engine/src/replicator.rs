use connectors::{container::ContainerStore, error::StoreError};
use model::{
    naming::{BatchNumber, NamingScheme},
    record::SourceRecord,
};
use std::sync::Arc;

/// Writes each extracted record to the batch's active container and its
/// immutable backup.
///
/// Both writes must succeed before the record counts as consumed; a
/// failure on either side aborts the batch with no ledger commit, so
/// the whole page is redone on the next run. Redoing is safe because
/// container writes are keyed upserts.
pub struct DualWriter {
    store: Arc<dyn ContainerStore>,
    naming: NamingScheme,
}

impl DualWriter {
    pub fn new(store: Arc<dyn ContainerStore>, naming: NamingScheme) -> Self {
        DualWriter { store, naming }
    }

    pub async fn replicate(
        &self,
        batch: BatchNumber,
        record: &SourceRecord,
    ) -> Result<(), StoreError> {
        let payload = record.to_batch_record();
        self.store
            .upsert(&self.naming.active(batch), &payload)
            .await?;
        self.store
            .upsert(&self.naming.backup(batch), &payload)
            .await?;
        Ok(())
    }
}
