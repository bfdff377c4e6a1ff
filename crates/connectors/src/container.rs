use crate::error::StoreError;
use async_trait::async_trait;
use model::{naming::ContainerKey, record::BatchRecord};

/// A named, keyed batch container.
///
/// Containers are provisioned externally before extraction references
/// them; writes are keyed by `subscriber_key`, so re-writing the same
/// record is an overwrite rather than a duplicate row. That idempotence
/// is what makes at-least-once re-processing of a page safe.
#[async_trait]
pub trait ContainerStore: Send + Sync {
    /// Inserts or overwrites by subscriber key.
    async fn upsert(&self, container: &ContainerKey, record: &BatchRecord)
    -> Result<(), StoreError>;

    /// Number of records currently in the container.
    async fn len(&self, container: &ContainerKey) -> Result<usize, StoreError>;

    /// Removes every record, keeping the container itself. A no-op on an
    /// already-empty container.
    async fn truncate(&self, container: &ContainerKey) -> Result<(), StoreError>;

    /// Snapshot of the container's records, unordered.
    async fn records(&self, container: &ContainerKey) -> Result<Vec<BatchRecord>, StoreError>;
}
