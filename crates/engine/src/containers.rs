use async_trait::async_trait;
use connectors::{container::ContainerStore, error::StoreError};
use model::{naming::ContainerKey, record::BatchRecord};
use std::path::Path;

/// Durable local container store; one sled tree per container key,
/// keyed by subscriber key so redundant writes overwrite in place.
pub struct SledContainers {
    db: sled::Db,
}

impl SledContainers {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(SledContainers { db })
    }

    fn tree(&self, container: &ContainerKey) -> Result<sled::Tree, StoreError> {
        self.db
            .open_tree(container.as_str())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl ContainerStore for SledContainers {
    async fn upsert(
        &self,
        container: &ContainerKey,
        record: &BatchRecord,
    ) -> Result<(), StoreError> {
        let tree = self.tree(container)?;
        let value = bincode::serialize(record).map_err(|e| StoreError::Write {
            container: container.as_str().to_string(),
            subscriber_key: record.subscriber_key.clone(),
            reason: e.to_string(),
        })?;
        tree.insert(record.subscriber_key.as_bytes(), value)
            .map_err(|e| StoreError::Write {
                container: container.as_str().to_string(),
                subscriber_key: record.subscriber_key.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn len(&self, container: &ContainerKey) -> Result<usize, StoreError> {
        Ok(self.tree(container)?.len())
    }

    async fn truncate(&self, container: &ContainerKey) -> Result<(), StoreError> {
        self.tree(container)?
            .clear()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn records(&self, container: &ContainerKey) -> Result<Vec<BatchRecord>, StoreError> {
        let tree = self.tree(container)?;
        let mut records = Vec::with_capacity(tree.len());
        for item in tree.iter() {
            let (_key, value) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            let record: BatchRecord =
                bincode::deserialize(&value).map_err(|e| StoreError::Backend(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(subscriber_key: &str) -> BatchRecord {
        BatchRecord {
            subscriber_key: subscriber_key.to_string(),
            email_address: Some(format!("{subscriber_key}@example.com")),
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_instead_of_duplicating() {
        let dir = tempdir().unwrap();
        let store = SledContainers::open(dir.path()).unwrap();
        let key = ContainerKey::from("Batch1");

        store.upsert(&key, &record("sub-1")).await.unwrap();
        store.upsert(&key, &record("sub-1")).await.unwrap();
        store.upsert(&key, &record("sub-2")).await.unwrap();

        assert_eq!(store.len(&key).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn truncate_empties_only_the_addressed_container() {
        let dir = tempdir().unwrap();
        let store = SledContainers::open(dir.path()).unwrap();
        let active = ContainerKey::from("Batch1");
        let backup = ContainerKey::from("BkupBatch1");

        store.upsert(&active, &record("sub-1")).await.unwrap();
        store.upsert(&backup, &record("sub-1")).await.unwrap();

        store.truncate(&active).await.unwrap();
        assert_eq!(store.len(&active).await.unwrap(), 0);
        assert_eq!(store.len(&backup).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn records_round_out_what_was_written() {
        let dir = tempdir().unwrap();
        let store = SledContainers::open(dir.path()).unwrap();
        let key = ContainerKey::from("Batch2");

        store.upsert(&key, &record("sub-9")).await.unwrap();
        let records = store.records(&key).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subscriber_key, "sub-9");
        assert_eq!(records[0].email_address.as_deref(), Some("sub-9@example.com"));
    }
}
