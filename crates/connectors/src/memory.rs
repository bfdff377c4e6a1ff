//! In-memory doubles for the platform seams, used by tests and as
//! reference implementations of the trait contracts.

use crate::{
    container::ContainerStore,
    error::{ProviderError, SourceError, StoreError},
    log::DebugLog,
    rest::auth::{AccessToken, TokenProvider},
    source::SubscriberSource,
};
use async_trait::async_trait;
use model::{
    cursor::RowCursor,
    naming::ContainerKey,
    page::Page,
    record::{BatchRecord, SourceRecord},
};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

/// Source backed by a sorted vector, paged like the provider's keyed
/// retrieve: everything strictly beyond the cursor, capped at
/// `page_size`.
pub struct MemorySource {
    rows: Vec<SourceRecord>,
    page_size: usize,
}

impl MemorySource {
    pub fn new(mut rows: Vec<SourceRecord>, page_size: usize) -> Self {
        rows.sort_by_key(|r| r.row_key);
        MemorySource {
            rows,
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl SubscriberSource for MemorySource {
    async fn fetch_page(&self, cursor: RowCursor) -> Result<Page, SourceError> {
        let records = self
            .rows
            .iter()
            .filter(|r| cursor.is_beyond(r.row_key))
            .take(self.page_size)
            .cloned()
            .collect();
        Ok(Page::new(records))
    }
}

/// Container store over nested maps; the inner map is keyed by
/// subscriber key, which gives the upsert idempotence for free.
#[derive(Default)]
pub struct MemoryContainers {
    containers: Mutex<HashMap<String, BTreeMap<String, BatchRecord>>>,
}

impl MemoryContainers {
    pub fn new() -> Self {
        MemoryContainers::default()
    }
}

#[async_trait]
impl ContainerStore for MemoryContainers {
    async fn upsert(
        &self,
        container: &ContainerKey,
        record: &BatchRecord,
    ) -> Result<(), StoreError> {
        let mut containers = self.containers.lock().await;
        containers
            .entry(container.as_str().to_string())
            .or_default()
            .insert(record.subscriber_key.clone(), record.clone());
        Ok(())
    }

    async fn len(&self, container: &ContainerKey) -> Result<usize, StoreError> {
        let containers = self.containers.lock().await;
        Ok(containers
            .get(container.as_str())
            .map(|c| c.len())
            .unwrap_or(0))
    }

    async fn truncate(&self, container: &ContainerKey) -> Result<(), StoreError> {
        let mut containers = self.containers.lock().await;
        if let Some(records) = containers.get_mut(container.as_str()) {
            records.clear();
        }
        Ok(())
    }

    async fn records(&self, container: &ContainerKey) -> Result<Vec<BatchRecord>, StoreError> {
        let containers = self.containers.lock().await;
        Ok(containers
            .get(container.as_str())
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// Token provider that always yields the same token. For tests and
/// local runs where no identity provider is in play.
pub struct FixedTokenProvider {
    token: AccessToken,
}

impl FixedTokenProvider {
    pub fn new(token: AccessToken) -> Self {
        FixedTokenProvider { token }
    }
}

impl Default for FixedTokenProvider {
    fn default() -> Self {
        FixedTokenProvider {
            token: AccessToken::new("local", "http://localhost/"),
        }
    }
}

#[async_trait]
impl TokenProvider for FixedTokenProvider {
    async fn request_token(&self) -> Result<AccessToken, ProviderError> {
        Ok(self.token.clone())
    }
}

/// Log sink that keeps entries in memory for assertions.
#[derive(Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        MemoryLog::default()
    }

    pub async fn entries(&self) -> Vec<String> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl DebugLog for MemoryLog {
    async fn append(&self, line: &str) {
        self.entries.lock().await.push(line.to_string());
    }
}
