use crate::{
    container::ContainerStore,
    error::{ProviderError, StoreError},
    rest::auth::AccessToken,
};
use async_trait::async_trait;
use model::naming::ContainerKey;
use std::sync::Arc;
use tracing::info;

/// What the provider reported back for a bulk-delete request. The
/// operation itself completes asynchronously on the provider side; a
/// clean acceptance is all this system ever observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub has_errors: bool,
}

/// Asynchronous bulk delete of a container's contents.
#[async_trait]
pub trait ContactDeleter: Send + Sync {
    async fn delete_container(
        &self,
        token: &AccessToken,
        container: &ContainerKey,
    ) -> Result<DeleteOutcome, ProviderError>;
}

/// Deleter that truncates a local container store. Stands in for the
/// provider API in tests and local CLI runs; like the provider, it
/// accepts a delete of an already-empty container.
pub struct StoreBackedDeleter {
    store: Arc<dyn ContainerStore>,
}

impl StoreBackedDeleter {
    pub fn new(store: Arc<dyn ContainerStore>) -> Self {
        StoreBackedDeleter { store }
    }
}

#[async_trait]
impl ContactDeleter for StoreBackedDeleter {
    async fn delete_container(
        &self,
        _token: &AccessToken,
        container: &ContainerKey,
    ) -> Result<DeleteOutcome, ProviderError> {
        match self.store.truncate(container).await {
            Ok(()) => {
                info!(container = %container, "truncated local container");
                Ok(DeleteOutcome { has_errors: false })
            }
            // A container nobody wrote to is already empty.
            Err(StoreError::MissingContainer(_)) => Ok(DeleteOutcome { has_errors: false }),
            Err(err) => Err(ProviderError::Backend(err.to_string())),
        }
    }
}
