use crate::{error::DeletionError, ledger::LedgerStore};
use connectors::{
    delete::ContactDeleter,
    log::DebugLog,
    rest::auth::TokenProvider,
};
use model::{
    ledger::{LedgerCategory, LedgerEntry},
    naming::{BatchNumber, ContainerKey, NamingScheme},
};
use std::sync::Arc;
use tracing::{error, info};

/// Where a deletion run stood when it ended. Transitions are strictly
/// sequential within one invocation; there is no in-run retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPhase {
    Pending,
    AuthRequested,
    DeleteRequested,
    Committed,
}

/// How a deletion run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The active container was deleted cleanly and the ledger updated.
    Committed {
        batch: BatchNumber,
        container: ContainerKey,
    },

    /// Every created batch is already deleted; nothing to do.
    NothingPending,

    /// The run failed at `phase`; the batch stays pending for the next
    /// run.
    Failed {
        batch: Option<BatchNumber>,
        phase: DeletionPhase,
        error: String,
    },
}

/// Retires the active container of the oldest batch whose extraction is
/// committed but whose deletion is not.
///
/// Only the active container is ever addressed; the backup container is
/// the archival copy and this component never touches it.
pub struct DeletionOrchestrator {
    ledger: Arc<dyn LedgerStore>,
    tokens: Arc<dyn TokenProvider>,
    deleter: Arc<dyn ContactDeleter>,
    naming: NamingScheme,
    debug_log: Arc<dyn DebugLog>,
}

impl DeletionOrchestrator {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        tokens: Arc<dyn TokenProvider>,
        deleter: Arc<dyn ContactDeleter>,
        naming: NamingScheme,
        debug_log: Arc<dyn DebugLog>,
    ) -> Self {
        DeletionOrchestrator {
            ledger,
            tokens,
            deleter,
            naming,
            debug_log,
        }
    }

    /// Runs one deletion pass. Like extraction, failures are log-only:
    /// the batch stays pending and the next scheduled run retries the
    /// whole sequence.
    pub async fn run(&self) -> DeletionOutcome {
        let pending = match self.next_pending().await {
            Ok(Some(batch)) => batch,
            Ok(None) => {
                info!("no pending batches to delete");
                return DeletionOutcome::NothingPending;
            }
            Err(err) => {
                error!(error = %err, "could not determine pending batch");
                self.debug_log
                    .append(&format!("Error in contact deletion: {err}"))
                    .await;
                return DeletionOutcome::Failed {
                    batch: None,
                    phase: DeletionPhase::Pending,
                    error: err.to_string(),
                };
            }
        };

        let mut phase = DeletionPhase::Pending;
        match self.execute(pending, &mut phase).await {
            Ok(container) => DeletionOutcome::Committed {
                batch: pending,
                container,
            },
            Err(err) => {
                error!(
                    batch = %pending,
                    phase = ?phase,
                    error = %err,
                    "deletion run failed, batch stays pending"
                );
                self.debug_log
                    .append(&format!("Error in contact deletion: {err}"))
                    .await;
                DeletionOutcome::Failed {
                    batch: Some(pending),
                    phase,
                    error: err.to_string(),
                }
            }
        }
    }

    /// Oldest batch in a `BatchCreation` entry with no `BatchDeletion`
    /// entry yet, if any.
    async fn next_pending(&self) -> Result<Option<BatchNumber>, DeletionError> {
        let created = match self.ledger.latest(LedgerCategory::BatchCreation).await? {
            Some(entry) => entry.batch_number,
            None => return Ok(None),
        };
        let candidate = match self.ledger.latest(LedgerCategory::BatchDeletion).await? {
            Some(entry) => entry.batch_number.next(),
            None => BatchNumber::FIRST,
        };
        Ok((candidate <= created).then_some(candidate))
    }

    async fn execute(
        &self,
        batch: BatchNumber,
        phase: &mut DeletionPhase,
    ) -> Result<ContainerKey, DeletionError> {
        let container = self.naming.active(batch);
        self.debug_log
            .append(&format!("Batch container key = {container}"))
            .await;

        *phase = DeletionPhase::AuthRequested;
        let token = self.tokens.request_token().await?;

        *phase = DeletionPhase::DeleteRequested;
        let outcome = self.deleter.delete_container(&token, &container).await?;
        if outcome.has_errors {
            return Err(DeletionError::DeletionReported {
                container: container.to_string(),
            });
        }

        self.ledger.append(&LedgerEntry::deletion(batch)).await?;
        *phase = DeletionPhase::Committed;
        info!(batch = %batch, container = %container, "batch deletion committed");
        self.debug_log
            .append(&format!("Clean delete response for {container}"))
            .await;
        Ok(container)
    }
}
