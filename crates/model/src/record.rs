use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest subscriber key the platform's container schema accepts.
pub const SUBSCRIBER_KEY_MAX_LEN: usize = 254;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Subscriber key is empty for row {row_key}")]
    EmptySubscriberKey { row_key: u64 },

    #[error("Subscriber key for row {row_key} exceeds {SUBSCRIBER_KEY_MAX_LEN} characters ({len})")]
    SubscriberKeyTooLong { row_key: u64, len: usize },
}

/// A row of the upstream source collection. Owned by the source,
/// read-only to this system.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    /// Strictly increasing, unique ordinal within the source.
    pub row_key: u64,
    pub subscriber_key: String,
    pub email_address: Option<String>,
}

impl SourceRecord {
    pub fn new(
        row_key: u64,
        subscriber_key: impl Into<String>,
        email_address: Option<String>,
    ) -> Self {
        SourceRecord {
            row_key,
            subscriber_key: subscriber_key.into(),
            email_address,
        }
    }

    /// Checks the bounds the container schema enforces on write.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.subscriber_key.is_empty() {
            return Err(RecordError::EmptySubscriberKey {
                row_key: self.row_key,
            });
        }
        let len = self.subscriber_key.chars().count();
        if len > SUBSCRIBER_KEY_MAX_LEN {
            return Err(RecordError::SubscriberKeyTooLong {
                row_key: self.row_key,
                len,
            });
        }
        Ok(())
    }

    /// The pair materialized into batch containers; the row key stays
    /// behind in the source.
    pub fn to_batch_record(&self) -> BatchRecord {
        BatchRecord {
            subscriber_key: self.subscriber_key.clone(),
            email_address: self.email_address.clone(),
        }
    }
}

/// What lands in a batch container, keyed by subscriber.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatchRecord {
    pub subscriber_key: String,
    pub email_address: Option<String>,
}
