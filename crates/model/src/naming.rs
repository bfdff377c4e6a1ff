use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential batch identity, starting at 1.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchNumber(pub u64);

impl BatchNumber {
    pub const FIRST: BatchNumber = BatchNumber(1);

    pub fn next(self) -> BatchNumber {
        BatchNumber(self.0 + 1)
    }

    /// Ledger label for this batch, e.g. `S-12`.
    pub fn label(self) -> String {
        format!("S-{}", self.0)
    }
}

impl fmt::Display for BatchNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of a named batch container, e.g. `Batch12`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerKey(String);

impl ContainerKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerKey {
    fn from(key: &str) -> Self {
        ContainerKey(key.to_string())
    }
}

impl From<String> for ContainerKey {
    fn from(key: String) -> Self {
        ContainerKey(key)
    }
}

/// Single source of truth for container naming.
///
/// Provisioning, extraction, and deletion must all derive keys through
/// the same scheme; building keys by hand elsewhere risks addressing the
/// wrong container.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NamingScheme {
    pub active_prefix: String,
    pub backup_prefix: String,
}

impl Default for NamingScheme {
    fn default() -> Self {
        NamingScheme {
            active_prefix: "Batch".to_string(),
            backup_prefix: "BkupBatch".to_string(),
        }
    }
}

impl NamingScheme {
    pub fn new(active_prefix: impl Into<String>, backup_prefix: impl Into<String>) -> Self {
        NamingScheme {
            active_prefix: active_prefix.into(),
            backup_prefix: backup_prefix.into(),
        }
    }

    /// Key of the sendable container that deletion later retires.
    pub fn active(&self, batch: BatchNumber) -> ContainerKey {
        ContainerKey(format!("{}{}", self.active_prefix, batch.0))
    }

    /// Key of the archival copy. Never deleted by this system.
    pub fn backup(&self, batch: BatchNumber) -> ContainerKey {
        ContainerKey(format!("{}{}", self.backup_prefix, batch.0))
    }
}
