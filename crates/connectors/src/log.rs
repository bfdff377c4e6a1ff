use async_trait::async_trait;
use tracing::info;

/// Append-only diagnostic sink, mirroring the platform's debug-log
/// collection. Written by the orchestrators, never read by the engine.
#[async_trait]
pub trait DebugLog: Send + Sync {
    async fn append(&self, line: &str);
}

/// Forwards sink entries into the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

#[async_trait]
impl DebugLog for TracingLog {
    async fn append(&self, line: &str) {
        info!(target: "debug_log", "{line}");
    }
}
