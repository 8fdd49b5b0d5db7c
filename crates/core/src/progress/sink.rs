//! Snapshot publication sinks.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::types::ProgressSnapshot;

/// Error type for snapshot publication.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Receives published progress snapshots.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn publish(&self, snapshot: &ProgressSnapshot) -> Result<(), SinkError>;
}

/// Logs each snapshot through tracing. The default sink.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SnapshotSink for TracingSink {
    async fn publish(&self, snapshot: &ProgressSnapshot) -> Result<(), SinkError> {
        info!(
            total = snapshot.total,
            completed = snapshot.counts.completed,
            failed = snapshot.counts.failed,
            completion_rate = snapshot.completion_rate,
            fully_done = snapshot.fully_done,
            "Pipeline progress"
        );
        Ok(())
    }
}

/// Writes the latest snapshot as JSON to a file, replacing the previous one.
#[derive(Debug)]
pub struct FileSnapshotSink {
    path: PathBuf,
}

impl FileSnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSink for FileSnapshotSink {
    async fn publish(&self, snapshot: &ProgressSnapshot) -> Result<(), SinkError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
