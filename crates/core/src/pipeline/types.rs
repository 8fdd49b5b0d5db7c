//! Pipeline-level types and errors.

use serde::Serialize;

use crate::item::StoreError;

/// Aggregate outcome counters for a pipeline run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PipelineStatistics {
    /// Registered items.
    pub total: u64,
    /// Items that finished collection successfully.
    pub collected: u64,
    /// Items summarized successfully.
    pub summarized: u64,
    /// Items that failed in either stage.
    pub failed: u64,
    /// Items whose every part came from a collector cache.
    pub reused: u64,
}

/// Error type for pipeline lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Registration is only allowed before the pipeline starts.
    #[error("Pipeline already started")]
    AlreadyStarted,

    #[error(transparent)]
    Store(#[from] StoreError),
}
