//! Collection coordinator status types.

use serde::Serialize;

/// Point-in-time view of the collection worker pool.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoordinatorStatus {
    pub running: bool,
    /// Workers currently holding a claimed item.
    pub active_workers: usize,
    pub max_concurrent: usize,
}
