//! Progress aggregation configuration.

use serde::{Deserialize, Serialize};

/// Configuration for snapshot publication throttling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Minimum interval between published snapshots (milliseconds).
    /// Terminal-state changes bypass the throttle.
    #[serde(default = "default_min_publish_interval")]
    pub min_publish_interval_ms: u64,
}

fn default_min_publish_interval() -> u64 {
    200
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            min_publish_interval_ms: default_min_publish_interval(),
        }
    }
}
