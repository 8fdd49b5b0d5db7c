//! Collection stage configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the collection worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Upper bound on items being collected at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// How long an idle worker sleeps before looking for work again
    /// (milliseconds).
    #[serde(default = "default_idle_poll_interval")]
    pub idle_poll_interval_ms: u64,
}

fn default_max_concurrent() -> usize {
    8
}

fn default_idle_poll_interval() -> u64 {
    100
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            idle_poll_interval_ms: default_idle_poll_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CollectionConfig::default();
        assert_eq!(config.max_concurrent, 8);
        assert_eq!(config.idle_poll_interval_ms, 100);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CollectionConfig = toml::from_str("max_concurrent = 2").unwrap();
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.idle_poll_interval_ms, 100);
    }
}
