//! Top-level pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::coordinator::CollectionConfig;
use crate::progress::ProgressConfig;
use crate::summarizer::SummarizationConfig;

/// Complete pipeline configuration. Every section has defaults, so an empty
/// file (or no file at all) yields a working configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub collection: CollectionConfig,

    #[serde(default)]
    pub summarization: SummarizationConfig,

    #[serde(default)]
    pub progress: ProgressConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_sections() {
        let config = Config::default();
        assert_eq!(config.collection.max_concurrent, 8);
        assert_eq!(config.summarization.max_attempts, 3);
        assert_eq!(config.progress.min_publish_interval_ms, 200);
    }
}
