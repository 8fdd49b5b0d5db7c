//! Summarization worker configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the summarization worker's retry behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationConfig {
    /// Maximum attempts per job before the item is failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds); doubles per attempt.
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Upper bound on any single backoff delay (milliseconds).
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay() -> u64 {
    500
}

fn default_max_delay() -> u64 {
    10_000 // 10 seconds
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl SummarizationConfig {
    /// Backoff delay after the given failed attempt (1-indexed):
    /// base, 2x base, 4x base, ... capped at `max_delay_ms`.
    pub fn backoff_delay_ms(&self, attempt: u32) -> u64 {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SummarizationConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 10_000);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = SummarizationConfig {
            max_attempts: 5,
            base_delay_ms: 500,
            max_delay_ms: 3_000,
        };
        assert_eq!(config.backoff_delay_ms(1), 500);
        assert_eq!(config.backoff_delay_ms(2), 1_000);
        assert_eq!(config.backoff_delay_ms(3), 2_000);
        assert_eq!(config.backoff_delay_ms(4), 3_000); // capped
        assert_eq!(config.backoff_delay_ms(10), 3_000);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: SummarizationConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            max_attempts = 5
            base_delay_ms = 100
            max_delay_ms = 1000
        "#;
        let config: SummarizationConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.base_delay_ms, 100);
        assert_eq!(config.max_delay_ms, 1000);
    }
}
