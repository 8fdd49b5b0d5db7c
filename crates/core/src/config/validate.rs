use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Collection pool size is not 0
/// - Summarization attempt budget is not 0
/// - Backoff base does not exceed the cap
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.collection.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "collection.max_concurrent cannot be 0".to_string(),
        ));
    }

    if config.summarization.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "summarization.max_attempts cannot be 0".to_string(),
        ));
    }

    if config.summarization.base_delay_ms > config.summarization.max_delay_ms {
        return Err(ConfigError::ValidationError(
            "summarization.base_delay_ms cannot exceed summarization.max_delay_ms".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_workers_fails() {
        let mut config = Config::default();
        config.collection.max_concurrent = 0;
        let result = validate_config(&config);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_attempts_fails() {
        let mut config = Config::default();
        config.summarization.max_attempts = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_backoff_base_above_cap_fails() {
        let mut config = Config::default();
        config.summarization.base_delay_ms = 20_000;
        assert!(validate_config(&config).is_err());
    }
}
