use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
/// (`DIGESTER_COLLECTION__MAX_CONCURRENT` style, double underscore between
/// section and key).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("DIGESTER_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[collection]
max_concurrent = 4

[summarization]
max_attempts = 5
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.collection.max_concurrent, 4);
        assert_eq!(config.summarization.max_attempts, 5);
        assert_eq!(config.progress.min_publish_interval_ms, 200);
    }

    #[test]
    fn test_load_config_from_empty_str() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.collection.max_concurrent, 8);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[collection]
max_concurrent = 2
idle_poll_interval_ms = 50

[progress]
min_publish_interval_ms = 100
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.collection.max_concurrent, 2);
        assert_eq!(config.collection.idle_poll_interval_ms, 50);
        assert_eq!(config.progress.min_publish_interval_ms, 100);
    }

    #[test]
    fn test_load_config_bad_toml() {
        let result = load_config_from_str("[collection\nmax = ");
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }
}
