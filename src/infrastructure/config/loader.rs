use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Default project-local config file.
pub const DEFAULT_CONFIG_PATH: &str = ".drover/config.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    MissingConfigFile(String),

    #[error("Unknown profile: {0}. Define it in the config file")]
    UnknownProfile(String),

    #[error("Invalid max_concurrency: {0}. Must be at least 1")]
    InvalidMaxConcurrency(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid drain max_attempts: {0}. Must be at least 1")]
    InvalidDrainAttempts(u32),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with named-profile merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the named profile.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. The selected profile's table in the config file (top-level YAML
    ///    keys are profile names)
    /// 3. Environment variables (`DROVER_*` prefix, `__` nesting separator)
    ///
    /// `config_file` of `None` means the project-local default path, which
    /// may be absent; a path given explicitly must exist. Requesting a
    /// profile the file does not define is an error, except `default`,
    /// which works from built-in defaults alone.
    pub fn load(profile: &str, config_file: Option<&Path>) -> Result<Config> {
        let path: &Path = config_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        if config_file.is_some() && !path.exists() {
            return Err(ConfigError::MissingConfigFile(path.display().to_string()).into());
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            // Top-level keys in the file are profile names.
            .merge(Yaml::file(path).nested())
            // Env wins over every profile.
            .merge(Env::prefixed("DROVER_").split("__").global());

        if profile != "default" && !figment.profiles().any(|p| p.as_str() == profile) {
            return Err(ConfigError::UnknownProfile(profile.to_string()).into());
        }

        let config: Config = figment
            .select(profile.to_string())
            .extract()
            .with_context(|| format!("Failed to extract configuration for profile '{profile}'"))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.max_concurrency == 0 {
            return Err(ConfigError::InvalidMaxConcurrency(config.max_concurrency));
        }

        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        if config.drain.max_attempts == 0 {
            return Err(ConfigError::InvalidDrainAttempts(config.drain.max_attempts));
        }

        if config.pid_file_path.is_none() && config.pid_dir.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "pid_dir cannot be empty without an explicit pid_file_path".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{yaml}").expect("write config");
        file.flush().expect("flush config");
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.database.path, ".drover/queue.db");
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_load_profile_from_file() {
        let file = write_config(
            "default:\n  max_concurrency: 2\nmailers:\n  max_concurrency: 8\n  poll_interval_micros: 50000\n  database:\n    path: /custom/mailers.db\n",
        );

        let config = ConfigLoader::load("mailers", Some(file.path())).expect("load");
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.poll_interval_micros, 50_000);
        assert_eq!(config.database.path, "/custom/mailers.db");
        // Unset fields come from defaults.
        assert_eq!(config.drain.max_attempts, 5);

        let config = ConfigLoader::load("default", Some(file.path())).expect("load");
        assert_eq!(config.max_concurrency, 2);
    }

    #[test]
    fn test_unknown_profile_is_an_error() {
        let file = write_config("default:\n  max_concurrency: 2\n");

        let err = ConfigLoader::load("nope", Some(file.path())).expect_err("should fail");
        let config_err = err.downcast_ref::<ConfigError>().expect("ConfigError");
        assert!(matches!(config_err, ConfigError::UnknownProfile(p) if p == "nope"));
    }

    #[test]
    fn test_default_profile_without_file() {
        // No config file anywhere: defaults carry the default profile.
        let config = ConfigLoader::load("default", None).expect("load");
        assert_eq!(config.max_concurrency, 4);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = ConfigLoader::load("default", Some(Path::new("/nonexistent/drover.yaml")))
            .expect_err("should fail");
        let config_err = err.downcast_ref::<ConfigError>().expect("ConfigError");
        assert!(matches!(config_err, ConfigError::MissingConfigFile(_)));
    }

    #[test]
    fn test_env_override_wins_over_profile() {
        let file = write_config("default:\n  max_concurrency: 2\n");

        temp_env::with_vars(
            [
                ("DROVER_MAX_CONCURRENCY", Some("9")),
                ("DROVER_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::load("default", Some(file.path())).expect("load");
                assert_eq!(config.max_concurrency, 9);
                assert_eq!(config.logging.level, "debug");
            },
        );
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let config = Config {
            max_concurrency: 0,
            ..Config::default()
        };

        let result = ConfigLoader::validate(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidMaxConcurrency(0)
        ));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = String::new();

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result.unwrap_err(), ConfigError::EmptyDatabasePath));
    }

    #[test]
    fn test_validate_zero_drain_attempts() {
        let mut config = Config::default();
        config.drain.max_attempts = 0;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidDrainAttempts(0)
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        let result = ConfigLoader::validate(&config);
        match result.unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        let result = ConfigLoader::validate(&config);
        match result.unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_empty_pid_dir_without_explicit_path() {
        let mut config = Config::default();
        config.pid_dir = String::new();
        assert!(ConfigLoader::validate(&config).is_err());

        config.pid_file_path = Some("/run/drover.pid".to_string());
        assert!(ConfigLoader::validate(&config).is_ok());
    }
}
