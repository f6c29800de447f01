use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for drover.
///
/// One instance describes one named profile; the loader selects the
/// profile and merges it over these defaults. Immutable for the life of
/// the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Maximum number of concurrently running worker processes (>= 1)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Sleep between dispatch polls when idle or saturated, in microseconds
    #[serde(default = "default_poll_interval_micros")]
    pub poll_interval_micros: u64,

    /// Directory for the pid file when no explicit path is given
    #[serde(default = "default_pid_dir")]
    pub pid_dir: String,

    /// Explicit pid file path; overrides the derived per-profile path
    #[serde(default)]
    pub pid_file_path: Option<String>,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Shutdown drain configuration
    #[serde(default)]
    pub drain: DrainConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

const fn default_max_concurrency() -> usize {
    4
}

const fn default_poll_interval_micros() -> u64 {
    200_000
}

fn default_pid_dir() -> String {
    "/tmp".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            poll_interval_micros: default_poll_interval_micros(),
            pid_dir: default_pid_dir(),
            pid_file_path: None,
            database: DatabaseConfig::default(),
            drain: DrainConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Pid file path for the given profile.
    ///
    /// An explicit `pid_file_path` wins; otherwise the path is derived as
    /// `<pid_dir>/drover.<profile>.pid` so profiles never collide.
    pub fn pid_file(&self, profile: &str) -> PathBuf {
        match &self.pid_file_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.pid_dir).join(format!("drover.{profile}.pid")),
        }
    }

    /// Poll sleep as a [`Duration`].
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_micros(self.poll_interval_micros)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to the `SQLite` database file holding the task queue
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".drover/queue.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Shutdown drain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DrainConfig {
    /// Signal passes before giving up on stuck workers (>= 1)
    #[serde(default = "default_drain_max_attempts")]
    pub max_attempts: u32,

    /// Sleep between signal passes, in milliseconds
    #[serde(default = "default_drain_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

const fn default_drain_max_attempts() -> u32 {
    5
}

const fn default_drain_retry_delay_ms() -> u64 {
    1000
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_drain_max_attempts(),
            retry_delay_ms: default_drain_retry_delay_ms(),
        }
    }
}

impl DrainConfig {
    /// Retry delay as a [`Duration`].
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for daemon log files (stdio is detached while daemonized)
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_log_dir() -> String {
    ".drover/logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.poll_interval_micros, 200_000);
        assert_eq!(config.drain.max_attempts, 5);
        assert_eq!(config.drain.retry_delay_ms, 1000);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_pid_file_derived_from_profile() {
        let config = Config::default();
        assert_eq!(
            config.pid_file("default"),
            PathBuf::from("/tmp/drover.default.pid")
        );
        assert_eq!(
            config.pid_file("mailers"),
            PathBuf::from("/tmp/drover.mailers.pid")
        );
    }

    #[test]
    fn test_explicit_pid_file_wins() {
        let config = Config {
            pid_file_path: Some("/var/run/queue.pid".to_string()),
            ..Config::default()
        };
        assert_eq!(config.pid_file("default"), PathBuf::from("/var/run/queue.pid"));
    }

    #[test]
    fn test_durations() {
        let config = Config {
            poll_interval_micros: 1500,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_micros(1500));
        assert_eq!(config.drain.retry_delay(), Duration::from_millis(1000));
    }
}
