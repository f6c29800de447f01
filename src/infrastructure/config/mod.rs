//! Configuration management infrastructure
//!
//! Named-profile configuration using figment:
//! - YAML file loading (top-level keys are profiles)
//! - Environment variable overrides
//! - Configuration validation
//! - Type-safe config structs

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, DEFAULT_CONFIG_PATH};
