//! Configuration management infrastructure
//!
//! - Hierarchical configuration using figment (defaults, YAML, environment)
//! - Validation
//! - `.env` file editing for the `config` command

pub mod env_file;
pub mod loader;

pub use env_file::{EnvFile, MANAGED_KEYS};
pub use loader::{ConfigError, ConfigLoader, CONFIG_FILE, MAX_TOKEN_LIFETIME_DAYS};
