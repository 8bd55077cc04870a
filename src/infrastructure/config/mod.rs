//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{ApiConfig, AppConfig, LogLevel, StorageBackend, StorageConfig};
pub use args::{CliArgs, Command, Password};
pub use storage::{ConfigError, ConfigStore};
