//! Infrastructure layer with external service adapters.

/// Storefront API client.
pub mod api;
/// Application configuration.
pub mod config;
/// Token storage adapters.
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use config::{AppConfig, CliArgs, Command, ConfigStore, LogLevel, StorageBackend};
#[cfg(feature = "keyring")]
pub use storage::KeyringTokenStorage;
pub use storage::FileTokenStorage;
