//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::entities::RouteTable;
use crate::infrastructure::storage::SESSION_FILE_NAME;

pub(crate) const APP_NAME: &str = "shopgate";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

/// Renders as an `EnvFilter` directive.
impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where the session token is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// System keyring.
    #[default]
    Keyring,
    /// TOML file in the data directory.
    File,
}

/// Storefront API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Token persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Session file path for the file backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Returns effective session file path.
    #[must_use]
    pub fn effective_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
                .map(|dirs| dirs.data_dir().join(SESSION_FILE_NAME))
        })
    }
}

/// Application configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Token persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Route table consulted before each navigation.
    #[serde(default)]
    pub routes: RouteTable,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_url) = &args.api_url {
            self.api.base_url.clone_from(api_url);
        }
        if let Some(backend) = args.storage {
            self.storage.backend = backend;
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("shopgate.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
            log_level = "debug"

            [api]
            base_url = "https://shop.example.com"

            [storage]
            backend = "file"
            path = "/tmp/shopgate/session.toml"

            [routes]
            home_path = "/start"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.api.base_url, "https://shop.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(
            config.storage.effective_path(),
            Some(PathBuf::from("/tmp/shopgate/session.toml"))
        );
        assert_eq!(config.routes.home_path, "/start");
        assert_eq!(config.routes.login_path, "/admin/login");
        assert!(config.routes.resolve("/admin/dashboard").is_some());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.storage.backend, StorageBackend::Keyring);
        assert!(config.routes.resolve("/admin/profile").is_some());
    }

    #[test]
    fn test_merge_with_args() {
        let args = CliArgs::parse_from([
            "shopgate",
            "--api-url",
            "http://127.0.0.1:8080",
            "--storage",
            "file",
            "--log-level",
            "trace",
            "status",
        ]);
        let mut config = AppConfig::default();

        config.merge_with_args(&args);

        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.log_level, LogLevel::Trace);
    }
}
