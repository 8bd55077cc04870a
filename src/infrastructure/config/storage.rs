use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory available for this user")]
    ConfigDirNotFound,
    #[error("config file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write default config: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Locates `config.toml` and reads it, seeding defaults on first run.
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Uses the platform configuration directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigDirNotFound` when no home directory is known.
    pub fn discover() -> Result<Self, ConfigError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::with_dir(dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    #[must_use]
    pub const fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn resolve_path(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(|| self.dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// Reads the configuration.
    ///
    /// A missing file is created with defaults. A file that does not parse is
    /// left untouched and defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the defaults cannot be written.
    pub fn load(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = self.resolve_path(path_override);

        if !path.exists() {
            info!(path = %path.display(), "No config file, writing defaults");
            let config = AppConfig::default();
            Self::write_defaults(&path, &config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => {
                debug!(path = %path.display(), "Config loaded");
                Ok(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config file is malformed, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    fn write_defaults(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
        let dir = path
            .parent()
            .ok_or_else(|| std::io::Error::other("config path has no parent directory"))?;
        fs::create_dir_all(dir)?;

        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(toml::to_string_pretty(config)?.as_bytes())?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
