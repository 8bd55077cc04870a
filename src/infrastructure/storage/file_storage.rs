//! File-based token storage.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::{AuthError, SecretError};
use crate::domain::ports::TokenStoragePort;

/// Default file name inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.toml";

#[derive(Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Token storage in a TOML file, written atomically and readable only by the owner.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Creates storage backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_atomic(path: &Path, content: &str) -> Result<(), SecretError> {
        let parent = path
            .parent()
            .ok_or_else(|| SecretError::WriteFailed("invalid session path".to_string()))?;
        std::fs::create_dir_all(parent).map_err(|e| SecretError::WriteFailed(e.to_string()))?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| SecretError::WriteFailed(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp_file
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(|e| SecretError::WriteFailed(e.to_string()))?;
        }

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| SecretError::WriteFailed(e.to_string()))?;
        temp_file
            .persist(path)
            .map_err(|e| SecretError::WriteFailed(e.error.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl TokenStoragePort for FileTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError> {
        debug!(path = %self.path.display(), "Reading session file");

        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session file");
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "Failed to read session file");
                return Err(AuthError::retrieval_failed(e.to_string()));
            }
        };

        let file: SessionFile =
            toml::from_str(&content).map_err(|e| SecretError::Corrupt(e.to_string()))?;
        Ok(AuthToken::new(file.token))
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
        debug!(path = %self.path.display(), "Writing session file");

        let content = toml::to_string(&SessionFile {
            token: token.as_str().to_string(),
        })
        .map_err(|e| AuthError::storage_failed(e.to_string()))?;

        Self::write_atomic(&self.path, &content).inspect_err(|e| {
            warn!(error = %e, "Failed to write session file");
        })?;
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), AuthError> {
        debug!(path = %self.path.display(), "Removing session file");

        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(error = %e, "Failed to remove session file");
                Err(AuthError::storage_failed(e.to_string()))
            }
        }
    }
}
