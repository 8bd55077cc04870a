//! Credential store error types.

use thiserror::Error;

/// Credential store error variants.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("failed to access credential store: {0}")]
    AccessFailed(String),

    #[error("failed to write credential: {0}")]
    WriteFailed(String),

    #[error("credential store is corrupt: {0}")]
    Corrupt(String),
}
