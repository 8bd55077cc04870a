//! Authentication error types.

use thiserror::Error;

/// Fallback message shown when the auth service gives no reason.
pub const GENERIC_LOGIN_FAILURE: &str = "Login failed";

/// Authentication error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum AuthError {
    #[error("invalid token format: {reason}")]
    InvalidTokenFormat { reason: String },

    #[error("invalid token claims: {reason}")]
    InvalidClaims { reason: String },

    #[error("login rejected by auth service (HTTP {status}){}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    LoginRejected { status: u16, message: Option<String> },

    #[error("failed to retrieve stored token: {message}")]
    TokenRetrievalFailed { message: String },

    #[error("failed to store token: {message}")]
    TokenStorageFailed { message: String },

    #[error("network error during authentication: {message}")]
    NetworkError { message: String },

    #[error("secure storage error: {0}")]
    Secret(#[from] super::SecretError),
}

impl AuthError {
    /// Creates invalid format error.
    #[must_use]
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidTokenFormat {
            reason: reason.into(),
        }
    }

    /// Creates invalid claims error.
    #[must_use]
    pub fn invalid_claims(reason: impl Into<String>) -> Self {
        Self::InvalidClaims {
            reason: reason.into(),
        }
    }

    /// Creates login rejected error.
    #[must_use]
    pub const fn rejected(status: u16, message: Option<String>) -> Self {
        Self::LoginRejected { status, message }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates retrieval failed error.
    #[must_use]
    pub fn retrieval_failed(message: impl Into<String>) -> Self {
        Self::TokenRetrievalFailed {
            message: message.into(),
        }
    }

    /// Creates storage failed error.
    #[must_use]
    pub fn storage_failed(message: impl Into<String>) -> Self {
        Self::TokenStorageFailed {
            message: message.into(),
        }
    }

    /// Returns whether the credential itself could not be decoded or validated.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTokenFormat { .. } | Self::InvalidClaims { .. }
        )
    }

    /// Returns the message suitable for showing to the user after a failed login.
    ///
    /// Only a reason supplied by the auth service is passed through; everything
    /// else collapses to [`GENERIC_LOGIN_FAILURE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::LoginRejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => GENERIC_LOGIN_FAILURE.to_string(),
        }
    }
}
