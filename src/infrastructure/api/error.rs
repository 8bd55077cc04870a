use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from authorized API requests.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {message}")]
    Network { message: String },

    #[error("server responded {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    #[error("failed to parse response: {message}")]
    Decode { message: String },

    #[error("failed to create HTTP client: {message}")]
    Client { message: String },
}

impl ApiError {
    /// Whether the server refused the credentials sent.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}
