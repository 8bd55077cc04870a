use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`.
#[derive(Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Error body returned by the API on failure.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}
