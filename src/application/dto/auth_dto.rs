//! Authentication DTOs.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::entities::{AuthToken, SessionClaims};

/// Login form data. The password buffer is wiped on drop.
#[derive(Clone)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: Zeroizing<String>,
}

impl LoginRequest {
    /// Creates new login request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::from_secret(email, Zeroizing::new(password.into()))
    }

    /// Creates a request from a password that is already in a wiped buffer.
    #[must_use]
    pub fn from_secret(email: impl Into<String>, password: Zeroizing<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password,
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A token together with the claims decoded from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    /// The bearer token.
    pub token: AuthToken,
    /// Claims decoded from the token.
    pub claims: SessionClaims,
}

impl AuthenticatedSession {
    /// Decodes claims from a token.
    ///
    /// # Errors
    /// Returns a decode error if the token payload is malformed.
    pub fn from_token(token: AuthToken) -> Result<Self, crate::domain::errors::AuthError> {
        let claims = token.decode_claims()?;
        Ok(Self { token, claims })
    }
}
