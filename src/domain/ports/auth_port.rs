//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;

/// Port for the remote authentication service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchanges an email/password pair for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<AuthToken, AuthError>;
}
