//! Token storage port definition.

use async_trait::async_trait;

use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;

/// Port for durable token persistence under a single fixed key.
#[async_trait]
pub trait TokenStoragePort: Send + Sync {
    /// Retrieves stored token.
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError>;

    /// Stores token, replacing any previous one.
    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError>;

    /// Deletes stored token. Succeeds when nothing is stored.
    async fn delete_token(&self) -> Result<(), AuthError>;

    /// Checks if token exists.
    async fn has_token(&self) -> Result<bool, AuthError> {
        Ok(self.get_token().await?.is_some())
    }
}
