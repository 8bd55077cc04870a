//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{AuthenticatedSession, LoginRequest};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, TokenStoragePort};

/// Exchanges credentials for a token, decodes it and persists it.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn TokenStoragePort>,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        storage_port: Arc<dyn TokenStoragePort>,
    ) -> Self {
        Self {
            auth_port,
            storage_port,
        }
    }

    /// Executes login with provided request.
    ///
    /// A token that cannot be decoded is never persisted. A persistence failure
    /// after a successful exchange is logged and does not fail the login.
    ///
    /// # Errors
    /// Returns error if the service rejects the credentials, is unreachable, or
    /// issues a token whose claims cannot be decoded.
    pub async fn execute(&self, request: &LoginRequest) -> Result<AuthenticatedSession, AuthError> {
        debug!(email = %request.email, "Attempting login");

        let token = self
            .auth_port
            .login(&request.email, &request.password)
            .await
            .inspect_err(|e| warn!(error = %e, "Auth service did not issue a token"))?;

        debug!(token = %token, "Token issued, decoding claims");

        let session = AuthenticatedSession::from_token(token)
            .inspect_err(|e| warn!(error = %e, "Issued token could not be decoded"))?;

        info!(
            user_id = %session.claims.subject_id(),
            role = %session.claims.role(),
            "Successfully authenticated"
        );

        match self.storage_port.store_token(&session.token).await {
            Ok(()) => info!("Token persisted"),
            Err(e) => tracing::error!(error = %e, "Failed to persist token"),
        }

        Ok(session)
    }

    /// Deletes the stored token.
    ///
    /// # Errors
    /// Returns error if deletion fails.
    pub async fn delete_token(&self) -> Result<(), AuthError> {
        debug!("Deleting persisted token");
        match self.storage_port.delete_token().await {
            Ok(()) => {
                info!("Persisted token deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to delete persisted token");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AuthToken, fixtures};
    use crate::domain::ports::mocks::{MockAuthPort, MockTokenStorage};

    fn auth_returning(raw: String) -> MockAuthPort {
        let mut auth = MockAuthPort::new();
        auth.expect_login()
            .returning(move |_, _| Ok(AuthToken::new_unchecked(raw.clone())));
        auth
    }

    #[tokio::test]
    async fn test_successful_login() {
        let raw = fixtures::token_for(5, "ada@example.com", "admin");
        let storage_port = Arc::new(MockTokenStorage::new());
        let use_case = LoginUseCase::new(Arc::new(auth_returning(raw.clone())), storage_port.clone());

        let session = use_case
            .execute(&LoginRequest::new("ada@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(session.claims.email(), "ada@example.com");
        assert!(session.claims.is_admin());
        assert_eq!(storage_port.stored().await, Some(raw));
    }

    #[tokio::test]
    async fn test_credentials_forwarded() {
        let mut auth = MockAuthPort::new();
        auth.expect_login()
            .withf(|email, password| {
                email.to_string() == "ada@example.com" && password.to_string() == "s3cret"
            })
            .times(1)
            .returning(|_, _| Err(AuthError::rejected(401, Some("bad creds".to_string()))));

        let use_case = LoginUseCase::new(Arc::new(auth), Arc::new(MockTokenStorage::new()));
        let result = use_case
            .execute(&LoginRequest::new("ada@example.com", "s3cret"))
            .await;

        assert!(matches!(result, Err(AuthError::LoginRejected { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_undecodable_token_not_persisted() {
        let storage_port = Arc::new(MockTokenStorage::new());
        let use_case = LoginUseCase::new(
            Arc::new(auth_returning("opaque-token".to_string())),
            storage_port.clone(),
        );

        let result = use_case.execute(&LoginRequest::new("a@b.c", "pw")).await;

        assert!(matches!(result, Err(AuthError::InvalidTokenFormat { .. })));
        assert!(!storage_port.has_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_fail_login() {
        let storage_port = Arc::new(MockTokenStorage::new());
        storage_port.set_fail_writes(true);
        let use_case = LoginUseCase::new(
            Arc::new(auth_returning(fixtures::token_for(1, "a@b.c", "user"))),
            storage_port.clone(),
        );

        let result = use_case.execute(&LoginRequest::new("a@b.c", "pw")).await;

        assert!(result.is_ok());
        assert!(!storage_port.has_token().await.unwrap());
    }
}
