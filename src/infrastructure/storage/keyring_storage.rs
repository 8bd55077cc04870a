//! Session token kept in the platform credential store.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::{AuthError, SecretError};
use crate::domain::ports::TokenStoragePort;

const SERVICE: &str = "shopgate";
const ACCOUNT: &str = "token";

/// Keyring entry holding the session token under one fixed service/account pair.
pub struct KeyringTokenStorage {
    service: String,
    account: String,
}

impl KeyringTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::for_account(SERVICE, ACCOUNT)
    }

    /// Uses a different entry, mainly so tests do not touch the real session.
    #[must_use]
    pub fn for_account(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry, AuthError> {
        Entry::new(&self.service, &self.account).map_err(|e| {
            warn!(service = %self.service, error = %e, "Keyring unavailable");
            SecretError::AccessFailed(e.to_string()).into()
        })
    }
}

impl Default for KeyringTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStoragePort for KeyringTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError> {
        let secret = match self.entry()?.get_password() {
            Ok(secret) => secret,
            Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service, "No session in keyring");
                return Ok(None);
            }
            Err(e) => return Err(AuthError::retrieval_failed(e.to_string())),
        };

        let token = AuthToken::new(secret);
        if token.is_none() {
            debug!(service = %self.service, "Keyring entry is blank, ignoring");
        }
        Ok(token)
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
        self.entry()?
            .set_password(token.as_str())
            .map_err(|e| AuthError::storage_failed(e.to_string()))?;
        debug!(service = %self.service, token = %token, "Session saved to keyring");
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), AuthError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service, "Keyring session cleared");
                Ok(())
            }
            Err(e) => Err(AuthError::storage_failed(e.to_string())),
        }
    }
}
