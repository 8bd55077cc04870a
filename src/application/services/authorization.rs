//! Default `Authorization` value for outgoing requests.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::entities::AuthToken;

/// Shared handle to the bearer token applied to every outgoing request.
///
/// Cloning yields another handle to the same slot. The session store writes it,
/// HTTP adapters read it.
#[derive(Clone, Default)]
pub struct AuthorizationHeader {
    token: Arc<RwLock<Option<AuthToken>>>,
}

impl AuthorizationHeader {
    /// Creates an empty handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `token` for subsequent requests.
    pub fn set(&self, token: &AuthToken) {
        *self.token.write() = Some(token.clone());
    }

    /// Stops sending an `Authorization` header.
    pub fn clear(&self) {
        *self.token.write() = None;
    }

    /// Returns the header value, `Bearer <token>`, if set.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.token.read().as_ref().map(AuthToken::bearer)
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.token.read().is_some()
    }
}

impl fmt::Debug for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationHeader")
            .field("token", &*self.token.read())
            .finish()
    }
}
