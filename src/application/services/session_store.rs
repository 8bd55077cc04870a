//! Session state and the operations that mutate it.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::authorization::AuthorizationHeader;
use crate::application::dto::{AuthenticatedSession, LoginRequest};
use crate::application::use_cases::{LoginUseCase, RestoreSessionUseCase};
use crate::domain::entities::{AuthToken, SessionClaims};
use crate::domain::ports::{AuthPort, TokenStoragePort};

/// Credential, claims and status of the current session.
///
/// Claims are present exactly when a decodable token is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    token: Option<AuthToken>,
    claims: Option<SessionClaims>,
    loading: bool,
    error: Option<String>,
}

impl SessionState {
    #[must_use]
    pub const fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn claims(&self) -> Option<&SessionClaims> {
        self.claims.as_ref()
    }

    /// Whether a login is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed login.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.claims.as_ref().is_some_and(SessionClaims::is_admin)
    }

    fn clear_credentials(&mut self) {
        self.token = None;
        self.claims = None;
    }
}

/// Resets the loading flag however `login` returns.
struct LoadingGuard<'a> {
    state: &'a RwLock<SessionState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.write().loading = false;
    }
}

/// Single source of truth for who is logged in.
pub struct SessionStore {
    login_use_case: LoginUseCase,
    restore_use_case: RestoreSessionUseCase,
    authorization: AuthorizationHeader,
    state: RwLock<SessionState>,
    login_flight: Mutex<()>,
}

impl SessionStore {
    /// Creates a store in the unauthenticated shape. Call [`Self::restore`]
    /// before consulting it.
    #[must_use]
    pub fn new(
        auth_port: Arc<dyn AuthPort>,
        storage_port: Arc<dyn TokenStoragePort>,
        authorization: AuthorizationHeader,
    ) -> Self {
        Self {
            login_use_case: LoginUseCase::new(auth_port, Arc::clone(&storage_port)),
            restore_use_case: RestoreSessionUseCase::new(storage_port),
            authorization,
            state: RwLock::new(SessionState::default()),
            login_flight: Mutex::new(()),
        }
    }

    /// Loads the persisted token, if any.
    ///
    /// A persisted token that cannot be decoded is treated as tampered: the
    /// session is cleared and the token purged, without reporting an error.
    /// Safe to call repeatedly.
    pub async fn restore(&self) {
        match self.restore_use_case.execute().await {
            Ok(Some(session)) => self.apply(session),
            Ok(None) => debug!("Nothing to restore"),
            Err(e) => {
                warn!(error = %e, "Persisted token is invalid, clearing session");
                self.logout().await;
            }
        }
    }

    /// Logs in with the given credentials.
    ///
    /// Returns `true` on success. On failure the session is cleared, the
    /// persisted token purged, and [`SessionState::error`] holds a message for
    /// the user. While a login is in flight further calls return `false`
    /// immediately and leave the state untouched.
    pub async fn login(&self, request: &LoginRequest) -> bool {
        let Ok(_flight) = self.login_flight.try_lock() else {
            warn!(email = %request.email, "Login already in progress, ignoring");
            return false;
        };

        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }
        let _loading = LoadingGuard { state: &self.state };

        match self.login_use_case.execute(request).await {
            Ok(session) => {
                self.apply(session);
                true
            }
            Err(e) => {
                self.clear_session();
                self.state.write().error = Some(e.user_message());
                // failure is logged by the use case
                let _ = self.login_use_case.delete_token().await;
                false
            }
        }
    }

    /// Clears the session, the persisted token and the authorization default.
    /// Makes no network call and never fails.
    pub async fn logout(&self) {
        self.clear_session();
        // failure is logged by the use case
        let _ = self.login_use_case.delete_token().await;
        info!("Logged out");
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state.read().is_admin()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    #[must_use]
    pub fn claims(&self) -> Option<SessionClaims> {
        self.state.read().claims.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.state.read().token.clone()
    }

    /// Returns a copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Handle to the outgoing-request authorization default.
    #[must_use]
    pub fn authorization(&self) -> AuthorizationHeader {
        self.authorization.clone()
    }

    fn apply(&self, session: AuthenticatedSession) {
        self.authorization.set(&session.token);
        let mut state = self.state.write();
        state.token = Some(session.token);
        state.claims = Some(session.claims);
    }

    fn clear_session(&self) {
        self.state.write().clear_credentials();
        self.authorization.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::fixtures;
    use crate::domain::errors::{AuthError, GENERIC_LOGIN_FAILURE};
    use crate::domain::ports::mocks::{MockAuthPort, MockTokenStorage};
    use std::time::Duration;

    fn auth_returning(raw: String) -> MockAuthPort {
        let mut auth = MockAuthPort::new();
        auth.expect_login()
            .returning(move |_, _| Ok(AuthToken::new_unchecked(raw.clone())));
        auth
    }

    fn auth_failing(make: fn() -> AuthError) -> MockAuthPort {
        let mut auth = MockAuthPort::new();
        auth.expect_login().returning(move |_, _| Err(make()));
        auth
    }

    fn store_with(auth: MockAuthPort, storage: &Arc<MockTokenStorage>) -> SessionStore {
        SessionStore::new(
            Arc::new(auth),
            Arc::clone(storage) as Arc<dyn TokenStoragePort>,
            AuthorizationHeader::new(),
        )
    }

    fn request() -> LoginRequest {
        LoginRequest::new("ada@example.com", "pw")
    }

    #[tokio::test]
    async fn test_login_success() {
        let raw = fixtures::token_for(11, "ada@example.com", "admin");
        let storage = Arc::new(MockTokenStorage::new());
        let store = store_with(auth_returning(raw.clone()), &storage);

        assert!(store.login(&request()).await);

        assert!(store.is_authenticated());
        assert!(store.is_admin());
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
        assert_eq!(store.claims().unwrap().subject_id().as_u64(), 11);
        assert_eq!(
            store.authorization().value(),
            Some(format!("Bearer {raw}"))
        );
        assert_eq!(storage.stored().await, Some(raw));
    }

    #[tokio::test]
    async fn test_login_rejected_with_service_message() {
        let storage = Arc::new(MockTokenStorage::new());
        let store = store_with(
            auth_failing(|| AuthError::rejected(401, Some("bad creds".to_string()))),
            &storage,
        );

        assert!(!store.login(&request()).await);

        assert_eq!(store.error().as_deref(), Some("bad creds"));
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
        assert_eq!(storage.stored().await, None);
        assert!(!store.authorization().is_set());
    }

    #[tokio::test]
    async fn test_login_network_error_uses_generic_message() {
        let storage = Arc::new(MockTokenStorage::new());
        let store = store_with(
            auth_failing(|| AuthError::network("connection refused")),
            &storage,
        );

        assert!(!store.login(&request()).await);
        assert_eq!(store.error().as_deref(), Some(GENERIC_LOGIN_FAILURE));
    }

    #[tokio::test]
    async fn test_login_with_undecodable_token_fails_closed() {
        let storage = Arc::new(MockTokenStorage::new());
        let store = store_with(auth_returning("not-a-jwt".to_string()), &storage);

        assert!(!store.login(&request()).await);

        assert_eq!(store.error().as_deref(), Some(GENERIC_LOGIN_FAILURE));
        assert!(store.token().is_none());
        assert!(store.claims().is_none());
        assert_eq!(storage.stored().await, None);
    }

    #[tokio::test]
    async fn test_failed_login_clears_previous_session() {
        let previous = fixtures::token_for(1, "old@example.com", "admin");
        let storage = Arc::new(MockTokenStorage::with_token(AuthToken::new_unchecked(
            previous,
        )));
        let store = store_with(auth_failing(|| AuthError::rejected(403, None)), &storage);
        store.restore().await;
        assert!(store.is_admin());

        assert!(!store.login(&request()).await);

        assert!(!store.is_authenticated());
        assert!(!store.authorization().is_set());
        assert_eq!(storage.stored().await, None);
    }

    #[tokio::test]
    async fn test_new_login_clears_previous_error() {
        let mut auth = MockAuthPort::new();
        let raw = fixtures::token_for(2, "ada@example.com", "user");
        let mut calls = 0;
        auth.expect_login().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(AuthError::rejected(401, Some("bad creds".to_string())))
            } else {
                Ok(AuthToken::new_unchecked(raw.clone()))
            }
        });
        let storage = Arc::new(MockTokenStorage::new());
        let store = store_with(auth, &storage);

        assert!(!store.login(&request()).await);
        assert!(store.error().is_some());

        assert!(store.login(&request()).await);
        assert_eq!(store.error(), None);
        assert!(!store.is_admin());
    }

    #[tokio::test]
    async fn test_logout_after_login() {
        let storage = Arc::new(MockTokenStorage::new());
        let store = store_with(
            auth_returning(fixtures::token_for(4, "ada@example.com", "admin")),
            &storage,
        );
        assert!(store.login(&request()).await);

        store.logout().await;

        assert_eq!(store.snapshot(), SessionState::default());
        assert_eq!(storage.stored().await, None);
        assert_eq!(store.authorization().value(), None);
    }

    #[tokio::test]
    async fn test_logout_makes_no_network_call() {
        let mut auth = MockAuthPort::new();
        auth.expect_login().never();
        let storage = Arc::new(MockTokenStorage::new());
        let store = store_with(auth, &storage);

        store.logout().await;
        store.logout().await;

        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_valid_token() {
        let raw = fixtures::token_for(8, "ops@example.com", "user");
        let storage = Arc::new(MockTokenStorage::with_token(AuthToken::new_unchecked(
            raw.clone(),
        )));
        let store = store_with(MockAuthPort::new(), &storage);

        store.restore().await;
        store.restore().await;

        assert!(store.is_authenticated());
        assert!(!store.is_admin());
        assert_eq!(store.error(), None);
        assert_eq!(store.authorization().value(), Some(format!("Bearer {raw}")));
    }

    #[tokio::test]
    async fn test_restore_invalid_token_purges_it() {
        let storage = Arc::new(MockTokenStorage::with_token(AuthToken::new_unchecked(
            "header.%%%%.sig",
        )));
        let store = store_with(MockAuthPort::new(), &storage);

        store.restore().await;

        assert!(!store.is_authenticated());
        assert!(store.claims().is_none());
        assert_eq!(store.error(), None);
        assert_eq!(storage.stored().await, None);
        assert!(!store.authorization().is_set());
    }

    #[tokio::test]
    async fn test_restore_with_nothing_persisted() {
        let storage = Arc::new(MockTokenStorage::new());
        let store = store_with(MockAuthPort::new(), &storage);

        store.restore().await;

        assert_eq!(store.snapshot(), SessionState::default());
    }

    #[tokio::test]
    async fn test_restore_with_unreadable_store() {
        let storage = Arc::new(MockTokenStorage::with_token(AuthToken::new_unchecked(
            fixtures::token_for(8, "ops@example.com", "admin"),
        )));
        storage.set_fail_reads(true);
        let store = store_with(MockAuthPort::new(), &storage);

        store.restore().await;

        assert_eq!(store.snapshot(), SessionState::default());
        assert!(!store.authorization().is_set());
        assert_eq!(storage.deletes(), 0);
        assert!(storage.stored().await.is_some());
    }

    /// Auth port that blocks until released, to observe in-flight state.
    struct GatedAuth {
        release: tokio::sync::Notify,
        raw: String,
    }

    #[async_trait::async_trait]
    impl AuthPort for GatedAuth {
        async fn login(&self, _email: &str, _password: &str) -> Result<AuthToken, AuthError> {
            self.release.notified().await;
            Ok(AuthToken::new_unchecked(self.raw.clone()))
        }
    }

    #[tokio::test]
    async fn test_concurrent_login_is_single_flight() {
        let auth = Arc::new(GatedAuth {
            release: tokio::sync::Notify::new(),
            raw: fixtures::token_for(6, "ada@example.com", "admin"),
        });
        let storage = Arc::new(MockTokenStorage::new());
        let store = Arc::new(SessionStore::new(
            Arc::clone(&auth) as Arc<dyn AuthPort>,
            storage as Arc<dyn TokenStoragePort>,
            AuthorizationHeader::new(),
        ));

        let first = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.login(&request()).await }
        });

        while !store.is_loading() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        assert!(!store.login(&request()).await);
        assert!(store.is_loading());
        assert_eq!(store.error(), None);

        auth.release.notify_one();
        assert!(first.await.unwrap());
        assert!(!store.is_loading());
        assert!(store.is_admin());
    }
}
