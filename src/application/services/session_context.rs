//! Startup wiring for the session store and guard.

use std::sync::Arc;

use tracing::info;

use super::authorization::AuthorizationHeader;
use super::navigation_guard::NavigationGuard;
use super::session_store::SessionStore;
use crate::domain::entities::RouteTable;
use crate::domain::ports::{AuthPort, TokenStoragePort};

/// Owns the session for the lifetime of the application.
///
/// Only obtainable through [`SessionContext::start`], which finishes restoring
/// the persisted session before the guard exists, so the first navigation never
/// sees a stale signed-out state.
pub struct SessionContext {
    store: Arc<SessionStore>,
    guard: NavigationGuard,
}

impl SessionContext {
    /// Builds the store, restores the persisted session and creates the guard.
    pub async fn start(
        auth_port: Arc<dyn AuthPort>,
        storage_port: Arc<dyn TokenStoragePort>,
        authorization: AuthorizationHeader,
        routes: RouteTable,
    ) -> Self {
        let store = Arc::new(SessionStore::new(auth_port, storage_port, authorization));
        store.restore().await;

        info!(
            authenticated = store.is_authenticated(),
            admin = store.is_admin(),
            "Session ready"
        );

        let guard = NavigationGuard::new(Arc::clone(&store), Arc::new(routes));
        Self { store, guard }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    #[must_use]
    pub const fn guard(&self) -> &NavigationGuard {
        &self.guard
    }
}
