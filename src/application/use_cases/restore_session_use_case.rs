//! Session restoration use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::AuthenticatedSession;
use crate::domain::errors::AuthError;
use crate::domain::ports::TokenStoragePort;

/// Reads the persisted token and decodes its claims.
pub struct RestoreSessionUseCase {
    storage_port: Arc<dyn TokenStoragePort>,
}

impl RestoreSessionUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(storage_port: Arc<dyn TokenStoragePort>) -> Self {
        Self { storage_port }
    }

    /// Loads the persisted session, if any.
    ///
    /// An unreadable store is treated as empty.
    ///
    /// # Errors
    /// Returns a decode error when a token is persisted but its claims cannot be
    /// decoded. The token is left in place; the caller decides how to purge it.
    pub async fn execute(&self) -> Result<Option<AuthenticatedSession>, AuthError> {
        debug!("Checking storage for persisted token");
        let token = match self.storage_port.get_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No persisted token");
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token, treating as absent");
                return Ok(None);
            }
        };

        let session = AuthenticatedSession::from_token(token)?;
        info!(user_id = %session.claims.subject_id(), "Restored persisted session");
        Ok(Some(session))
    }
}
