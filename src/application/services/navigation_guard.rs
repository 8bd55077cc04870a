//! Per-navigation access control.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::session_store::SessionStore;
use crate::domain::entities::{RouteMeta, RouteTable};

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// Route requires a credential and none is present.
    Unauthenticated,
    /// Route requires the admin role.
    NotAdmin,
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::NotAdmin => write!(f, "admin role required"),
        }
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Proceed to the requested route.
    Allow,
    /// Go to `to` instead.
    Redirect { to: String, reason: RedirectReason },
}

impl NavigationDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the redirect target, if any.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Redirect { to, .. } => Some(to),
        }
    }
}

/// Decides allow / redirect-to-login / redirect-to-home before each navigation.
///
/// Owns no session data; it reads the store synchronously and never triggers a
/// refresh. Unknown paths carry no requirements and are allowed.
#[derive(Clone)]
pub struct NavigationGuard {
    session: Arc<SessionStore>,
    routes: Arc<RouteTable>,
}

impl NavigationGuard {
    pub(crate) const fn new(session: Arc<SessionStore>, routes: Arc<RouteTable>) -> Self {
        Self { session, routes }
    }

    /// Checks a navigation from `current` to `target`.
    #[must_use]
    pub fn check(&self, target: &str, current: Option<&str>) -> NavigationDecision {
        let meta = self
            .routes
            .resolve(target)
            .map(|route| route.meta)
            .unwrap_or_default();

        let decision = self.decide(meta);
        debug!(
            path = target,
            from = current.unwrap_or("<start>"),
            ?decision,
            "Navigation checked"
        );
        decision
    }

    /// Applies the access rules to explicit route requirements.
    ///
    /// The authentication rule is evaluated before the admin rule, so a
    /// signed-out user always lands on the login route.
    #[must_use]
    pub fn decide(&self, meta: RouteMeta) -> NavigationDecision {
        if meta.requires_auth && !self.session.is_authenticated() {
            return NavigationDecision::Redirect {
                to: self.routes.login_path.clone(),
                reason: RedirectReason::Unauthenticated,
            };
        }

        if meta.requires_admin && !self.session.is_admin() {
            return NavigationDecision::Redirect {
                to: self.routes.home_path.clone(),
                reason: RedirectReason::NotAdmin,
            };
        }

        NavigationDecision::Allow
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}
