//! Application services.

mod authorization;
mod navigation_guard;
mod session_context;
mod session_store;

pub use authorization::AuthorizationHeader;
pub use navigation_guard::{NavigationDecision, NavigationGuard, RedirectReason};
pub use session_context::SessionContext;
pub use session_store::{SessionState, SessionStore};
