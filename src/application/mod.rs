//! Application layer with use cases, services and DTOs.

/// Data transfer objects.
pub mod dto;
/// Session services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{AuthenticatedSession, LoginRequest};
pub use services::{
    AuthorizationHeader, NavigationDecision, NavigationGuard, RedirectReason, SessionContext,
    SessionState, SessionStore,
};
pub use use_cases::{LoginUseCase, RestoreSessionUseCase};
