//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{AuthToken, Role, RouteMeta, RouteTable, SessionClaims};
pub use errors::AuthError;
pub use ports::{AuthPort, TokenStoragePort};
