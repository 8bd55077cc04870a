//! Domain entity definitions.

mod claims;
mod route;
mod token;

pub use claims::{Role, SessionClaims, SubjectId};
pub use route::{ResolvedRoute, RouteDefinition, RouteMeta, RouteTable};
pub use token::AuthToken;

#[cfg(test)]
pub(crate) use token::fixtures;
