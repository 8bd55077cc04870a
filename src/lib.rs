//! Shopgate - session-aware terminal client for the storefront admin API.
//!
//! This crate authenticates against the storefront's auth service, persists the
//! issued bearer token, decodes its claims, and decides before each navigation
//! whether the session may enter a route.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing session services, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer running commands and printing results.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "shopgate";
