//! Storefront API client.

mod client;
mod dto;
mod error;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
