//! Storefront API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use super::dto::{ErrorResponse, LoginBody, TokenResponse};
use super::error::{ApiError, ApiResult};
use crate::application::services::AuthorizationHeader;
use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::AuthPort;
use crate::infrastructure::config::ApiConfig;

const LOGIN_PATH: &str = "/api/auth/login";
const USER_AGENT: &str = concat!("shopgate/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the storefront API.
///
/// Every request carries the current [`AuthorizationHeader`] value, if any.
pub struct ApiClient {
    client: Client,
    base_url: String,
    authorization: AuthorizationHeader,
}

impl ApiClient {
    /// Creates client from configuration.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: &ApiConfig, authorization: AuthorizationHeader) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    /// Creates client with custom base URL and default settings.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        base_url: impl Into<String>,
        authorization: AuthorizationHeader,
    ) -> ApiResult<Self> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&config, authorization)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));

        let Some(value) = self.authorization.value() else {
            return builder;
        };

        match HeaderValue::from_str(&value) {
            Ok(mut header) => {
                header.set_sensitive(true);
                builder.header(AUTHORIZATION, header)
            }
            Err(e) => {
                warn!(error = %e, "Token is not a valid header value, sending request without it");
                builder
            }
        }
    }

    /// Performs an authorized GET and parses the JSON body.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, or invalid JSON.
    pub async fn get_json(&self, path: &str) -> ApiResult<serde_json::Value> {
        debug!(path, "GET");

        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| ApiError::Network {
                message: describe_send_error(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        response.json().await.map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }
}

fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "failed to connect to API".to_string()
    } else {
        e.to_string()
    }
}

async fn error_message(response: Response) -> Option<String> {
    response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.error)
}

#[async_trait]
impl AuthPort for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthToken, AuthError> {
        debug!(email, "Requesting token from auth service");

        let response = self
            .request(Method::POST, LOGIN_PATH)
            .json(&LoginBody { email, password })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach auth service");
                AuthError::network(describe_send_error(&e))
            })?;

        let status = response.status();

        if !status.is_success() {
            let message = error_message(response).await;
            debug!(status = status.as_u16(), ?message, "Login rejected");
            return Err(AuthError::rejected(status.as_u16(), message));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse login response");
            AuthError::invalid_format(format!("login response carried no token: {e}"))
        })?;

        AuthToken::new(body.token)
            .ok_or_else(|| AuthError::invalid_format("login response carried an empty token"))
    }
}
