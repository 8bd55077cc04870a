//! Bearer credential value object.

use std::fmt;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use super::claims::SessionClaims;
use crate::domain::errors::AuthError;

/// Standard alphabet, padding optional, like the browser `atob`.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Bearer token issued by the auth service, with masking.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    value: String,
}

impl AuthToken {
    /// Creates new token, rejecting blank input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return None;
        }

        Some(Self { value })
    }

    /// Creates token without validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.value.len() <= 10 || !self.value.is_ascii() {
            return "*".repeat(self.value.chars().count());
        }

        let visible_prefix = &self.value[..4];
        let visible_suffix = &self.value[self.value.len() - 4..];
        format!("{visible_prefix}...{visible_suffix}")
    }

    /// Decodes the session claims carried in the token's payload segment.
    ///
    /// The token is `header.payload.signature`; only the payload is read and the
    /// signature is not verified, the server stays the authority on that.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidTokenFormat`] when the payload segment is
    /// missing or is not base64-encoded JSON, and [`AuthError::InvalidClaims`]
    /// when the JSON does not carry the expected claim fields.
    pub fn decode_claims(&self) -> Result<SessionClaims, AuthError> {
        let segment = self
            .value
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| AuthError::invalid_format("missing payload segment"))?;

        let standard: String = segment
            .chars()
            .map(|c| match c {
                '-' => '+',
                '_' => '/',
                other => other,
            })
            .collect();

        let bytes = PAYLOAD_ENGINE
            .decode(standard.as_bytes())
            .map_err(|e| AuthError::invalid_format(format!("payload is not base64: {e}")))?;

        let payload: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::invalid_format(format!("payload is not JSON: {e}")))?;

        SessionClaims::from_payload(payload)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}
