//! Session claims decoded from a bearer token.

use serde::{Deserialize, Serialize};

use crate::domain::errors::AuthError;

/// Numeric identifier of the authenticated subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub u64);

impl SubjectId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SubjectId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Role granted to the subject. The set is open; only `admin` is privileged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Administrator.
    Admin,
    /// Any other role name, kept verbatim.
    Other(String),
}

impl Role {
    const ADMIN: &'static str = "admin";

    /// Returns the role name as issued.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => Self::ADMIN,
            Self::Other(name) => name,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == Self::ADMIN {
            Self::Admin
        } else {
            Self::Other(value)
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Role::ADMIN.to_string(),
            Role::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and authorization data carried by the token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "userId")]
    subject_id: SubjectId,
    email: String,
    role: Role,
}

impl SessionClaims {
    /// Creates claims from their parts.
    #[must_use]
    pub fn new(subject_id: impl Into<SubjectId>, email: impl Into<String>, role: Role) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: email.into(),
            role,
        }
    }

    /// Validates a decoded payload against the claim schema.
    ///
    /// Unknown fields such as `iat` or `exp` are ignored.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidClaims`] when a field is missing or has the
    /// wrong type.
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, AuthError> {
        serde_json::from_value(payload).map_err(|e| AuthError::invalid_claims(e.to_string()))
    }

    #[must_use]
    pub const fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
