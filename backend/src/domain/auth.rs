//! Staff authentication primitives: credentials, identity and failures.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

/// Domain error returned when sign-in payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use parking_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" obreiro@example.org ", "secret").unwrap();
/// assert_eq!(creds.email(), "obreiro@example.org");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used to look the account up.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Authenticated staff member as reported by the session collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffIdentity {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    user_id: String,
    #[schema(example = "obreiro@example.org")]
    email: String,
    /// Provider access token, kept server-side only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(ignore)]
    access_token: Option<String>,
}

impl StaffIdentity {
    /// Build an identity for `user_id` signed in as `email`.
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            access_token: None,
        }
    }

    /// Attach the provider's access token so sign-out can revoke it.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Provider user identifier.
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Sign-in email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Provider access token, when the provider issued one.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Copy without the access token, safe to return to clients.
    #[must_use]
    pub fn public_view(&self) -> Self {
        Self::new(self.user_id.clone(), self.email.clone())
    }
}

/// Sign-in failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Email or password did not match an account.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// The provider failed for any other reason.
    #[error("authentication provider unavailable: {message}")]
    Unavailable {
        /// Provider diagnostic, never shown to visitors.
        message: String,
    },
}

impl AuthError {
    /// Convenience constructor for [`AuthError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
