//! Driven port for the hosted authentication provider.
//!
//! Inbound adapters call it to exchange credentials for a [`StaffIdentity`]
//! without knowing the backing infrastructure, which keeps handler tests
//! deterministic.

use async_trait::async_trait;

use crate::domain::{AuthError, LoginCredentials, StaffIdentity};

/// Sign-in and sign-out against the session collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<StaffIdentity, AuthError>;

    /// End the provider-side session. Failures are the adapter's to log.
    async fn sign_out(&self, identity: &StaffIdentity);
}

/// In-memory authenticator used when no provider is configured.
///
/// `obreiro@example.org` / `password` authenticates successfully and produces
/// a fixed user id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthService;

impl FixtureAuthService {
    /// Email accepted by the fixture.
    pub const EMAIL: &'static str = "obreiro@example.org";
    /// Password accepted by the fixture.
    pub const PASSWORD: &'static str = "password";
    /// User id reported for the fixture account.
    pub const USER_ID: &'static str = "123e4567-e89b-12d3-a456-426614174000";
}

#[async_trait]
impl AuthService for FixtureAuthService {
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<StaffIdentity, AuthError> {
        if credentials.email() == Self::EMAIL && credentials.password() == Self::PASSWORD {
            Ok(StaffIdentity::new(Self::USER_ID, Self::EMAIL))
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn sign_out(&self, identity: &StaffIdentity) {
        tracing::debug!(user_id = identity.user_id(), "fixture sign-out");
    }
}
