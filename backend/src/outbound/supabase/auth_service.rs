//! GoTrue-backed staff authentication.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode, Url};
use tracing::{info, warn};

use super::dto::{AuthErrorDto, AuthSessionDto, PasswordGrantDto};
use super::{SupabaseClientError, SupabaseConfig, body_preview, build_client, endpoint};
use crate::domain::ports::AuthService;
use crate::domain::{AuthError, LoginCredentials, StaffIdentity};

/// Provider message for a wrong email or password.
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login credentials";

/// [`AuthService`] over the project's auth API.
pub struct SupabaseAuthService {
    client: Client,
    token_url: Url,
    logout_url: Url,
}

impl SupabaseAuthService {
    /// Build an auth adapter for the project in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL cannot be extended or the client cannot
    /// be constructed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseClientError> {
        let mut token_url = endpoint(&config.url, &["auth", "v1", "token"])?;
        token_url
            .query_pairs_mut()
            .append_pair("grant_type", "password");
        Ok(Self {
            client: build_client(config)?,
            token_url,
            logout_url: endpoint(&config.url, &["auth", "v1", "logout"])?,
        })
    }
}

#[async_trait]
impl AuthService for SupabaseAuthService {
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<StaffIdentity, AuthError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .json(&PasswordGrantDto {
                email: credentials.email(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(|error| AuthError::unavailable(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| AuthError::unavailable(error.to_string()))?;
        if !status.is_success() {
            return Err(map_sign_in_error(status, body.as_ref()));
        }
        parse_session(body.as_ref(), credentials.email())
    }

    async fn sign_out(&self, identity: &StaffIdentity) {
        let Some(token) = identity.access_token() else {
            return;
        };
        let result = self
            .client
            .post(self.logout_url.clone())
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {
                info!(user_id = identity.user_id(), "provider session revoked");
            }
            Ok(response) => {
                warn!(
                    user_id = identity.user_id(),
                    status = response.status().as_u16(),
                    "provider sign-out rejected"
                );
            }
            Err(error) => {
                warn!(user_id = identity.user_id(), %error, "provider sign-out failed");
            }
        }
    }
}

fn parse_session(body: &[u8], requested_email: &str) -> Result<StaffIdentity, AuthError> {
    let session: AuthSessionDto = serde_json::from_slice(body)
        .map_err(|error| AuthError::unavailable(format!("invalid session payload: {error}")))?;
    let email = session
        .user
        .email
        .unwrap_or_else(|| requested_email.to_owned());
    Ok(StaffIdentity::new(session.user.id, email).with_access_token(session.access_token))
}

fn map_sign_in_error(status: StatusCode, body: &[u8]) -> AuthError {
    let decoded: AuthErrorDto = serde_json::from_slice(body).unwrap_or_default();
    match decoded.text() {
        Some(INVALID_CREDENTIALS_MESSAGE) => AuthError::InvalidCredentials,
        Some(text) => AuthError::unavailable(format!("status {}: {text}", status.as_u16())),
        None => AuthError::unavailable(format!(
            "status {}: {}",
            status.as_u16(),
            body_preview(body)
        )),
    }
}
