//! Supabase outbound adapters.
//!
//! Thin `reqwest` implementations of the [`VehicleStore`] and [`AuthService`]
//! ports against a hosted Supabase project: the PostgREST table API for
//! registrations and the GoTrue password grant for staff sign-in.
//!
//! [`VehicleStore`]: crate::domain::ports::VehicleStore
//! [`AuthService`]: crate::domain::ports::AuthService

mod auth_service;
mod dto;
mod vehicle_store;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, Url};

pub use auth_service::SupabaseAuthService;
pub use vehicle_store::SupabaseVehicleStore;

/// Table holding vehicle registrations in the hosted project.
pub const DEFAULT_VEHICLES_TABLE: &str = "fieis_veiculos";

/// Connection details for one Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub url: Url,
    /// Public anon key sent as `apikey` on every request.
    pub anon_key: String,
    /// Table holding vehicle registrations.
    pub table: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SupabaseConfig {
    /// Configuration for `url` using the default table and a 10 second timeout.
    pub fn new(url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            url,
            anon_key: anon_key.into(),
            table: DEFAULT_VEHICLES_TABLE.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Failure while building a Supabase client.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseClientError {
    /// The anon key cannot be sent as a header value.
    #[error("Supabase anon key is not a valid header value")]
    InvalidKey(#[from] InvalidHeaderValue),
    /// The project URL cannot be extended with API paths.
    #[error("Supabase URL cannot be used as a base: {0}")]
    InvalidUrl(String),
    /// reqwest rejected the client configuration.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Build a client that sends the project key on every request.
fn build_client(config: &SupabaseConfig) -> Result<Client, SupabaseClientError> {
    let mut headers = HeaderMap::new();
    let mut key = HeaderValue::from_str(&config.anon_key)?;
    key.set_sensitive(true);
    headers.insert("apikey", key);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.anon_key))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    Ok(Client::builder()
        .timeout(config.timeout)
        .default_headers(headers)
        .build()?)
}

/// Append `segments` to the project URL.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, SupabaseClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SupabaseClientError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Collapse whitespace and cap an error body for log-friendly messages.
fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for shared Supabase helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://abc.supabase.co", "https://abc.supabase.co/rest/v1/fieis_veiculos")]
    #[case("https://abc.supabase.co/", "https://abc.supabase.co/rest/v1/fieis_veiculos")]
    #[case("http://localhost:54321/base/", "http://localhost:54321/base/rest/v1/fieis_veiculos")]
    fn endpoint_appends_segments(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid url");
        let url = endpoint(&base, &["rest", "v1", "fieis_veiculos"]).expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn endpoint_rejects_cannot_be_a_base_urls() {
        let base = Url::parse("mailto:ops@example.org").expect("valid url");
        assert!(matches!(
            endpoint(&base, &["rest"]),
            Err(SupabaseClientError::InvalidUrl(_))
        ));
    }

    #[rstest]
    fn client_rejects_keys_with_control_characters() {
        let url = Url::parse("https://abc.supabase.co").expect("valid url");
        let config = SupabaseConfig::new(url, "bad\nkey");
        assert!(matches!(
            build_client(&config),
            Err(SupabaseClientError::InvalidKey(_))
        ));
    }

    #[rstest]
    fn body_preview_compacts_and_truncates() {
        assert_eq!(body_preview(b"  a \n  b  "), "a b");
        let long = "x".repeat(200);
        let preview = body_preview(long.as_bytes());
        assert_eq!(preview.len(), 163);
        assert!(preview.ends_with("..."));
    }
}
