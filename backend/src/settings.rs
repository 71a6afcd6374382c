//! Service settings loaded via OrthoConfig.
//!
//! Values come from `PARKING_*` environment variables, CLI flags or a config
//! file. Leaving `supabase_url` unset runs the service against the in-memory
//! store and fixture authenticator.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use chrono::FixedOffset;
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::outbound::supabase::{DEFAULT_VEHICLES_TABLE, SupabaseConfig};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Errors raised while interpreting settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The Supabase URL does not parse.
    #[error("invalid supabase_url '{value}': {source}")]
    InvalidSupabaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// A Supabase URL was given without its anon key.
    #[error("supabase_anon_key is required when supabase_url is set")]
    MissingAnonKey,
    /// The display offset is outside ±14 hours.
    #[error("display_utc_offset_minutes={0} is outside -840..=840")]
    InvalidOffset(i32),
}

/// Settings for the parking registration service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PARKING")]
pub struct ParkingSettings {
    /// Address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Supabase project URL; unset selects the in-memory backend.
    pub supabase_url: Option<String>,
    /// Supabase anon key.
    pub supabase_anon_key: Option<String>,
    /// Table holding registrations.
    pub vehicles_table: Option<String>,
    /// Timeout for each Supabase request, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Offset from UTC used to render registration times, in minutes.
    pub display_utc_offset_minutes: Option<i32>,
}

impl ParkingSettings {
    /// Configured bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Configured table, defaulting to the hosted project's table.
    pub fn vehicles_table(&self) -> &str {
        self.vehicles_table
            .as_deref()
            .unwrap_or(DEFAULT_VEHICLES_TABLE)
    }

    /// Per-request timeout for outbound calls.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                .max(1),
        )
    }

    /// Offset used when rendering registration timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidOffset`] beyond ±14 hours.
    pub fn display_offset(&self) -> Result<FixedOffset, SettingsError> {
        let minutes = self.display_utc_offset_minutes.unwrap_or(0);
        if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
            return Err(SettingsError::InvalidOffset(minutes));
        }
        FixedOffset::east_opt(minutes * 60).ok_or(SettingsError::InvalidOffset(minutes))
    }

    /// Supabase connection details, or `None` when no project is configured.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is malformed or the anon key is missing.
    pub fn supabase(&self) -> Result<Option<SupabaseConfig>, SettingsError> {
        let Some(raw_url) = self.supabase_url.as_deref().filter(|url| !url.trim().is_empty())
        else {
            return Ok(None);
        };
        let url = Url::parse(raw_url.trim()).map_err(|source| SettingsError::InvalidSupabaseUrl {
            value: raw_url.to_owned(),
            source,
        })?;
        let anon_key = self
            .supabase_anon_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingAnonKey)?;

        let mut config = SupabaseConfig::new(url, anon_key);
        config.table = self.vehicles_table().to_owned();
        config.timeout = self.request_timeout();
        Ok(Some(config))
    }
}
