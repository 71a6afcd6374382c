//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use chrono::{FixedOffset, Offset, Utc};
use parking_backend::inbound::http::session_config::SessionSettings;
use parking_backend::outbound::supabase::SupabaseConfig;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) supabase: Option<SupabaseConfig>,
    pub(crate) display_offset: FixedOffset,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    ///
    /// Without [`with_supabase`](Self::with_supabase) the server runs on the
    /// in-memory store and fixture credentials.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            supabase: None,
            display_offset: Utc.fix(),
        }
    }

    /// Persist registrations and authenticate staff against Supabase.
    #[must_use]
    pub fn with_supabase(mut self, supabase: Option<SupabaseConfig>) -> Self {
        self.supabase = supabase;
        self
    }

    /// Render registration times at `offset`.
    #[must_use]
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
