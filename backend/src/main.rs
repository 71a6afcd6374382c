//! Backend entry-point: loads settings, wires adapters and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use parking_backend::inbound::http::health::HealthState;
use parking_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use parking_backend::settings::ParkingSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ParkingSettings::load()
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| io::Error::other(format!("invalid session configuration: {e}")))?;
    let supabase = settings.supabase().map_err(io::Error::other)?;
    let display_offset = settings.display_offset().map_err(io::Error::other)?;

    let config = ServerConfig::new(session, settings.bind_addr())
        .with_supabase(supabase)
        .with_display_offset(display_offset);

    info!(
        bind_addr = %config.bind_addr(),
        supabase = config.supabase.is_some(),
        "starting parking backend"
    );
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
