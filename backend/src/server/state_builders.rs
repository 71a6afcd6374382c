//! Selects the outbound adapters behind the HTTP state.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use parking_backend::domain::ports::{AuthService, FixtureAuthService, VehicleStore};
use parking_backend::inbound::http::state::HttpState;
use parking_backend::outbound::memory::InMemoryVehicleStore;
use parking_backend::outbound::supabase::{
    SupabaseAuthService, SupabaseConfig, SupabaseVehicleStore,
};
use tracing::{info, warn};

use super::ServerConfig;

fn supabase_ports(
    config: &SupabaseConfig,
) -> io::Result<(Arc<dyn VehicleStore>, Arc<dyn AuthService>)> {
    let vehicles = SupabaseVehicleStore::new(config)
        .map_err(|e| io::Error::other(format!("vehicle store setup failed: {e}")))?;
    let auth = SupabaseAuthService::new(config)
        .map_err(|e| io::Error::other(format!("auth service setup failed: {e}")))?;
    info!(url = %config.url, table = config.table.as_str(), "using Supabase backend");
    Ok((Arc::new(vehicles), Arc::new(auth)))
}

fn fixture_ports() -> (Arc<dyn VehicleStore>, Arc<dyn AuthService>) {
    warn!(
        email = FixtureAuthService::EMAIL,
        "no Supabase project configured; using in-memory store and fixture credentials"
    );
    (
        Arc::new(InMemoryVehicleStore::new(Arc::new(DefaultClock))),
        Arc::new(FixtureAuthService),
    )
}

/// Build the shared HTTP state, using Supabase when configured and the
/// in-memory fixtures otherwise.
///
/// # Errors
/// Returns [`io::Error`] when the Supabase HTTP clients cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let (vehicles, auth) = match &config.supabase {
        Some(supabase) => supabase_ports(supabase)?,
        None => fixture_ports(),
    };
    Ok(HttpState::new(vehicles, auth).with_display_offset(config.display_offset))
}
