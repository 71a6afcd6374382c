//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod session_state;
mod vehicle_store;

#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{AuthService, FixtureAuthService};
pub use session_state::{DeleteConfirmation, SessionState};
#[cfg(test)]
pub use vehicle_store::MockVehicleStore;
pub use vehicle_store::{UNIQUE_VIOLATION_CODE, VehicleStore, VehicleStoreError};
