//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O. Flows are built per
//! request; nothing user-specific is shared between requests.

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};

use crate::domain::ports::{AuthService, VehicleStore};
use crate::domain::{DirectoryFlow, RegistrationFlow};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration store.
    pub vehicles: Arc<dyn VehicleStore>,
    /// Staff authentication provider.
    pub auth: Arc<dyn AuthService>,
    /// Offset used when rendering registration timestamps.
    pub display_offset: FixedOffset,
}

impl HttpState {
    /// Bundle the ports, rendering timestamps in UTC.
    pub fn new(vehicles: Arc<dyn VehicleStore>, auth: Arc<dyn AuthService>) -> Self {
        Self {
            vehicles,
            auth,
            display_offset: Utc.fix(),
        }
    }

    /// Render timestamps at `offset`.
    #[must_use]
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    /// Fresh registration flow over the shared store.
    pub fn registration_flow(&self) -> RegistrationFlow<dyn VehicleStore> {
        RegistrationFlow::new(Arc::clone(&self.vehicles))
    }

    /// Fresh directory flow over the shared store.
    pub fn directory_flow(&self) -> DirectoryFlow<dyn VehicleStore> {
        DirectoryFlow::new(Arc::clone(&self.vehicles)).with_display_offset(self.display_offset)
    }
}
