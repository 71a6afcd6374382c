//! Driven port for the hosted collection of vehicle registrations.
//!
//! The store owns identifiers, timestamps, ordering and plate uniqueness.
//! Adapters translate their own failures into [`VehicleStoreError`], keeping a
//! dedicated variant for unique-constraint violations so the registration
//! flow can tell a duplicate plate apart from every other failure.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{NewVehicleRegistration, VehicleId, VehicleRegistration};

/// SQLSTATE reported by Postgres-backed stores for unique violations.
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

define_port_error! {
    /// Failures raised by vehicle store adapters.
    pub enum VehicleStoreError {
        /// A unique constraint (the plate) rejected the write.
        UniqueViolation { message: String } => "unique constraint violated: {message}",
        /// The store could not be reached.
        Connection { message: String } => "vehicle store connection failed: {message}",
        /// The store rejected or failed the operation.
        Query { message: String } => "vehicle store query failed: {message}",
    }
}

impl VehicleStoreError {
    /// Stable discriminator for unique-constraint violations.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

/// CRUD contract over the single collection of registrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Insert one registration; the store assigns `id` and `created_at`.
    async fn create(&self, registration: &NewVehicleRegistration) -> Result<(), VehicleStoreError>;

    /// Every registration, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<VehicleRegistration>, VehicleStoreError>;

    /// Hard-delete the registration with `id`.
    async fn delete_by_id(&self, id: &VehicleId) -> Result<(), VehicleStoreError>;
}
