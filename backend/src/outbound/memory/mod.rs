//! In-memory vehicle store.
//!
//! Mirrors the hosted table's behaviour closely enough for local runs and
//! tests: the store assigns identifiers and timestamps, rejects duplicate
//! plates and lists newest first.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{VehicleStore, VehicleStoreError};
use crate::domain::{NewVehicleRegistration, VehicleId, VehicleRegistration};

/// Process-local [`VehicleStore`].
pub struct InMemoryVehicleStore {
    records: RwLock<Vec<VehicleRegistration>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryVehicleStore {
    /// Create an empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Number of stored registrations.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no registrations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VehicleStore for InMemoryVehicleStore {
    async fn create(&self, registration: &NewVehicleRegistration) -> Result<(), VehicleStoreError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records
            .iter()
            .any(|record| record.plate() == registration.plate())
        {
            return Err(VehicleStoreError::unique_violation(format!(
                "plate {} already registered",
                registration.plate()
            )));
        }
        records.push(VehicleRegistration::new(
            VehicleId::random(),
            registration.clone(),
            self.clock.utc(),
        ));
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<VehicleRegistration>, VehicleStoreError> {
        let mut records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        // Stable sort keeps insertion order for equal timestamps; reverse it so
        // the latest insert still comes first.
        records.reverse();
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }

    async fn delete_by_id(&self, id: &VehicleId) -> Result<(), VehicleStoreError> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|record| record.id() != *id);
        Ok(())
    }
}
