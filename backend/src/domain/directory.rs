//! Staff directory flow: load, search, filter, inspect and delete.
//!
//! The flow owns an in-memory snapshot of every registration. Filtering is a
//! pure function over that snapshot that callers re-run after every change
//! to the records, the search term or the brand filter.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use super::ports::{DeleteConfirmation, SessionState, VehicleStore, VehicleStoreError};
use super::{StaffIdentity, VehicleDetail, VehicleId, VehicleRegistration};

/// Brand selector value meaning "no brand filter".
pub const ALL_BRANDS: &str = "all";

/// Brand dropdown selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BrandFilter {
    /// Every brand.
    #[default]
    All,
    /// Only records whose brand matches, ignoring case.
    Brand(String),
}

impl BrandFilter {
    /// Interpret a raw selector value; missing, empty or `"all"` means
    /// [`BrandFilter::All`].
    ///
    /// # Examples
    /// ```
    /// use parking_backend::domain::BrandFilter;
    ///
    /// assert_eq!(BrandFilter::parse(Some("all")), BrandFilter::All);
    /// assert_eq!(BrandFilter::parse(Some("Honda")), BrandFilter::Brand("Honda".into()));
    /// ```
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some(ALL_BRANDS) => Self::All,
            Some(brand) => Self::Brand(brand.to_owned()),
        }
    }
}

/// Search term and brand selection applied to the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Free-text term matched against owner name, model and plate.
    pub search: String,
    /// Brand dropdown selection.
    pub brand: BrandFilter,
}

impl DirectoryFilter {
    /// Build a filter from raw query values.
    #[must_use]
    pub fn new(search: impl Into<String>, brand: BrandFilter) -> Self {
        Self {
            search: search.into(),
            brand,
        }
    }
}

/// Keep the records matching both the search term and the brand filter.
///
/// The search term is matched case-insensitively as a substring of the owner
/// name, the model or the plate; the brand is deliberately not searched. An
/// empty term matches everything.
#[must_use]
pub fn apply_filters(
    records: &[VehicleRegistration],
    filter: &DirectoryFilter,
) -> Vec<VehicleRegistration> {
    let term = filter.search.to_lowercase();
    let brand = match &filter.brand {
        BrandFilter::All => None,
        BrandFilter::Brand(brand) => Some(brand.to_lowercase()),
    };

    records
        .iter()
        .filter(|record| term.is_empty() || matches_search(record, &term))
        .filter(|record| {
            brand
                .as_deref()
                .is_none_or(|brand| record.brand().to_lowercase() == brand)
        })
        .cloned()
        .collect()
}

fn matches_search(record: &VehicleRegistration, term: &str) -> bool {
    [record.owner_name(), record.model(), record.plate()]
        .into_iter()
        .any(|value| value.to_lowercase().contains(term))
}

/// Unique brands, case-sensitive, in ascending order.
///
/// Ordering is by UTF-8 bytes, which matches code point order; it differs
/// from UTF-16 code unit order only between characters in U+E000..=U+FFFF
/// and characters above U+FFFF.
#[must_use]
pub fn distinct_brands(records: &[VehicleRegistration]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.brand())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Headline numbers shown above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    /// Registered vehicles.
    pub total_vehicles: usize,
    /// Distinct brands among them.
    pub distinct_brands: usize,
    /// Registered members; one per vehicle.
    pub registered_members: usize,
}

/// Why the filtered table is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// Nothing has been registered yet.
    NoRegistrations,
    /// Registrations exist but none match the filters.
    NoMatches,
}

/// Everything the staff table needs after a filter pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryView {
    /// Matching records, newest first.
    pub vehicles: Vec<VehicleRegistration>,
    /// Number of matching records.
    pub shown: usize,
    /// Number of records in the snapshot.
    pub total: usize,
    /// Options for the brand dropdown.
    pub brands: Vec<String>,
    /// Headline numbers.
    pub stats: DirectoryStats,
    /// Set when `vehicles` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
}

impl DirectoryView {
    /// Filter `records` and derive the surrounding figures.
    #[must_use]
    pub fn build(records: &[VehicleRegistration], filter: &DirectoryFilter) -> Self {
        let vehicles = apply_filters(records, filter);
        let brands = distinct_brands(records);
        let empty_state = match (vehicles.is_empty(), records.is_empty()) {
            (false, _) => None,
            (true, true) => Some(EmptyState::NoRegistrations),
            (true, false) => Some(EmptyState::NoMatches),
        };
        Self {
            shown: vehicles.len(),
            total: records.len(),
            stats: DirectoryStats {
                total_vehicles: records.len(),
                distinct_brands: brands.len(),
                registered_members: records.len(),
            },
            vehicles,
            brands,
            empty_state,
        }
    }
}

/// Failures surfaced by the directory flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// No staff member is signed in; send them to the sign-in page.
    #[error("sign-in required")]
    AuthenticationRequired,
    /// Session state has not been resolved yet; try again shortly.
    #[error("session is still being resolved")]
    SessionResolving,
    /// The store could not list registrations.
    #[error("could not load vehicle registrations")]
    Load(#[source] VehicleStoreError),
    /// The store could not delete the registration.
    #[error("could not delete the vehicle registration")]
    Delete(#[source] VehicleStoreError),
}

/// Outcome of a delete request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    /// The staff member declined the prompt; nothing happened.
    Declined {
        /// The question that was asked.
        prompt: String,
    },
    /// The record is gone and the snapshot has been reloaded.
    Deleted,
}

/// Question asked before deleting `record`.
#[must_use]
pub fn delete_prompt(record: &VehicleRegistration) -> String {
    format!(
        "Delete the registration for plate {} ({})?",
        record.plate(),
        record.owner_name()
    )
}

/// Staff directory use-case holding the loaded snapshot.
pub struct DirectoryFlow<S: ?Sized> {
    store: Arc<S>,
    records: RwLock<Vec<VehicleRegistration>>,
    selected: RwLock<Option<VehicleId>>,
    display_offset: FixedOffset,
}

impl<S: ?Sized> DirectoryFlow<S> {
    /// Create a flow with an empty snapshot, rendering dates in UTC.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            records: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
            display_offset: Utc.fix(),
        }
    }

    /// Render detail timestamps at `offset` instead of UTC.
    #[must_use]
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    /// Copy of the current snapshot.
    pub fn records(&self) -> Vec<VehicleRegistration> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_records(&self, records: Vec<VehicleRegistration>) {
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = records;
    }

    /// Unique brands across the snapshot.
    pub fn distinct_brands(&self) -> Vec<String> {
        distinct_brands(&self.records.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Filter the snapshot.
    pub fn apply_filters(&self, filter: &DirectoryFilter) -> Vec<VehicleRegistration> {
        apply_filters(&self.records.read().unwrap_or_else(PoisonError::into_inner), filter)
    }

    /// Filter the snapshot and derive the table figures.
    pub fn view(&self, filter: &DirectoryFilter) -> DirectoryView {
        DirectoryView::build(&self.records.read().unwrap_or_else(PoisonError::into_inner), filter)
    }

    /// Find a record in the snapshot.
    pub fn find(&self, id: VehicleId) -> Option<VehicleRegistration> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Select one record for the detail view, replacing any prior selection.
    ///
    /// Returns `None`, leaving the selection cleared, when the id is not in the
    /// snapshot.
    pub fn view_details(&self, id: VehicleId) -> Option<VehicleDetail> {
        let record = self.find(id);
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) =
            record.as_ref().map(VehicleRegistration::id);
        record.map(|record| VehicleDetail::project(&record, &self.display_offset))
    }

    /// Detail view of the selected record, if any.
    pub fn selected(&self) -> Option<VehicleDetail> {
        let id = (*self.selected.read().unwrap_or_else(PoisonError::into_inner))?;
        self.find(id)
            .map(|record| VehicleDetail::project(&record, &self.display_offset))
    }

    /// Close the detail view.
    pub fn close_details(&self) {
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

fn require_user(session: &dyn SessionState) -> Result<StaffIdentity, DirectoryError> {
    if session.is_resolving() {
        return Err(DirectoryError::SessionResolving);
    }
    session
        .current_user()
        .ok_or(DirectoryError::AuthenticationRequired)
}

impl<S> DirectoryFlow<S>
where
    S: VehicleStore + ?Sized,
{
    /// Replace the snapshot with every registration in the store.
    ///
    /// On failure the previous snapshot is kept. Returns the number of loaded
    /// records.
    pub async fn load(&self, session: &dyn SessionState) -> Result<usize, DirectoryError> {
        let user = require_user(session)?;
        match self.store.list_all().await {
            Ok(records) => {
                let count = records.len();
                self.replace_records(records);
                info!(user_id = user.user_id(), count, "vehicle directory loaded");
                Ok(count)
            }
            Err(err) => {
                error!(error = %err, "vehicle directory load failed");
                Err(DirectoryError::Load(err))
            }
        }
    }

    /// Delete `record` after the staff member confirms, then reload.
    ///
    /// Nothing is removed from the snapshot locally: a successful delete is
    /// followed by a full [`load`](Self::load), and a failed one leaves the
    /// record visible.
    pub async fn delete(
        &self,
        session: &dyn SessionState,
        record: &VehicleRegistration,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<Deletion, DirectoryError> {
        let user = require_user(session)?;
        let prompt = delete_prompt(record);
        if !confirmation.confirm(&prompt) {
            return Ok(Deletion::Declined { prompt });
        }

        if let Err(err) = self.store.delete_by_id(&record.id()).await {
            error!(error = %err, id = %record.id(), "vehicle delete failed");
            return Err(DirectoryError::Delete(err));
        }
        info!(
            user_id = user.user_id(),
            id = %record.id(),
            plate = record.plate(),
            "vehicle registration deleted"
        );

        self.load(session).await?;
        Ok(Deletion::Deleted)
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
