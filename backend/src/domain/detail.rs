//! Read-only projection of one registration for the detail view.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::{VehicleId, VehicleRegistration};

/// Day-month-year with 24-hour time, as the pt-PT locale renders it.
pub const CREATED_AT_FORMAT: &str = "%d/%m/%Y, %H:%M";

/// Render a creation timestamp for display at `offset`.
///
/// # Examples
/// ```
/// use chrono::{FixedOffset, TimeZone, Utc};
/// use parking_backend::domain::format_created_at;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 18, 5, 0).unwrap();
/// let utc = FixedOffset::east_opt(0).unwrap();
/// assert_eq!(format_created_at(at, &utc), "09/03/2024, 18:05");
/// ```
#[must_use]
pub fn format_created_at(at: DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format(CREATED_AT_FORMAT).to_string()
}

/// Every field of a registration, with the creation time formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetail {
    /// Registration identifier.
    pub id: VehicleId,
    /// Owner's full name.
    pub owner_name: String,
    /// Contact phone.
    pub phone: String,
    /// Car brand.
    pub brand: String,
    /// Car model.
    pub model: String,
    /// Licence plate.
    pub plate: String,
    /// Creation time formatted as `dd/mm/yyyy, HH:MM`.
    #[schema(example = "09/03/2024, 18:05")]
    pub registered_at: String,
}

impl VehicleDetail {
    /// Project `record`, rendering its timestamp at `offset`.
    #[must_use]
    pub fn project(record: &VehicleRegistration, offset: &FixedOffset) -> Self {
        Self {
            id: record.id(),
            owner_name: record.owner_name().to_owned(),
            phone: record.phone().to_owned(),
            brand: record.brand().to_owned(),
            model: record.model().to_owned(),
            plate: record.plate().to_owned(),
            registered_at: format_created_at(record.created_at(), offset),
        }
    }

    /// Placeholder for contacting the owner; only records the intent.
    pub fn send_information(&self) {
        info!(
            id = %self.id,
            owner = self.owner_name.as_str(),
            "send information requested"
        );
    }
}
