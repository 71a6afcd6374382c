//! Vehicle registration entity and its normalised create payload.
//!
//! A registration ties one owner to one vehicle. The store assigns `id` and
//! `created_at`; callers only ever build a [`NewVehicleRegistration`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Store-assigned registration identifier.
///
/// # Examples
/// ```
/// use parking_backend::domain::VehicleId;
///
/// let id: VehicleId = "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().unwrap();
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct VehicleId(Uuid);

impl VehicleId {
    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier. Only stores should call this.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VehicleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The five user-entered fields, in the order they are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationField {
    /// Full name of the vehicle owner.
    OwnerName,
    /// Contact phone number.
    Phone,
    /// Car brand.
    Brand,
    /// Car model.
    Model,
    /// Licence plate.
    Plate,
}

impl RegistrationField {
    /// Validation order.
    pub const ORDER: [Self; 5] = [
        Self::OwnerName,
        Self::Phone,
        Self::Brand,
        Self::Model,
        Self::Plate,
    ];

    /// Wire name used in JSON payloads and error details.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OwnerName => "ownerName",
            Self::Phone => "phone",
            Self::Brand => "brand",
            Self::Model => "model",
            Self::Plate => "plate",
        }
    }

    /// Human-readable label shown to the visitor.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OwnerName => "full name",
            Self::Phone => "phone number",
            Self::Brand => "brand",
            Self::Model => "model",
            Self::Plate => "licence plate",
        }
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A required field was blank once trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("please fill in the {} field", .field.label())]
pub struct MissingFieldError {
    field: RegistrationField,
}

impl MissingFieldError {
    /// Build the error for `field`.
    #[must_use]
    pub fn new(field: RegistrationField) -> Self {
        Self { field }
    }

    /// The first blank field in validation order.
    #[must_use]
    pub fn field(&self) -> RegistrationField {
        self.field
    }
}

/// Normalised payload submitted to the store when registering a vehicle.
///
/// ## Invariants
/// - Every field is trimmed and non-empty.
/// - `plate` is uppercase.
///
/// # Examples
/// ```
/// use parking_backend::domain::NewVehicleRegistration;
///
/// let payload = NewVehicleRegistration::try_from_parts(
///     " Ana Silva ",
///     "912 345 678",
///     "Toyota",
///     "Corolla",
///     " 12-ab-34 ",
/// )
/// .unwrap();
/// assert_eq!(payload.owner_name(), "Ana Silva");
/// assert_eq!(payload.plate(), "12-AB-34");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicleRegistration {
    owner_name: String,
    phone: String,
    brand: String,
    model: String,
    plate: String,
}

impl NewVehicleRegistration {
    /// Validate and normalise raw field values.
    ///
    /// Reports only the first blank field, in [`RegistrationField::ORDER`].
    pub fn try_from_parts(
        owner_name: &str,
        phone: &str,
        brand: &str,
        model: &str,
        plate: &str,
    ) -> Result<Self, MissingFieldError> {
        let values = [owner_name, phone, brand, model, plate];
        for (field, value) in RegistrationField::ORDER.into_iter().zip(values) {
            if value.trim().is_empty() {
                return Err(MissingFieldError::new(field));
            }
        }

        Ok(Self {
            owner_name: owner_name.trim().to_owned(),
            phone: phone.trim().to_owned(),
            brand: brand.trim().to_owned(),
            model: model.trim().to_owned(),
            plate: plate.trim().to_uppercase(),
        })
    }

    /// Owner's full name.
    pub fn owner_name(&self) -> &str {
        self.owner_name.as_str()
    }

    /// Contact phone.
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    /// Car brand.
    pub fn brand(&self) -> &str {
        self.brand.as_str()
    }

    /// Car model.
    pub fn model(&self) -> &str {
        self.model.as_str()
    }

    /// Uppercase licence plate.
    pub fn plate(&self) -> &str {
        self.plate.as_str()
    }
}

/// A stored vehicle registration.
///
/// Serialises with camelCase keys for the HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRegistration {
    id: VehicleId,
    #[schema(example = "Ana Silva")]
    owner_name: String,
    #[schema(example = "912 345 678")]
    phone: String,
    #[schema(example = "Toyota")]
    brand: String,
    #[schema(example = "Corolla")]
    model: String,
    #[schema(example = "12-AB-34")]
    plate: String,
    created_at: DateTime<Utc>,
}

impl VehicleRegistration {
    /// Assemble a stored record from a validated payload and store metadata.
    #[must_use]
    pub fn new(id: VehicleId, payload: NewVehicleRegistration, created_at: DateTime<Utc>) -> Self {
        let NewVehicleRegistration {
            owner_name,
            phone,
            brand,
            model,
            plate,
        } = payload;
        Self {
            id,
            owner_name,
            phone,
            brand,
            model,
            plate,
            created_at,
        }
    }

    /// Rebuild a record from a stored row, keeping every column as stored.
    ///
    /// Rows may predate the submission rules, so nothing is trimmed,
    /// upper-cased or rejected here.
    #[must_use]
    pub fn from_stored(
        id: VehicleId,
        owner_name: impl Into<String>,
        phone: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        plate: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_name: owner_name.into(),
            phone: phone.into(),
            brand: brand.into(),
            model: model.into(),
            plate: plate.into(),
            created_at,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Owner's full name.
    pub fn owner_name(&self) -> &str {
        self.owner_name.as_str()
    }

    /// Contact phone.
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    /// Car brand, as entered.
    pub fn brand(&self) -> &str {
        self.brand.as_str()
    }

    /// Car model.
    pub fn model(&self) -> &str {
        self.model.as_str()
    }

    /// Licence plate.
    pub fn plate(&self) -> &str {
        self.plate.as_str()
    }

    /// Store-assigned creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
