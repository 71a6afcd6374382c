//! Domain primitives, flows and ports.
//!
//! Purpose: define the vehicle registration entity and the two use-cases
//! built on it, the public registration flow and the staff directory flow.
//! Everything here is transport agnostic; inbound adapters translate
//! requests into flow calls and outbound adapters implement [`ports`].
//!
//! Public surface:
//! - [`VehicleRegistration`], [`NewVehicleRegistration`], [`VehicleId`] — the
//!   entity and its create payload.
//! - [`RegistrationFlow`] / [`RegistrationForm`] — public sign-up.
//! - [`DirectoryFlow`], [`apply_filters`], [`distinct_brands`] — staff panel.
//! - [`VehicleDetail`] — detail projection.
//! - [`Error`] / [`ErrorCode`] — adapter-facing error envelope.

pub mod auth;
pub mod detail;
pub mod directory;
pub mod error;
pub mod phone;
pub mod ports;
pub mod registration;
pub mod trace_id;
pub mod vehicle;

pub use self::auth::{AuthError, LoginCredentials, LoginValidationError, StaffIdentity};
pub use self::detail::{CREATED_AT_FORMAT, VehicleDetail, format_created_at};
pub use self::directory::{
    ALL_BRANDS, BrandFilter, Deletion, DirectoryError, DirectoryFilter, DirectoryFlow,
    DirectoryStats, DirectoryView, EmptyState, apply_filters, delete_prompt, distinct_brands,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::phone::format_phone;
pub use self::registration::{RegistrationError, RegistrationFlow, RegistrationForm, SubmitOutcome};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::vehicle::{
    MissingFieldError, NewVehicleRegistration, RegistrationField, VehicleId, VehicleRegistration,
};
