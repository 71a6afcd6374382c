//! Public vehicle registration flow.
//!
//! [`RegistrationForm`] holds the five fields as the visitor types them.
//! [`RegistrationFlow`] validates, normalises and submits the form to the
//! [`VehicleStore`], interpreting the store's answer. Plate uniqueness is never
//! pre-checked here: the flow submits optimistically and maps the store's
//! unique-violation error to [`RegistrationError::DuplicatePlate`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use super::ports::{VehicleStore, VehicleStoreError};
use super::{MissingFieldError, NewVehicleRegistration, format_phone};

/// Field state of the registration form; every field starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    owner_name: String,
    phone: String,
    brand: String,
    model: String,
    plate: String,
}

impl RegistrationForm {
    /// An empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the owner's name as typed.
    pub fn set_owner_name(&mut self, value: impl Into<String>) {
        self.owner_name = value.into();
    }

    /// Store the phone after regrouping its digits.
    ///
    /// # Examples
    /// ```
    /// use parking_backend::domain::RegistrationForm;
    ///
    /// let mut form = RegistrationForm::new();
    /// form.update_phone("912-345-678");
    /// assert_eq!(form.phone(), "912 345 678");
    /// ```
    pub fn update_phone(&mut self, raw: &str) {
        self.phone = format_phone(raw);
    }

    /// Store the brand as typed.
    pub fn set_brand(&mut self, value: impl Into<String>) {
        self.brand = value.into();
    }

    /// Store the model as typed.
    pub fn set_model(&mut self, value: impl Into<String>) {
        self.model = value.into();
    }

    /// Store the plate uppercased; trimming waits until submit.
    pub fn update_plate(&mut self, raw: &str) {
        self.plate = raw.to_uppercase();
    }

    /// Owner name as typed.
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// Formatted phone.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Brand as typed.
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Model as typed.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Uppercased plate.
    pub fn plate(&self) -> &str {
        &self.plate
    }

    /// Check every field and build the normalised store payload.
    pub fn validate(&self) -> Result<NewVehicleRegistration, MissingFieldError> {
        NewVehicleRegistration::try_from_parts(
            &self.owner_name,
            &self.phone,
            &self.brand,
            &self.model,
            &self.plate,
        )
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether every field is empty.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of a submission attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The store accepted the registration and the form was cleared.
    Registered,
    /// Another submission was already in flight; nothing was sent.
    Ignored,
}

/// Failures reported to the visitor. The form keeps its values for all of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// A required field is blank.
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),
    /// The store already holds a registration for this plate.
    #[error("this vehicle is already registered")]
    DuplicatePlate,
    /// Any other store or network failure.
    #[error("an unexpected error occurred while registering; please try again")]
    Submission(#[source] VehicleStoreError),
}

/// Clears the in-flight flag when dropped, however the attempt ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Registration use-case bound to one form.
pub struct RegistrationFlow<S: ?Sized> {
    store: Arc<S>,
    form: Mutex<RegistrationForm>,
    in_flight: AtomicBool,
}

impl<S: ?Sized> RegistrationFlow<S> {
    /// Create a flow with an empty form.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_form(store, RegistrationForm::new())
    }

    /// Create a flow around an already filled form.
    pub fn with_form(store: Arc<S>, form: RegistrationForm) -> Self {
        Self {
            store,
            form: Mutex::new(form),
            in_flight: AtomicBool::new(false),
        }
    }

    fn lock_form(&self) -> MutexGuard<'_, RegistrationForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply an edit to the form.
    pub fn edit(&self, apply: impl FnOnce(&mut RegistrationForm)) {
        apply(&mut self.lock_form());
    }

    /// Snapshot of the current field values.
    pub fn form(&self) -> RegistrationForm {
        self.lock_form().clone()
    }

    /// Validate the current form without submitting it.
    pub fn validate(&self) -> Result<NewVehicleRegistration, MissingFieldError> {
        self.lock_form().validate()
    }

    /// Whether a submission is currently awaiting the store.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl<S> RegistrationFlow<S>
where
    S: VehicleStore + ?Sized,
{
    /// Validate, normalise and send the form to the store.
    ///
    /// Calls made while another submission is awaiting the store return
    /// [`SubmitOutcome::Ignored`] without contacting the store.
    pub async fn submit(&self) -> Result<SubmitOutcome, RegistrationError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("registration already in flight; ignoring submit");
            return Ok(SubmitOutcome::Ignored);
        };

        let payload = {
            let form = self.lock_form();
            form.validate()?
        };

        match self.store.create(&payload).await {
            Ok(()) => {
                info!(plate = payload.plate(), "vehicle registered");
                self.lock_form().reset();
                Ok(SubmitOutcome::Registered)
            }
            Err(err) if err.is_unique_violation() => {
                warn!(plate = payload.plate(), "plate already registered");
                Err(RegistrationError::DuplicatePlate)
            }
            Err(err) => {
                error!(error = %err, "vehicle registration failed");
                Err(RegistrationError::Submission(err))
            }
        }
    }
}

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;
