//! Tests for the registration flow.

use std::sync::atomic::AtomicUsize;

use async_trait::async_trait;
use mockall::predicate::function;
use rstest::{fixture, rstest};
use tokio::sync::Notify;

use super::*;
use crate::domain::ports::MockVehicleStore;
use crate::domain::{RegistrationField, VehicleId, VehicleRegistration};

#[fixture]
fn filled_form() -> RegistrationForm {
    let mut form = RegistrationForm::new();
    form.set_owner_name(" Ana Silva ");
    form.update_phone("912345678");
    form.set_brand("Toyota");
    form.set_model("Corolla");
    form.update_plate(" 12-ab-34 ");
    form
}

fn flow_with(store: MockVehicleStore, form: RegistrationForm) -> RegistrationFlow<MockVehicleStore> {
    RegistrationFlow::with_form(Arc::new(store), form)
}

#[rstest]
fn form_starts_empty() {
    assert!(RegistrationForm::new().is_empty());
}

#[rstest]
fn update_plate_uppercases_without_trimming() {
    let mut form = RegistrationForm::new();
    form.update_plate(" 12-ab-34 ");
    assert_eq!(form.plate(), " 12-AB-34 ");
}

#[rstest]
#[case(RegistrationField::OwnerName)]
#[case(RegistrationField::Phone)]
#[case(RegistrationField::Brand)]
#[case(RegistrationField::Model)]
#[case(RegistrationField::Plate)]
#[tokio::test]
async fn blank_field_is_reported_and_store_is_not_called(
    filled_form: RegistrationForm,
    #[case] blank: RegistrationField,
) {
    let mut form = filled_form;
    match blank {
        RegistrationField::OwnerName => form.set_owner_name("   "),
        RegistrationField::Phone => form.update_phone("abc"),
        RegistrationField::Brand => form.set_brand(""),
        RegistrationField::Model => form.set_model("\t"),
        RegistrationField::Plate => form.update_plate("  "),
    }
    let mut store = MockVehicleStore::new();
    store.expect_create().times(0);

    let flow = flow_with(store, form.clone());
    let err = flow.submit().await.expect_err("blank field must fail");

    assert_eq!(err, RegistrationError::MissingField(MissingFieldError::new(blank)));
    assert_eq!(flow.form(), form, "fields are kept after a validation failure");
    assert!(!flow.is_submitting());
}

#[rstest]
#[tokio::test]
async fn success_submits_normalised_payload_and_clears_form(filled_form: RegistrationForm) {
    let mut store = MockVehicleStore::new();
    store
        .expect_create()
        .with(function(|payload: &NewVehicleRegistration| {
            payload.owner_name() == "Ana Silva"
                && payload.phone() == "912 345 678"
                && payload.brand() == "Toyota"
                && payload.model() == "Corolla"
                && payload.plate() == "12-AB-34"
        }))
        .times(1)
        .return_once(|_| Ok(()));

    let flow = flow_with(store, filled_form);
    let outcome = flow.submit().await.expect("registration succeeds");

    assert_eq!(outcome, SubmitOutcome::Registered);
    assert!(flow.form().is_empty());
}

#[rstest]
#[tokio::test]
async fn unique_violation_maps_to_duplicate_plate_and_keeps_fields(filled_form: RegistrationForm) {
    let mut store = MockVehicleStore::new();
    store
        .expect_create()
        .times(1)
        .return_once(|_| Err(VehicleStoreError::unique_violation("matricula_carro")));

    let flow = flow_with(store, filled_form.clone());
    let err = flow.submit().await.expect_err("duplicate plate");

    assert_eq!(err, RegistrationError::DuplicatePlate);
    assert_eq!(flow.form(), filled_form);
}

#[rstest]
#[case(VehicleStoreError::connection("refused"))]
#[case(VehicleStoreError::query("permission denied"))]
#[tokio::test]
async fn other_failures_map_to_submission_error_and_keep_fields(
    filled_form: RegistrationForm,
    #[case] failure: VehicleStoreError,
) {
    let expected = failure.clone();
    let mut store = MockVehicleStore::new();
    store.expect_create().times(1).return_once(move |_| Err(failure));

    let flow = flow_with(store, filled_form.clone());
    let err = flow.submit().await.expect_err("store failure");

    assert_eq!(err, RegistrationError::Submission(expected));
    assert_eq!(flow.form(), filled_form);
}

#[rstest]
#[tokio::test]
async fn in_flight_flag_is_cleared_after_failure(filled_form: RegistrationForm) {
    let mut store = MockVehicleStore::new();
    store
        .expect_create()
        .times(2)
        .returning(|_| Err(VehicleStoreError::connection("refused")));

    let flow = flow_with(store, filled_form);
    assert!(flow.submit().await.is_err());
    assert!(!flow.is_submitting());
    assert!(flow.submit().await.is_err(), "second attempt reaches the store");
}

/// Store whose `create` waits until the test releases it.
struct GatedStore {
    gate: Arc<Notify>,
    creates: AtomicUsize,
}

#[async_trait]
impl VehicleStore for GatedStore {
    async fn create(&self, _registration: &NewVehicleRegistration) -> Result<(), VehicleStoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<VehicleRegistration>, VehicleStoreError> {
        Ok(Vec::new())
    }

    async fn delete_by_id(&self, _id: &VehicleId) -> Result<(), VehicleStoreError> {
        Ok(())
    }
}

#[rstest]
#[tokio::test]
async fn concurrent_submit_is_ignored_while_in_flight(filled_form: RegistrationForm) {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(GatedStore {
        gate: Arc::clone(&gate),
        creates: AtomicUsize::new(0),
    });
    let flow = RegistrationFlow::with_form(Arc::clone(&store), filled_form);

    let (first, second, ()) = tokio::join!(flow.submit(), flow.submit(), async {
        gate.notify_one();
    });

    assert_eq!(first, Ok(SubmitOutcome::Registered));
    assert_eq!(second, Ok(SubmitOutcome::Ignored));
    assert_eq!(store.creates.load(Ordering::SeqCst), 1);
    assert!(!flow.is_submitting());
}

#[rstest]
fn edit_applies_changes_through_the_flow() {
    let flow = RegistrationFlow::new(Arc::new(MockVehicleStore::new()));
    flow.edit(|form| form.update_phone("+351 912 345 678"));
    assert_eq!(flow.form().phone(), "+351 912 345 678");
    assert_eq!(
        flow.validate().expect_err("other fields blank").field(),
        RegistrationField::OwnerName
    );
}
