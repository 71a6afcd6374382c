//! Tests for the staff directory flow.

use chrono::{Duration, TimeZone};
use mockall::Sequence;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::NewVehicleRegistration;
use crate::domain::ports::MockVehicleStore;

fn record(owner: &str, brand: &str, model: &str, plate: &str, age_minutes: i64) -> VehicleRegistration {
    let payload = NewVehicleRegistration::try_from_parts(owner, "912 345 678", brand, model, plate)
        .expect("valid payload");
    let base = Utc
        .with_ymd_and_hms(2025, 6, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp");
    VehicleRegistration::new(VehicleId::random(), payload, base - Duration::minutes(age_minutes))
}

#[fixture]
fn records() -> Vec<VehicleRegistration> {
    vec![
        record("Ana Silva", "Toyota", "Corolla", "12-AB-34", 0),
        record("Bruno Costa", "Honda", "Civic", "56-CD-78", 5),
    ]
}

fn staff() -> Option<StaffIdentity> {
    Some(StaffIdentity::new("user-1", "obreiro@example.org"))
}

struct Resolving;

impl SessionState for Resolving {
    fn current_user(&self) -> Option<StaffIdentity> {
        None
    }

    fn is_resolving(&self) -> bool {
        true
    }
}

/// Records every prompt it is shown.
struct RecordingConfirmation {
    answer: bool,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl RecordingConfirmation {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

impl DeleteConfirmation for RecordingConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().expect("prompts lock").push(prompt.to_owned());
        self.answer
    }
}

/// Mock store whose first `list_all` returns `records`.
fn seeded_store(records: Vec<VehicleRegistration>, seq: &mut Sequence) -> MockVehicleStore {
    let mut store = MockVehicleStore::new();
    store
        .expect_list_all()
        .times(1)
        .in_sequence(seq)
        .return_once(move || Ok(records));
    store
}

async fn loaded_flow(store: MockVehicleStore) -> DirectoryFlow<MockVehicleStore> {
    let flow = DirectoryFlow::new(Arc::new(store));
    flow.load(&staff()).await.expect("initial load");
    flow
}

fn search(term: &str) -> DirectoryFilter {
    DirectoryFilter::new(term, BrandFilter::All)
}

fn plates(records: &[VehicleRegistration]) -> Vec<&str> {
    records.iter().map(VehicleRegistration::plate).collect()
}

#[rstest]
fn search_matches_model_substring(records: Vec<VehicleRegistration>) {
    let filtered = apply_filters(&records, &search("civ"));
    assert_eq!(plates(&filtered), ["56-CD-78"]);
}

#[rstest]
fn search_excludes_brand(records: Vec<VehicleRegistration>) {
    assert!(apply_filters(&records, &search("toy")).is_empty());
}

#[rstest]
#[case("ANA", &["12-AB-34"])]
#[case("cd-7", &["56-CD-78"])]
#[case("", &["12-AB-34", "56-CD-78"])]
#[case("zzz", &[])]
fn search_is_case_insensitive_over_name_model_and_plate(
    records: Vec<VehicleRegistration>,
    #[case] term: &str,
    #[case] expected: &[&str],
) {
    assert_eq!(plates(&apply_filters(&records, &search(term))), expected);
}

#[rstest]
#[case("honda", &["56-CD-78"])]
#[case("HONDA", &["56-CD-78"])]
#[case("Hond", &[])]
fn brand_filter_is_exact_and_case_insensitive(
    records: Vec<VehicleRegistration>,
    #[case] brand: &str,
    #[case] expected: &[&str],
) {
    let filter = DirectoryFilter::new("", BrandFilter::Brand(brand.to_owned()));
    assert_eq!(plates(&apply_filters(&records, &filter)), expected);
}

#[rstest]
fn search_and_brand_compose_with_and(records: Vec<VehicleRegistration>) {
    let filter = DirectoryFilter::new("civ", BrandFilter::Brand("Toyota".to_owned()));
    assert!(apply_filters(&records, &filter).is_empty());
}

#[rstest]
fn filtering_is_idempotent(records: Vec<VehicleRegistration>) {
    let filter = DirectoryFilter::new("a", BrandFilter::Brand("toyota".to_owned()));
    let first = apply_filters(&records, &filter);
    let second = apply_filters(&records, &filter);
    assert_eq!(first, second);
    assert_eq!(records.len(), 2, "input is untouched");
}

#[rstest]
fn distinct_brands_are_case_sensitive_and_sorted() {
    let records = vec![
        record("A", "Toyota", "Yaris", "AA-00-01", 0),
        record("B", "honda", "Jazz", "AA-00-02", 1),
        record("C", "Toyota", "Corolla", "AA-00-03", 2),
    ];
    assert_eq!(distinct_brands(&records), ["Toyota", "honda"]);
}

#[rstest]
fn distinct_brands_follow_code_point_order() {
    let records = vec![
        record("A", "\u{1F697}car", "Yaris", "AA-00-01", 0),
        record("B", "\u{FFFD}", "Jazz", "AA-00-02", 1),
        record("C", "Zebra", "Corolla", "AA-00-03", 2),
        record("D", "\u{c9}zio", "Ibiza", "AA-00-04", 3),
    ];
    assert_eq!(
        distinct_brands(&records),
        ["Zebra", "\u{c9}zio", "\u{FFFD}", "\u{1F697}car"]
    );
}

#[rstest]
#[case(None, BrandFilter::All)]
#[case(Some(""), BrandFilter::All)]
#[case(Some("all"), BrandFilter::All)]
#[case(Some("Seat"), BrandFilter::Brand("Seat".to_owned()))]
fn brand_filter_parses_sentinel(#[case] raw: Option<&str>, #[case] expected: BrandFilter) {
    assert_eq!(BrandFilter::parse(raw), expected);
}

#[rstest]
fn view_reports_figures_and_empty_states(records: Vec<VehicleRegistration>) {
    let view = DirectoryView::build(&records, &search("civ"));
    assert_eq!((view.shown, view.total), (1, 2));
    assert_eq!(view.brands, ["Honda", "Toyota"]);
    assert_eq!(
        view.stats,
        DirectoryStats {
            total_vehicles: 2,
            distinct_brands: 2,
            registered_members: 2,
        }
    );
    assert_eq!(view.empty_state, None);

    let no_match = DirectoryView::build(&records, &search("zzz"));
    assert_eq!(no_match.empty_state, Some(EmptyState::NoMatches));

    let nothing = DirectoryView::build(&[], &DirectoryFilter::default());
    assert_eq!(nothing.empty_state, Some(EmptyState::NoRegistrations));
}

#[rstest]
#[tokio::test]
async fn load_without_user_requires_authentication() {
    let mut store = MockVehicleStore::new();
    store.expect_list_all().times(0);
    let flow = DirectoryFlow::new(Arc::new(store));

    let err = flow.load(&None::<StaffIdentity>).await.expect_err("no session");
    assert_eq!(err, DirectoryError::AuthenticationRequired);
}

#[rstest]
#[tokio::test]
async fn load_waits_while_session_is_resolving() {
    let mut store = MockVehicleStore::new();
    store.expect_list_all().times(0);
    let flow = DirectoryFlow::new(Arc::new(store));

    let err = flow.load(&Resolving).await.expect_err("still resolving");
    assert_eq!(err, DirectoryError::SessionResolving);
}

#[rstest]
#[tokio::test]
async fn load_replaces_snapshot_in_store_order(records: Vec<VehicleRegistration>) {
    let mut seq = Sequence::new();
    let flow = loaded_flow(seeded_store(records.clone(), &mut seq)).await;
    assert_eq!(flow.records(), records);
    assert_eq!(flow.distinct_brands(), ["Honda", "Toyota"]);
    assert_eq!(plates(&flow.apply_filters(&search("civ"))), ["56-CD-78"]);
}

#[rstest]
#[tokio::test]
async fn failed_load_keeps_previous_snapshot(records: Vec<VehicleRegistration>) {
    let mut seq = Sequence::new();
    let mut store = seeded_store(records.clone(), &mut seq);
    store
        .expect_list_all()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|| Err(VehicleStoreError::connection("timeout")));
    let flow = loaded_flow(store).await;

    let err = flow.load(&staff()).await.expect_err("second load fails");

    assert!(matches!(err, DirectoryError::Load(_)));
    assert_eq!(flow.records(), records);
}

#[rstest]
#[tokio::test]
async fn declined_delete_leaves_store_and_snapshot_alone(records: Vec<VehicleRegistration>) {
    let mut seq = Sequence::new();
    let target = records[0].clone();
    let mut store = seeded_store(records, &mut seq);
    store.expect_delete_by_id().times(0);
    let flow = loaded_flow(store).await;
    let confirmation = RecordingConfirmation::answering(false);

    let outcome = flow
        .delete(&staff(), &target, &confirmation)
        .await
        .expect("decline is not an error");

    let expected_prompt = "Delete the registration for plate 12-AB-34 (Ana Silva)?".to_owned();
    assert_eq!(outcome, Deletion::Declined { prompt: expected_prompt.clone() });
    assert_eq!(confirmation.prompts(), [expected_prompt]);
    assert!(flow.find(target.id()).is_some());
}

#[rstest]
#[tokio::test]
async fn failed_delete_keeps_record_visible(records: Vec<VehicleRegistration>) {
    let mut seq = Sequence::new();
    let target = records[0].clone();
    let mut store = seeded_store(records, &mut seq);
    store
        .expect_delete_by_id()
        .with(eq(target.id()))
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Err(VehicleStoreError::query("permission denied")));
    let flow = loaded_flow(store).await;

    let err = flow
        .delete(&staff(), &target, &true)
        .await
        .expect_err("store failure");

    assert!(matches!(err, DirectoryError::Delete(_)));
    assert!(flow.find(target.id()).is_some());
    assert_eq!(flow.records().len(), 2);
}

#[rstest]
#[tokio::test]
async fn confirmed_delete_reloads_from_store(records: Vec<VehicleRegistration>) {
    let mut seq = Sequence::new();
    let target = records[0].clone();
    let remaining = vec![records[1].clone()];
    let mut store = MockVehicleStore::new();
    store
        .expect_list_all()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || Ok(records));
    store
        .expect_delete_by_id()
        .with(eq(target.id()))
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(()));
    store
        .expect_list_all()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || Ok(remaining));
    let flow = DirectoryFlow::new(Arc::new(store));
    flow.load(&staff()).await.expect("initial load");

    let outcome = flow
        .delete(&staff(), &target, &true)
        .await
        .expect("delete succeeds");

    assert_eq!(outcome, Deletion::Deleted);
    assert!(flow.find(target.id()).is_none());
    assert_eq!(flow.records().len(), 1);
}

#[rstest]
#[tokio::test]
async fn delete_without_user_requires_authentication(records: Vec<VehicleRegistration>) {
    let mut store = MockVehicleStore::new();
    store.expect_delete_by_id().times(0);
    let flow = DirectoryFlow::new(Arc::new(store));

    let err = flow
        .delete(&None::<StaffIdentity>, &records[0], &true)
        .await
        .expect_err("no session");
    assert_eq!(err, DirectoryError::AuthenticationRequired);
}

#[rstest]
#[tokio::test]
async fn detail_selection_holds_one_record_at_a_time(records: Vec<VehicleRegistration>) {
    let mut seq = Sequence::new();
    let first = records[0].id();
    let second = records[1].id();
    let flow = loaded_flow(seeded_store(records, &mut seq)).await;

    let detail = flow.view_details(first).expect("known id");
    assert_eq!(detail.plate, "12-AB-34");
    assert_eq!(detail.registered_at, "01/06/2025, 10:00");

    flow.view_details(second).expect("known id");
    assert_eq!(flow.selected().map(|detail| detail.id), Some(second));

    flow.close_details();
    assert!(flow.selected().is_none());

    assert!(flow.view_details(VehicleId::random()).is_none());
    assert!(flow.selected().is_none());
}

#[rstest]
#[tokio::test]
async fn detail_view_uses_configured_offset(records: Vec<VehicleRegistration>) {
    let mut seq = Sequence::new();
    let id = records[0].id();
    let mut store = MockVehicleStore::new();
    store
        .expect_list_all()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || Ok(records));
    let offset = FixedOffset::east_opt(3600).expect("valid offset");
    let flow = DirectoryFlow::new(Arc::new(store)).with_display_offset(offset);
    flow.load(&staff()).await.expect("load");

    let detail = flow.view_details(id).expect("known id");
    assert_eq!(detail.registered_at, "01/06/2025, 11:00");
}
