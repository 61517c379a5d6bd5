//! Unit tests for the tracker commands and queries.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::confirm::MockConfirm;
use crate::error::StoreError;
use crate::model::ALL_CATEGORIES;
use crate::store::{MemoryStore, MockKeyValueStore};

const CATALOGUE: &str = r#"[
    {"category": "Bier vom Fass", "name": "Pils", "price": 4.2, "size": "0,4l"},
    {"category": "Bier vom Fass", "name": "Pils", "price": 5.4, "size": "0,5l"},
    {"category": "Heiße Getränke", "name": "Kaffee", "price": 2.5}
]"#;

struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    fn starting_at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.0.lock().expect("clock mutex");
        let current = *now;
        *now += TimeDelta::seconds(1);
        current
    }
}

fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 20, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(SteppingClock::starting_at(fixture_time()))
}

fn menu() -> StandardMenu {
    StandardMenu::from_json(CATALOGUE).expect("fixture catalogue")
}

fn open_with(store: MemoryStore, confirm: impl Confirm + 'static) -> Tracker<MemoryStore> {
    Tracker::open(store, menu(), clock(), Box::new(confirm))
}

#[fixture]
fn tracker() -> Tracker<MemoryStore> {
    open_with(MemoryStore::default(), |_: &str| true)
}

fn first_standard(tracker: &Tracker<MemoryStore>) -> Drink {
    tracker
        .standard_menu()
        .drinks()
        .first()
        .cloned()
        .expect("catalogue has drinks")
}

fn person_id(tracker: &mut Tracker<MemoryStore>, name: &str) -> PersonId {
    tracker
        .add_person(name)
        .expect("person accepted")
        .expect("non-blank name")
}

#[rstest]
fn first_person_becomes_selected(mut tracker: Tracker<MemoryStore>) {
    let alice = person_id(&mut tracker, "Alice");
    let bob = person_id(&mut tracker, "Bob");

    assert_eq!(tracker.selected_person_id(), Some(&alice));
    assert_ne!(tracker.selected_person_id(), Some(&bob));
    let names: Vec<&str> = tracker.people().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[rstest]
fn duplicate_names_are_rejected_ignoring_case(mut tracker: Tracker<MemoryStore>) {
    person_id(&mut tracker, "Alice");

    let result = tracker.add_person("  alice ");

    assert_eq!(
        result,
        Err(CommandError::DuplicatePerson {
            name: "alice".to_owned()
        })
    );
    assert_eq!(tracker.people().len(), 1);
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_names_are_ignored(mut tracker: Tracker<MemoryStore>, #[case] name: &str) {
    assert_eq!(tracker.add_person(name), Ok(None));
    assert!(tracker.people().is_empty());
    assert!(!tracker.store().contains(keys::PEOPLE));
}

#[rstest]
fn names_are_trimmed(mut tracker: Tracker<MemoryStore>) {
    person_id(&mut tracker, "  Alice  ");

    assert_eq!(
        tracker.selected_person().map(|p| p.name.as_str()),
        Some("Alice")
    );
}

#[rstest]
fn select_person_persists_the_pointer(mut tracker: Tracker<MemoryStore>) {
    person_id(&mut tracker, "Alice");
    let bob = person_id(&mut tracker, "Bob");

    tracker.select_person(bob.clone());

    assert_eq!(tracker.selected_person_id(), Some(&bob));
    assert_eq!(
        tracker.store().get(keys::SELECTED_PERSON),
        Some(format!("\"{bob}\"").as_str())
    );
}

#[rstest]
fn ordering_without_selection_fails(mut tracker: Tracker<MemoryStore>) {
    let pils = first_standard(&tracker);

    let result = tracker.add_order(&pils);

    assert_eq!(result, Err(CommandError::NoPersonSelected));
    assert!(tracker.orders().is_empty());
}

#[rstest]
fn orders_snapshot_the_drink(mut tracker: Tracker<MemoryStore>) {
    let alice = person_id(&mut tracker, "Alice");
    let pils = first_standard(&tracker);

    let order_id = tracker.add_order(&pils).expect("order placed");

    let [order] = tracker.orders() else {
        panic!("expected one order");
    };
    assert_eq!(order.id, order_id);
    assert_eq!(order.person_id, alice);
    assert_eq!(order.drink_id, pils.id);
    assert_eq!(order.drink_name, "Pils");
    assert_eq!(order.drink_size.as_deref(), Some("0,4l"));
    assert_eq!(order.timestamp, fixture_time().timestamp_millis());
    assert!(tracker.store().contains(keys::ORDERS));
}

#[rstest]
fn remove_order_is_silent_when_absent(mut tracker: Tracker<MemoryStore>) {
    person_id(&mut tracker, "Alice");
    let pils = first_standard(&tracker);
    let order_id = tracker.add_order(&pils).expect("order placed");

    assert!(tracker.remove_order(&order_id));
    assert!(!tracker.remove_order(&order_id));
    assert!(tracker.orders().is_empty());
}

#[rstest]
fn order_log_lists_newest_first(mut tracker: Tracker<MemoryStore>) {
    person_id(&mut tracker, "Alice");
    let drinks = tracker.all_drinks();
    for drink in &drinks {
        tracker.add_order(drink).expect("order placed");
    }

    let log: Vec<String> = tracker
        .order_log()
        .into_iter()
        .map(|entry| entry.drink_name)
        .collect();

    assert_eq!(log, vec!["Kaffee", "Pils", "Pils"]);
}

#[rstest]
#[case::negative("Shot", "-1", CommandError::NegativePrice { input: "-1".to_owned() })]
#[case::unparsable("Shot", "abc", CommandError::InvalidPrice { input: "abc".to_owned() })]
#[case::empty_name("", "2.00", CommandError::EmptyDrinkName)]
#[case::blank_name("   ", "2.00", CommandError::EmptyDrinkName)]
fn invalid_custom_drinks_are_rejected(
    mut tracker: Tracker<MemoryStore>,
    #[case] name: &str,
    #[case] price: &str,
    #[case] expected: CommandError,
) {
    let result = tracker.add_custom_drink(name, price, None);

    assert_eq!(result, Err(expected));
    assert!(tracker.custom_drinks().is_empty());
    assert!(!tracker.store().contains(keys::CUSTOM_DRINKS));
}

#[rstest]
fn custom_drinks_join_the_menu(mut tracker: Tracker<MemoryStore>) {
    let id = tracker
        .add_custom_drink(" Shot ", "2.50", Some(" 2cl "))
        .expect("drink accepted");

    let [shot] = tracker.custom_drinks() else {
        panic!("expected one custom drink");
    };
    assert_eq!(shot.id, id);
    assert_eq!(shot.name, "Shot");
    assert_eq!(shot.size.as_deref(), Some("2cl"));
    assert_eq!(shot.category, CUSTOM_CATEGORY);
    assert!(shot.is_custom);
    assert_eq!(tracker.all_drinks().len(), 4);
    assert_eq!(
        tracker.categories(),
        vec![ALL_CATEGORIES, "Bier vom Fass", "Heiße Getränke", CUSTOM_CATEGORY]
    );
}

#[rstest]
fn negative_zero_price_is_stored_as_zero(mut tracker: Tracker<MemoryStore>) {
    tracker
        .add_custom_drink("Water", "-0", None)
        .expect("zero price accepted");

    let water = tracker.custom_drinks().first().expect("water added");
    assert!(water.price.is_sign_positive());
    assert_eq!(crate::price::format_amount(water.price), "0.00");
    let stored = tracker
        .store()
        .get(keys::CUSTOM_DRINKS)
        .expect("custom slot written");
    assert!(stored.contains("\"price\":0.0"));
}

#[rstest]
#[case::standard_entry("pils", Some("0,4L"), "pils (0,4L)")]
#[case::sizeless_entry("KAFFEE", None, "KAFFEE")]
fn duplicate_drinks_are_rejected(
    mut tracker: Tracker<MemoryStore>,
    #[case] name: &str,
    #[case] size: Option<&str>,
    #[case] label: &str,
) {
    let result = tracker.add_custom_drink(name, "1", size);

    assert_eq!(
        result,
        Err(CommandError::DuplicateDrink {
            label: label.to_owned()
        })
    );
}

#[rstest]
fn same_name_with_new_size_is_allowed(mut tracker: Tracker<MemoryStore>) {
    tracker
        .add_custom_drink("Pils", "3.1", Some("0,2l"))
        .expect("new size accepted");
    let again = tracker.add_custom_drink("pils", "3.1", Some("0,2l"));

    assert!(matches!(again, Err(CommandError::DuplicateDrink { .. })));
    assert_eq!(tracker.custom_drinks().len(), 1);
}

#[test]
fn removing_custom_drink_keeps_orders() {
    let mut confirm = MockConfirm::new();
    confirm
        .expect_confirm()
        .withf(|prompt| prompt.contains("Shot (2cl)"))
        .times(1)
        .return_const(true);
    let mut tracker = open_with(MemoryStore::default(), confirm);
    tracker.add_person("Alice").expect("alice added");
    let shot_id = tracker
        .add_custom_drink("Shot", "2", Some("2cl"))
        .expect("drink accepted");
    let shot = tracker.custom_drinks().first().cloned().expect("shot listed");
    tracker.add_order(&shot).expect("order placed");

    let outcome = tracker.remove_custom_drink(&shot_id);

    assert_eq!(outcome, ActionOutcome::Applied);
    assert!(tracker.custom_drinks().is_empty());
    let order = tracker.orders().first().expect("order kept");
    assert_eq!(order.drink_name, "Shot");
    assert_eq!(order.drink_id, shot_id);
}

#[test]
fn declined_removal_changes_nothing() {
    let mut confirm = MockConfirm::new();
    confirm.expect_confirm().times(1).return_const(false);
    let mut tracker = open_with(MemoryStore::default(), confirm);
    let shot_id = tracker
        .add_custom_drink("Shot", "2", None)
        .expect("drink accepted");

    assert_eq!(tracker.remove_custom_drink(&shot_id), ActionOutcome::Declined);
    assert_eq!(tracker.custom_drinks().len(), 1);
}

#[test]
fn standard_drinks_cannot_be_removed() {
    let mut confirm = MockConfirm::new();
    confirm.expect_confirm().never();
    let mut tracker = open_with(MemoryStore::default(), confirm);
    let pils = first_standard(&tracker);

    assert_eq!(tracker.remove_custom_drink(&pils.id), ActionOutcome::Unchanged);
    assert_eq!(
        tracker.remove_custom_drink(&DrinkId::new("missing")),
        ActionOutcome::Unchanged
    );
    assert_eq!(tracker.standard_menu().drinks().len(), 3);
}

#[rstest]
fn reset_clears_state_and_slots(mut tracker: Tracker<MemoryStore>) {
    person_id(&mut tracker, "Alice");
    let pils = first_standard(&tracker);
    tracker.add_order(&pils).expect("order placed");
    tracker
        .add_custom_drink("Shot", "2", None)
        .expect("drink accepted");
    tracker.set_theme(Theme::Dark);

    assert_eq!(tracker.reset_all(), ActionOutcome::Applied);

    assert!(tracker.people().is_empty());
    assert!(tracker.orders().is_empty());
    assert!(tracker.custom_drinks().is_empty());
    assert_eq!(tracker.selected_person_id(), None);
    for key in [
        keys::PEOPLE,
        keys::ORDERS,
        keys::CUSTOM_DRINKS,
        keys::SELECTED_PERSON,
    ] {
        assert!(!tracker.store().contains(key), "{key} should be cleared");
    }
    assert_eq!(tracker.standard_menu().drinks().len(), 3);
    assert_eq!(tracker.theme(), Theme::Dark);
}

#[test]
fn declined_reset_keeps_everything() {
    let asked = Rc::new(Cell::new(0));
    let counter = Rc::clone(&asked);
    let mut tracker = open_with(MemoryStore::default(), move |_: &str| {
        counter.set(counter.get() + 1);
        false
    });
    tracker.add_person("Alice").expect("alice added");

    assert_eq!(tracker.reset_all(), ActionOutcome::Declined);
    assert_eq!(asked.get(), 1);
    assert_eq!(tracker.people().len(), 1);
    assert!(tracker.selected_person().is_some());
}

#[test]
fn state_survives_reopening() {
    let mut tracker = open_with(MemoryStore::default(), |_: &str| true);
    tracker.add_person("Alice").expect("alice added");
    tracker.add_person("Bob").expect("bob added");
    let pils = first_standard(&tracker);
    tracker.add_order(&pils).expect("order placed");
    tracker
        .add_custom_drink("Shot", "2", Some("2cl"))
        .expect("drink accepted");
    tracker.toggle_theme();
    let people = tracker.people().to_vec();
    let orders = tracker.orders().to_vec();
    let custom = tracker.custom_drinks().to_vec();
    let selected = tracker.selected_person_id().cloned();
    let store = tracker.store().clone();

    let reopened = open_with(store, |_: &str| true);

    assert_eq!(reopened.people(), people.as_slice());
    assert_eq!(reopened.orders(), orders.as_slice());
    assert_eq!(reopened.custom_drinks(), custom.as_slice());
    assert_eq!(reopened.selected_person_id(), selected.as_ref());
    assert_eq!(reopened.theme(), Theme::Dark);
}

#[test]
fn stale_selection_is_dropped_on_open() {
    let mut store = MemoryStore::default();
    store
        .write(keys::PEOPLE, r#"[{"id": "p1", "name": "Alice"}]"#)
        .expect("seed people");
    store
        .write(keys::SELECTED_PERSON, "\"gone\"")
        .expect("seed selection");

    let tracker = open_with(store, |_: &str| true);

    assert_eq!(tracker.selected_person_id(), None);
    assert!(!tracker.store().contains(keys::SELECTED_PERSON));
}

#[rstest]
#[case::json_string("\"p1\"")]
#[case::bare_id("p1")]
fn stored_selection_is_restored(#[case] raw: &str) {
    let mut store = MemoryStore::default();
    store
        .write(keys::PEOPLE, r#"[{"id": "p1", "name": "Alice"}]"#)
        .expect("seed people");
    store
        .write(keys::SELECTED_PERSON, raw)
        .expect("seed selection");

    let tracker = open_with(store, |_: &str| true);

    assert_eq!(
        tracker.selected_person().map(|p| p.name.as_str()),
        Some("Alice")
    );
}

#[test]
fn malformed_slots_start_empty() {
    let mut store = MemoryStore::default();
    store.write(keys::PEOPLE, "{oops").expect("seed people");
    store.write(keys::ORDERS, "42").expect("seed orders");
    store.write(keys::THEME, "\"sepia\"").expect("seed theme");

    let tracker = open_with(store, |_: &str| true);

    assert!(tracker.people().is_empty());
    assert!(tracker.orders().is_empty());
    assert_eq!(tracker.theme(), Theme::Light);
}

#[test]
fn a_priceless_record_keeps_the_rest_of_its_slot() {
    let mut store = MemoryStore::default();
    store
        .write(
            keys::ORDERS,
            r#"[
                {"id": "o1", "personId": "p1", "drinkId": "d1", "drinkName": "Pils",
                 "price": 4.2, "timestamp": 1000},
                {"id": "o2", "personId": "p1", "drinkId": "d2", "drinkName": "Kaffee",
                 "timestamp": 2000}
            ]"#,
        )
        .expect("seed orders");
    store
        .write(
            keys::CUSTOM_DRINKS,
            r#"[{"id": "d9", "category": "Custom Items", "name": "Shot"}]"#,
        )
        .expect("seed drinks");

    let tracker = open_with(store, |_: &str| true);

    assert_eq!(tracker.orders().len(), 2);
    assert_eq!(tracker.custom_drinks().len(), 1);
    assert_eq!(
        crate::price::format_amount(tracker.summary().grand_total),
        "4.20"
    );
}

#[test]
fn stored_custom_drinks_are_flagged_custom() {
    let mut store = MemoryStore::default();
    store
        .write(
            keys::CUSTOM_DRINKS,
            r#"[{"id": "d1", "category": "Custom Items", "name": "Shot", "price": "2"}]"#,
        )
        .expect("seed drinks");

    let tracker = open_with(store, |_: &str| true);

    let shot = tracker.custom_drinks().first().expect("shot loaded");
    assert!(shot.is_custom);
    assert_eq!(format!("{:.2}", shot.price), "2.00");
}

#[rstest]
fn theme_toggles_and_persists(mut tracker: Tracker<MemoryStore>) {
    assert_eq!(tracker.theme(), Theme::Light);

    assert_eq!(tracker.toggle_theme(), Theme::Dark);
    assert_eq!(tracker.store().get(keys::THEME), Some("\"dark\""));

    tracker.set_theme(Theme::Light);
    assert_eq!(tracker.store().get(keys::THEME), Some("\"light\""));
}

#[rstest]
fn summary_follows_orders(mut tracker: Tracker<MemoryStore>) {
    person_id(&mut tracker, "Alice");
    let pils = first_standard(&tracker);
    tracker.add_order(&pils).expect("first order");
    tracker.add_order(&pils).expect("second order");

    let summary = tracker.summary();

    let alice = summary.people.first().expect("alice summarised");
    assert_eq!(alice.total_count, 2);
    assert_eq!(crate::price::format_amount(alice.total_cost), "8.40");
    assert_eq!(alice.drinks.first().map(|d| d.count), Some(2));
}

#[test]
fn write_failures_keep_memory_authoritative() {
    let mut store = MockKeyValueStore::new();
    store.expect_read().returning(|_| Ok(None));
    store.expect_write().returning(|key, _| {
        Err(StoreError::WriteError {
            path: format!("{key}.json").into(),
            message: "read-only file system".to_owned(),
        })
    });
    store.expect_remove().returning(|_| Ok(()));
    let mut tracker = Tracker::open(store, menu(), clock(), Box::new(|_: &str| true));

    let alice = tracker
        .add_person("Alice")
        .expect("command succeeds")
        .expect("non-blank name");

    assert_eq!(tracker.selected_person_id(), Some(&alice));
    assert_eq!(tracker.people().len(), 1);
}
