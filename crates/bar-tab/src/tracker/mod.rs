//! The tab's state container.
//!
//! [`Tracker`] owns people, orders, custom drinks, the selection pointer and
//! the theme. Every mutation goes through one of its commands, which validate
//! input, update memory, then write the touched slot. In-memory state is
//! authoritative: a failed write is logged and the command still reports its
//! domain outcome.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::confirm::Confirm;
use crate::error::CommandError;
use crate::ids::{DrinkId, OrderId, PersonId};
use crate::menu::{self, StandardMenu};
use crate::model::{CUSTOM_CATEGORY, Drink, Order, Person, Theme, drink_label};
use crate::price::parse_price;
use crate::store::{JsonSlots, KeyValueStore, keys};
use crate::summary::{self, OrderLogEntry, Summary};

/// Result of a command guarded by the confirmation hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action was confirmed and state changed.
    Applied,
    /// The confirmation was declined; nothing changed.
    Declined,
    /// There was nothing to act on; nothing changed.
    Unchanged,
}

/// Bar-tab state manager.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use bar_tab::{MemoryStore, StandardMenu, Tracker};
/// use mockable::DefaultClock;
///
/// let menu = StandardMenu::from_json(
///     r#"[{"category": "Bier vom Fass", "name": "Pils", "price": 4.2, "size": "0,4l"}]"#,
/// )
/// .expect("valid catalogue");
/// let mut tracker = Tracker::open(
///     MemoryStore::default(),
///     menu,
///     Arc::new(DefaultClock),
///     Box::new(|_: &str| true),
/// );
///
/// tracker.add_person("Alice").expect("alice added");
/// let pils = tracker.all_drinks().remove(0);
/// tracker.add_order(&pils).expect("order placed");
///
/// assert_eq!(tracker.summary().people[0].total_count, 1);
/// ```
pub struct Tracker<S> {
    slots: JsonSlots<S>,
    standard: StandardMenu,
    people: Vec<Person>,
    orders: Vec<Order>,
    custom_drinks: Vec<Drink>,
    selected: Option<PersonId>,
    theme: Theme,
    clock: Arc<dyn Clock>,
    confirm: Box<dyn Confirm>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Loads persisted state from `store` and reconciles it.
    ///
    /// Missing or malformed slots start empty. A stored selection that no
    /// longer names a registered person is dropped and its slot removed.
    #[must_use]
    pub fn open(
        store: S,
        standard: StandardMenu,
        clock: Arc<dyn Clock>,
        confirm: Box<dyn Confirm>,
    ) -> Self {
        let slots = JsonSlots::new(store);
        let people: Vec<Person> = slots.load_or_default(keys::PEOPLE);
        let orders: Vec<Order> = slots.load_or_default(keys::ORDERS);
        let custom_drinks = slots
            .load_or_default::<Vec<Drink>>(keys::CUSTOM_DRINKS)
            .into_iter()
            .map(|drink| Drink {
                is_custom: true,
                ..drink
            })
            .collect();
        let theme = slots.load_or_default(keys::THEME);
        let selected = load_selection(&slots);

        let mut tracker = Self {
            slots,
            standard,
            people,
            orders,
            custom_drinks,
            selected,
            theme,
            clock,
            confirm,
        };
        tracker.reconcile_selection();
        debug!(
            people = tracker.people.len(),
            orders = tracker.orders.len(),
            custom_drinks = tracker.custom_drinks.len(),
            "tracker state loaded"
        );
        tracker
    }

    /// Registers a person.
    ///
    /// Blank names are ignored (`Ok(None)`). The first person added while
    /// nobody is selected becomes the selection.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::DuplicatePerson`] when the name is already
    /// taken, ignoring case.
    pub fn add_person(&mut self, name: &str) -> Result<Option<PersonId>, CommandError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let lowered = trimmed.to_lowercase();
        if self
            .people
            .iter()
            .any(|person| person.name.to_lowercase() == lowered)
        {
            debug!(name = trimmed, "duplicate person rejected");
            return Err(CommandError::DuplicatePerson {
                name: trimmed.to_owned(),
            });
        }

        let id = PersonId::random();
        self.people.push(Person {
            id: id.clone(),
            name: trimmed.to_owned(),
        });
        persist(&mut self.slots, keys::PEOPLE, &self.people);
        info!(person_id = %id, "person added");

        if self.selected.is_none() {
            self.select_person(id.clone());
        }
        self.reconcile_selection();
        Ok(Some(id))
    }

    /// Points the selection at `id`.
    pub fn select_person(&mut self, id: PersonId) {
        persist(&mut self.slots, keys::SELECTED_PERSON, &id);
        self.selected = Some(id);
    }

    /// Bills `drink` to the selected person.
    ///
    /// The order copies the drink's name, size and price so later menu
    /// changes never rewrite history.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NoPersonSelected`] when nobody is selected.
    pub fn add_order(&mut self, drink: &Drink) -> Result<OrderId, CommandError> {
        let Some(person_id) = self.selected.clone() else {
            return Err(CommandError::NoPersonSelected);
        };

        let id = OrderId::random();
        self.orders.push(Order {
            id: id.clone(),
            person_id,
            drink_id: drink.id.clone(),
            drink_name: drink.name.clone(),
            drink_size: drink.size.clone(),
            price: drink.price,
            timestamp: self.clock.utc().timestamp_millis(),
        });
        persist(&mut self.slots, keys::ORDERS, &self.orders);
        info!(order_id = %id, drink_id = %drink.id, "order added");
        Ok(id)
    }

    /// Removes an order; returns whether one was found.
    pub fn remove_order(&mut self, id: &OrderId) -> bool {
        let before = self.orders.len();
        self.orders.retain(|order| &order.id != id);
        let removed = self.orders.len() != before;
        persist(&mut self.slots, keys::ORDERS, &self.orders);
        if removed {
            info!(order_id = %id, "order removed");
        }
        removed
    }

    /// Adds a user-defined drink to the menu.
    ///
    /// Name and size are trimmed; a blank size means no size.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::EmptyDrinkName`] for a blank name,
    /// [`CommandError::InvalidPrice`] or [`CommandError::NegativePrice`] for
    /// bad price text, and [`CommandError::DuplicateDrink`] when the menu
    /// already lists the same name and size, ignoring case.
    pub fn add_custom_drink(
        &mut self,
        name: &str,
        price_text: &str,
        size: Option<&str>,
    ) -> Result<DrinkId, CommandError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CommandError::EmptyDrinkName);
        }
        let price = parse_price(price_text)?;
        let serving = size.map(str::trim).filter(|value| !value.is_empty());

        let lowered = trimmed.to_lowercase();
        let lowered_serving = serving.map(str::to_lowercase);
        let is_duplicate = self
            .standard
            .drinks()
            .iter()
            .chain(&self.custom_drinks)
            .any(|drink| {
                drink.name.to_lowercase() == lowered
                    && drink.size.as_deref().map(str::to_lowercase) == lowered_serving
            });
        if is_duplicate {
            return Err(CommandError::DuplicateDrink {
                label: drink_label(trimmed, serving),
            });
        }

        let id = DrinkId::random();
        self.custom_drinks.push(Drink {
            id: id.clone(),
            category: CUSTOM_CATEGORY.to_owned(),
            name: trimmed.to_owned(),
            price,
            size: serving.map(str::to_owned),
            details: None,
            is_custom: true,
        });
        persist(&mut self.slots, keys::CUSTOM_DRINKS, &self.custom_drinks);
        info!(drink_id = %id, "custom drink added");
        Ok(id)
    }

    /// Deletes a custom drink after confirmation.
    ///
    /// Standard drinks and unknown ids are left alone without prompting.
    /// Orders keep their snapshot of the deleted drink.
    pub fn remove_custom_drink(&mut self, id: &DrinkId) -> ActionOutcome {
        let Some(position) = self.custom_drinks.iter().position(|drink| &drink.id == id) else {
            return ActionOutcome::Unchanged;
        };
        let label = self
            .custom_drinks
            .get(position)
            .map(Drink::label)
            .unwrap_or_default();
        if !self
            .confirm
            .confirm(&format!("Delete custom item {label}?"))
        {
            return ActionOutcome::Declined;
        }

        self.custom_drinks.remove(position);
        persist(&mut self.slots, keys::CUSTOM_DRINKS, &self.custom_drinks);
        info!(drink_id = %id, "custom drink removed");
        ActionOutcome::Applied
    }

    /// Clears people, orders, custom drinks and the selection after
    /// confirmation. The standard menu and theme are kept.
    pub fn reset_all(&mut self) -> ActionOutcome {
        if !self.confirm.confirm(
            "Are you sure you want to clear all friends, orders and custom items? This cannot be undone.",
        ) {
            return ActionOutcome::Declined;
        }

        self.people.clear();
        self.orders.clear();
        self.custom_drinks.clear();
        self.selected = None;
        for key in [
            keys::PEOPLE,
            keys::ORDERS,
            keys::CUSTOM_DRINKS,
            keys::SELECTED_PERSON,
        ] {
            clear(&mut self.slots, key);
        }
        info!("tracker reset");
        ActionOutcome::Applied
    }

    /// Stores the colour scheme preference.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        persist(&mut self.slots, keys::THEME, &self.theme);
    }

    /// Switches between light and dark; returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(next);
        next
    }

    fn reconcile_selection(&mut self) {
        let is_dangling = self
            .selected
            .as_ref()
            .is_some_and(|id| !self.people.iter().any(|person| &person.id == id));
        if is_dangling {
            info!("selected person no longer exists; clearing selection");
            self.selected = None;
            clear(&mut self.slots, keys::SELECTED_PERSON);
        }
    }
}

impl<S> Tracker<S> {
    /// Registered people in the order they were added.
    #[must_use]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// The order log in insertion order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// User-created drinks.
    #[must_use]
    pub fn custom_drinks(&self) -> &[Drink] {
        &self.custom_drinks
    }

    /// The frozen built-in menu.
    #[must_use]
    pub const fn standard_menu(&self) -> &StandardMenu {
        &self.standard
    }

    /// Standard drinks followed by custom drinks.
    #[must_use]
    pub fn all_drinks(&self) -> Vec<Drink> {
        menu::all_drinks(&self.standard, &self.custom_drinks)
    }

    /// Category filter options for the merged menu.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        menu::categories(&self.all_drinks())
    }

    /// Per-person totals and the grand total.
    #[must_use]
    pub fn summary(&self) -> Summary {
        summary::summarize(&self.orders, &self.people)
    }

    /// Orders newest first with person names resolved.
    #[must_use]
    pub fn order_log(&self) -> Vec<OrderLogEntry> {
        summary::order_log(&self.orders, &self.people)
    }

    /// The selected person's identifier, if any.
    #[must_use]
    pub const fn selected_person_id(&self) -> Option<&PersonId> {
        self.selected.as_ref()
    }

    /// The selected person, if any.
    #[must_use]
    pub fn selected_person(&self) -> Option<&Person> {
        let id = self.selected.as_ref()?;
        self.people.iter().find(|person| &person.id == id)
    }

    /// Current colour scheme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Borrows the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        self.slots.store()
    }
}

fn load_selection<S: KeyValueStore>(slots: &JsonSlots<S>) -> Option<PersonId> {
    let raw = slots.read_text(keys::SELECTED_PERSON)?;
    // Older clients stored the bare id without JSON quoting.
    let id = serde_json::from_str::<PersonId>(&raw)
        .unwrap_or_else(|_| PersonId::new(raw.trim()));
    (!id.as_str().is_empty()).then_some(id)
}

fn persist<S, T>(slots: &mut JsonSlots<S>, key: &str, value: &T)
where
    S: KeyValueStore,
    T: Serialize + ?Sized,
{
    if let Err(err) = slots.save(key, value) {
        error!(key, error = %err, "failed to persist storage slot");
    }
}

fn clear<S: KeyValueStore>(slots: &mut JsonSlots<S>, key: &str) {
    if let Err(err) = slots.clear(key) {
        error!(key, error = %err, "failed to clear storage slot");
    }
}

#[cfg(test)]
mod tests;
