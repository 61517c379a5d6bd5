//! Bar-tab tracking for a group of friends on a night out.
//!
//! The crate keeps a running tab: who is at the table, which drinks each
//! person ordered, and what everyone owes. State lives in a [`Tracker`],
//! which persists every change to named JSON slots behind a
//! [`KeyValueStore`] and rebuilds itself from those slots on the next start.
//!
//! # Overview
//!
//! - [`StandardMenu`] loads the built-in catalogue once; custom drinks are
//!   added and removed through the tracker.
//! - [`Tracker`] validates and applies commands such as adding people,
//!   placing orders and resetting the tab.
//! - [`summarize`] and [`order_log`] derive totals and history on demand.
//! - [`DirStore`] keeps slots as files in a directory; [`MemoryStore`] keeps
//!   them in memory for tests and embedding.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use bar_tab::{CommandError, MemoryStore, StandardMenu, Tracker, format_amount};
//! use mockable::DefaultClock;
//!
//! let menu = StandardMenu::from_json(
//!     r#"[{"category": "Longdrinks", "name": "Gin Tonic", "price": 8.5}]"#,
//! )
//! .expect("valid catalogue");
//! let mut tracker = Tracker::open(
//!     MemoryStore::default(),
//!     menu,
//!     Arc::new(DefaultClock),
//!     Box::new(|_: &str| true),
//! );
//!
//! let gin = tracker.all_drinks().remove(0);
//! assert_eq!(tracker.add_order(&gin), Err(CommandError::NoPersonSelected));
//!
//! tracker.add_person("Alice").expect("alice added");
//! tracker.add_order(&gin).expect("order placed");
//! tracker.add_order(&gin).expect("order placed");
//!
//! assert_eq!(format_amount(tracker.summary().grand_total), "17.00");
//! ```

mod config;
mod confirm;
mod error;
mod ids;
mod menu;
mod model;
mod price;
pub mod report;
mod store;
mod summary;
mod tracker;

pub use config::TrackerSettings;
pub use confirm::Confirm;
pub use error::{CatalogueError, CommandError, StoreError};
pub use ids::{DrinkId, OrderId, PersonId};
pub use menu::{MenuSection, StandardMenu, all_drinks, categories, filter, grouped_menu};
pub use model::{
    ALL_CATEGORIES, CUSTOM_CATEGORY, CatalogueRecord, Drink, Order, Person, Theme, UNKNOWN_PERSON,
};
pub use price::{finite_or_zero, format_amount, parse_price};
pub use store::{DirStore, JsonSlots, KeyValueStore, MemoryStore, keys};
pub use summary::{DrinkSignature, OrderLogEntry, PersonSummary, Summary, order_log, summarize};
pub use tracker::{ActionOutcome, Tracker};
