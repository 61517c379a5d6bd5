//! Persisted domain records.
//!
//! Field names serialize in camelCase so the JSON written to storage keeps
//! the `{id, personId, drinkName, ...}` layout shared with other clients of
//! the same data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{DrinkId, OrderId, PersonId};
use crate::price::{deserialize_lenient, missing_price};

/// Category assigned to every user-created drink.
pub const CUSTOM_CATEGORY: &str = "Custom Items";

/// Pseudo-category that matches every drink when filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Display name used for orders whose person is no longer registered.
pub const UNKNOWN_PERSON: &str = "Unknown";

/// A registered friend on the tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Stable identity.
    pub id: PersonId,
    /// Display name, unique ignoring case.
    pub name: String,
}

/// A purchasable catalogue entry, standard or custom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drink {
    /// Identifier assigned at load (standard) or creation (custom).
    pub id: DrinkId,
    /// Menu category.
    pub category: String,
    /// Drink name.
    pub name: String,
    /// Unit price.
    #[serde(default = "missing_price", deserialize_with = "deserialize_lenient")]
    pub price: f64,
    /// Optional serving size such as `0,5l`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Optional ingredients or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Whether the entry was created by the user.
    #[serde(default)]
    pub is_custom: bool,
}

impl Drink {
    /// Name with the size in parentheses when present, e.g. `Pils (0,4l)`.
    #[must_use]
    pub fn label(&self) -> String {
        drink_label(&self.name, self.size.as_deref())
    }
}

/// An immutable record of one drink ordered by one person.
///
/// Name, size and price are copied from the catalogue at order time and never
/// follow later catalogue changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identity.
    pub id: OrderId,
    /// Person the order is billed to.
    pub person_id: PersonId,
    /// Catalogue entry the snapshot was taken from.
    pub drink_id: DrinkId,
    /// Drink name at order time.
    pub drink_name: String,
    /// Drink size at order time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drink_size: Option<String>,
    /// Price at order time.
    #[serde(default = "missing_price", deserialize_with = "deserialize_lenient")]
    pub price: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// One record of the external catalogue, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueRecord {
    /// Menu category.
    pub category: String,
    /// Drink name.
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Optional serving size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Optional ingredients or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// The opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

pub(crate) fn drink_label(name: &str, size: Option<&str>) -> String {
    match size {
        Some(serving) => format!("{name} ({serving})"),
        None => name.to_owned(),
    }
}
