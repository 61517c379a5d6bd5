//! Menu composition: the frozen standard catalogue plus custom drinks.
//!
//! The standard catalogue is read once, each record receives a fresh
//! [`DrinkId`], and the resulting list never changes afterwards. Every view
//! in this module is a pure function of the drinks it is given.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use camino::Utf8Path;
use cap_std::fs::Dir;

use crate::error::CatalogueError;
use crate::ids::DrinkId;
use crate::model::{ALL_CATEGORIES, CUSTOM_CATEGORY, CatalogueRecord, Drink};

/// The built-in catalogue with identifiers assigned at load time.
///
/// # Example
///
/// ```
/// use bar_tab::StandardMenu;
///
/// let json = r#"[
///     {"category": "Bier vom Fass", "name": "Pils", "price": 4.2, "size": "0,4l"},
///     {"category": "Heiße Getränke", "name": "Kaffee", "price": 2.5}
/// ]"#;
///
/// let menu = StandardMenu::from_json(json).expect("valid catalogue");
/// assert_eq!(menu.drinks().len(), 2);
/// assert!(menu.drinks().iter().all(|drink| !drink.is_custom));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardMenu {
    drinks: Vec<Drink>,
}

impl StandardMenu {
    /// Builds the menu from catalogue records, assigning fresh identifiers.
    #[must_use]
    pub fn from_records(records: Vec<CatalogueRecord>) -> Self {
        let drinks = records
            .into_iter()
            .map(|record| Drink {
                id: DrinkId::random(),
                category: record.category,
                name: record.name,
                price: record.price,
                size: record.size,
                details: record.details,
                is_custom: false,
            })
            .collect();
        Self { drinks }
    }

    /// Parses a catalogue JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::ParseError`] for malformed JSON and
    /// [`CatalogueError::InvalidPrice`] for negative or non-finite prices.
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let records: Vec<CatalogueRecord> =
            serde_json::from_str(json).map_err(|e| CatalogueError::ParseError {
                message: e.to_string(),
            })?;

        if let Some((index, record)) = records
            .iter()
            .enumerate()
            .find(|(_, record)| !record.price.is_finite() || record.price.is_sign_negative())
        {
            return Err(CatalogueError::InvalidPrice {
                index,
                name: record.name.clone(),
            });
        }

        Ok(Self::from_records(records))
    }

    /// Loads a catalogue file from a capability-scoped directory.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if the file cannot be read or parsed.
    pub fn from_file(dir: &Dir, path: &Utf8Path) -> Result<Self, CatalogueError> {
        let contents = dir
            .read_to_string(path)
            .map_err(|e| CatalogueError::IoError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Self::from_json(&contents)
    }

    /// The frozen standard drinks in catalogue order.
    #[must_use]
    pub fn drinks(&self) -> &[Drink] {
        &self.drinks
    }
}

/// Standard drinks followed by custom drinks.
#[must_use]
pub fn all_drinks(standard: &StandardMenu, custom: &[Drink]) -> Vec<Drink> {
    standard
        .drinks()
        .iter()
        .chain(custom)
        .cloned()
        .collect()
}

/// `"All"` followed by the distinct categories, alphabetically, with
/// `"Custom Items"` always last.
///
/// ```
/// use bar_tab::categories;
///
/// assert_eq!(categories(&[]), vec!["All".to_owned()]);
/// ```
#[must_use]
pub fn categories(drinks: &[Drink]) -> Vec<String> {
    let distinct: BTreeSet<&str> = drinks.iter().map(|drink| drink.category.as_str()).collect();
    let mut sorted: Vec<&str> = distinct.into_iter().collect();
    sorted.sort_by(|a, b| compare_categories(a, b, CustomPlacement::Last));

    std::iter::once(ALL_CATEGORIES)
        .chain(sorted)
        .map(str::to_owned)
        .collect()
}

/// Drinks in `category` (or any, for `"All"`) whose name, category or details
/// contain `search`, ignoring case, sorted by name.
///
/// Drinks with equal names keep their input order.
#[must_use]
pub fn filter(drinks: &[Drink], category: &str, search: &str) -> Vec<Drink> {
    let needle = search.to_lowercase();
    let mut matches: Vec<Drink> = drinks
        .iter()
        .filter(|drink| category == ALL_CATEGORIES || drink.category == category)
        .filter(|drink| needle.is_empty() || matches_search(drink, &needle))
        .cloned()
        .collect();
    matches.sort_by(|a, b| compare_names(&a.name, &b.name));
    matches
}

/// Drinks of one category in a [`grouped_menu`].
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSection {
    /// Category shared by every drink in the section.
    pub category: String,
    /// Drinks sorted by name.
    pub drinks: Vec<Drink>,
}

/// Groups drinks by category for the menu-management view.
///
/// Sections are alphabetical except `"Custom Items"`, which leads so freshly
/// added entries are the first thing shown.
#[must_use]
pub fn grouped_menu(drinks: &[Drink]) -> Vec<MenuSection> {
    let mut sections: Vec<MenuSection> = Vec::new();
    for drink in drinks {
        match sections
            .iter_mut()
            .find(|section| section.category == drink.category)
        {
            Some(section) => section.drinks.push(drink.clone()),
            None => sections.push(MenuSection {
                category: drink.category.clone(),
                drinks: vec![drink.clone()],
            }),
        }
    }
    for section in &mut sections {
        section
            .drinks
            .sort_by(|a, b| compare_names(&a.name, &b.name));
    }
    sections.sort_by(|a, b| compare_categories(&a.category, &b.category, CustomPlacement::First));
    sections
}

/// Alphabetical name order: case-insensitive, then exact.
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CustomPlacement {
    First,
    Last,
}

fn compare_categories(a: &str, b: &str, placement: CustomPlacement) -> Ordering {
    let custom_rank = |category: &str| match (category == CUSTOM_CATEGORY, placement) {
        (false, _) => Ordering::Equal,
        (true, CustomPlacement::First) => Ordering::Less,
        (true, CustomPlacement::Last) => Ordering::Greater,
    };
    custom_rank(a)
        .cmp(&custom_rank(b))
        .then_with(|| compare_names(a, b))
}

fn matches_search(drink: &Drink, needle: &str) -> bool {
    drink.name.to_lowercase().contains(needle)
        || drink.category.to_lowercase().contains(needle)
        || drink
            .details
            .as_deref()
            .is_some_and(|details| details.to_lowercase().contains(needle))
}
