//! Durable key-value storage for tracker state.
//!
//! [`KeyValueStore`] is the port: named text slots that can be read, written
//! and removed. [`JsonSlots`] layers JSON encoding on top and implements the
//! tolerant loading rules: a missing, unreadable or malformed slot yields the
//! caller's default and a warning, never an error.

mod atomic_io;
mod dir_store;
mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::StoreError;

pub use dir_store::DirStore;
pub use memory::MemoryStore;

/// Slot names used by the tracker.
pub mod keys {
    /// Registered people.
    pub const PEOPLE: &str = "people";
    /// The order log.
    pub const ORDERS: &str = "orders";
    /// Identifier of the currently selected person.
    pub const SELECTED_PERSON: &str = "selectedPersonId";
    /// User-created catalogue entries.
    pub const CUSTOM_DRINKS: &str = "customDrinks";
    /// Colour scheme preference.
    pub const THEME: &str = "theme";

    /// Every slot the tracker persists.
    pub const ALL: [&str; 5] = [PEOPLE, ORDERS, SELECTED_PERSON, CUSTOM_DRINKS, THEME];
}

/// Port for named text slots in durable storage.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Returns the slot contents, or `None` when the slot does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrites the slot with `contents`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be written.
    fn write(&mut self, key: &str, contents: &str) -> Result<(), StoreError>;

    /// Removes the slot. Removing an absent slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend refuses the removal.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// JSON encoding over a [`KeyValueStore`].
///
/// # Example
///
/// ```
/// use bar_tab::{JsonSlots, MemoryStore};
///
/// let mut slots = JsonSlots::new(MemoryStore::default());
/// slots.save("numbers", &vec![1, 2, 3]).expect("save");
///
/// let numbers: Vec<u32> = slots.load_or_default("numbers");
/// assert_eq!(numbers, vec![1, 2, 3]);
///
/// let missing: Vec<u32> = slots.load_or_default("absent");
/// assert!(missing.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonSlots<S> {
    store: S,
}

impl<S> JsonSlots<S> {
    /// Wraps a store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> JsonSlots<S> {
    /// Reads the raw slot text, treating read failures as absence.
    #[must_use]
    pub fn read_text(&self, key: &str) -> Option<String> {
        match self.store.read(key) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(key, error = %err, "storage slot unreadable; using default");
                None
            }
        }
    }

    /// Deserializes a slot, falling back to `default` when it is missing,
    /// unreadable or malformed.
    #[must_use]
    pub fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(contents) = self.read_text(key) else {
            return default;
        };
        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "storage slot malformed; using default");
                default
            }
        }
    }

    /// Like [`JsonSlots::load_or`] with `T::default()` as the fallback.
    #[must_use]
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load_or(key, T::default())
    }

    /// Serializes `value` into the slot, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or the write fails.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let contents = serde_json::to_string(value).map_err(|err| StoreError::SerializeError {
            key: key.to_owned(),
            message: err.to_string(),
        })?;
        self.store.write(key, &contents)
    }

    /// Removes the slot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend refuses the removal.
    pub fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        self.store.remove(key)
    }
}
