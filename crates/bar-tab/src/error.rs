//! Error types for the bar-tab crate.
//!
//! Storage and catalogue failures carry the offending key or path plus the
//! underlying message. Command failures are user-facing: their `Display`
//! output is the reason shown to the person using the tracker.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised by a key-value store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The storage directory could not be created or opened.
    #[error("failed to open storage directory '{path}': {message}")]
    OpenError {
        /// Directory path.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The slot key contains characters that cannot name a storage slot.
    #[error("invalid storage key '{key}'")]
    InvalidKey {
        /// Rejected key.
        key: String,
    },

    /// Reading a slot failed.
    #[error("failed to read slot '{key}': {message}")]
    ReadError {
        /// Slot key.
        key: String,
        /// Description of the I/O error.
        message: String,
    },

    /// Writing a slot failed.
    #[error("failed to write '{path}': {message}")]
    WriteError {
        /// Path of the file being written.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// Removing a slot failed.
    #[error("failed to remove slot '{key}': {message}")]
    RemoveError {
        /// Slot key.
        key: String,
        /// Description of the I/O error.
        message: String,
    },

    /// A value could not be serialized for storage.
    #[error("failed to serialize slot '{key}': {message}")]
    SerializeError {
        /// Slot key.
        key: String,
        /// Serializer message.
        message: String,
    },
}

/// Errors raised while loading the external drink catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    /// The catalogue file could not be read.
    #[error("failed to read catalogue at '{path}': {message}")]
    IoError {
        /// Path to the catalogue file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The catalogue JSON is malformed or missing required fields.
    #[error("invalid catalogue JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// A catalogue record carries a negative or non-finite price.
    #[error("catalogue entry {index} ('{name}') has an invalid price")]
    InvalidPrice {
        /// Index of the record in the catalogue array.
        index: usize,
        /// Name of the offending drink.
        name: String,
    },
}

/// Rejected tracker commands.
///
/// State is left unchanged whenever a command returns one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A person with the same name (ignoring case) is already registered.
    #[error("{name} is already on the list!")]
    DuplicatePerson {
        /// Name as entered.
        name: String,
    },

    /// An order was attempted while nobody is selected.
    #[error("Please select a person first!")]
    NoPersonSelected,

    /// A custom drink was submitted without a name.
    #[error("Please enter a name for the item.")]
    EmptyDrinkName,

    /// The price text is not a finite number.
    #[error("'{input}' is not a valid price.")]
    InvalidPrice {
        /// Price text as entered.
        input: String,
    },

    /// The price is below zero.
    #[error("Price cannot be negative (got {input}).")]
    NegativePrice {
        /// Price text as entered.
        input: String,
    },

    /// The catalogue already holds an entry with this name and size.
    #[error("{label} is already on the menu!")]
    DuplicateDrink {
        /// Name and optional size, formatted for display.
        label: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_write_error_formats_correctly() {
        let err = StoreError::WriteError {
            path: Utf8PathBuf::from("data/people.json"),
            message: "disk full".to_owned(),
        };
        assert_eq!(err.to_string(), "failed to write 'data/people.json': disk full");
    }

    #[test]
    fn store_invalid_key_formats_correctly() {
        let err = StoreError::InvalidKey {
            key: "../etc".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid storage key '../etc'");
    }

    #[test]
    fn catalogue_invalid_price_formats_correctly() {
        let err = CatalogueError::InvalidPrice {
            index: 4,
            name: "Pils".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "catalogue entry 4 ('Pils') has an invalid price"
        );
    }

    #[test]
    fn duplicate_person_names_the_person() {
        let err = CommandError::DuplicatePerson {
            name: "alice".to_owned(),
        };
        assert_eq!(err.to_string(), "alice is already on the list!");
    }

    #[test]
    fn no_selection_reason_is_user_facing() {
        assert_eq!(
            CommandError::NoPersonSelected.to_string(),
            "Please select a person first!"
        );
    }

    #[test]
    fn duplicate_drink_names_the_entry() {
        let err = CommandError::DuplicateDrink {
            label: "Shot (2cl)".to_owned(),
        };
        assert_eq!(err.to_string(), "Shot (2cl) is already on the menu!");
    }
}
