//! Error types for the report command.

use thiserror::Error;

use crate::error::{CatalogueError, StoreError};

/// Errors surfaced while loading state or printing the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Configuration could not be loaded.
    #[error("invalid configuration: {message}")]
    SettingsError {
        /// Error message from the configuration loader.
        message: String,
    },
    /// A configured path is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },
    /// The catalogue path has no file name component.
    #[error("catalogue path has no file name: {path}")]
    MissingFileName {
        /// The configured catalogue path.
        path: String,
    },
    /// The data directory could not be opened.
    #[error("storage error: {source}")]
    StoreError {
        /// Underlying storage error.
        #[from]
        #[source]
        source: StoreError,
    },
    /// The standard catalogue could not be loaded.
    #[error("catalogue error: {source}")]
    CatalogueError {
        /// Underlying catalogue error.
        #[from]
        #[source]
        source: CatalogueError,
    },
}
