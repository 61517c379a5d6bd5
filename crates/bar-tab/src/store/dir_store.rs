//! Directory-backed slot store.
//!
//! Each slot lives in `<key>.json` inside a capability-scoped directory.
//! Keys are restricted to ASCII alphanumerics, `-` and `_`, so a slot name can
//! never address a file outside the directory.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use super::KeyValueStore;
use super::atomic_io::write_atomic;
use crate::error::StoreError;

const SLOT_EXTENSION: &str = "json";

/// A [`KeyValueStore`] persisting one file per slot.
///
/// # Example
///
/// ```no_run
/// use bar_tab::{DirStore, JsonSlots};
/// use camino::Utf8Path;
///
/// let store = DirStore::open(Utf8Path::new("bar-tab-data")).expect("open data dir");
/// let mut slots = JsonSlots::new(store);
/// slots.save("theme", "dark").expect("save theme");
/// ```
#[derive(Debug)]
pub struct DirStore {
    dir: Dir,
    root: Utf8PathBuf,
}

impl DirStore {
    /// Opens `path`, creating it and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OpenError`] when the directory cannot be created
    /// or opened.
    pub fn open(path: &Utf8Path) -> Result<Self, StoreError> {
        let open_error = |err: io::Error| StoreError::OpenError {
            path: path.to_path_buf(),
            message: err.to_string(),
        };
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(open_error)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(open_error)?;
        Ok(Self::from_dir(dir, path.to_path_buf()))
    }

    /// Opens `path` only if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OpenError`] when the directory exists but cannot
    /// be opened.
    pub fn open_existing(path: &Utf8Path) -> Result<Option<Self>, StoreError> {
        match Dir::open_ambient_dir(path, ambient_authority()) {
            Ok(dir) => Ok(Some(Self::from_dir(dir, path.to_path_buf()))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::OpenError {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    /// Wraps an already opened directory handle.
    ///
    /// `root` is only used in diagnostics.
    #[must_use]
    pub const fn from_dir(dir: Dir, root: Utf8PathBuf) -> Self {
        Self { dir, root }
    }

    /// Path the store was opened at.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn slot_file(key: &str) -> Result<Utf8PathBuf, StoreError> {
        let is_valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !is_valid {
            return Err(StoreError::InvalidKey {
                key: key.to_owned(),
            });
        }
        Ok(Utf8PathBuf::from(format!("{key}.{SLOT_EXTENSION}")))
    }
}

impl KeyValueStore for DirStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let file = Self::slot_file(key)?;
        match self.dir.read_to_string(&file) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::ReadError {
                key: key.to_owned(),
                message: err.to_string(),
            }),
        }
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), StoreError> {
        let file = Self::slot_file(key)?;
        write_atomic(&self.dir, &file, contents).map_err(|err| match err {
            StoreError::WriteError { path, message } => StoreError::WriteError {
                path: self.root.join(path),
                message,
            },
            other => other,
        })?;
        debug!(key, root = %self.root, "storage slot written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let file = Self::slot_file(key)?;
        match self.dir.remove_file(&file) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::RemoveError {
                key: key.to_owned(),
                message: err.to_string(),
            }),
        }
    }
}
