//! Crash-safe slot replacement.
//!
//! New contents are staged in a hidden sibling file and synced. Only then is
//! the sibling renamed over the slot, so a reader sees either the previous
//! document or the new one.

use std::io::{self, Write};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};
use uuid::Uuid;

use crate::error::StoreError;

/// Hidden copy of a slot that is removed again unless committed.
struct StagedFile<'dir> {
    dir: &'dir Dir,
    name: String,
    committed: bool,
}

impl<'dir> StagedFile<'dir> {
    fn create(dir: &'dir Dir, target: &str, contents: &str) -> io::Result<Self> {
        let staged = Self {
            dir,
            name: format!(".{target}.{}.tmp", Uuid::new_v4().simple()),
            committed: false,
        };
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let mut file = dir.open_with(&staged.name, &options)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        Ok(staged)
    }

    fn commit(mut self, target: &str) -> io::Result<()> {
        replace(self.dir, &self.name, target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile<'_> {
    fn drop(&mut self) {
        if !self.committed {
            drop(self.dir.remove_file(&self.name));
        }
    }
}

/// Replaces the slot file `path` inside `dir` with `contents`.
///
/// `path` must be a single file name.
///
/// # Errors
///
/// Returns [`StoreError::WriteError`] for a nested path or when staging or
/// renaming fails. The staged copy never outlives a failed write.
pub(crate) fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &str) -> Result<(), StoreError> {
    let write_error = |message: String| StoreError::WriteError {
        path: path.to_path_buf(),
        message,
    };
    let file_name = single_file_name(path)
        .ok_or_else(|| write_error("slot path must be a file name".to_owned()))?;

    StagedFile::create(dir, file_name, contents)
        .and_then(|staged| staged.commit(file_name))
        .map_err(|err| write_error(err.to_string()))?;

    // The rename already happened; a failed directory sync is not reported.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
    Ok(())
}

fn single_file_name(path: &Utf8Path) -> Option<&str> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(name)), None) => Some(name),
        _ => None,
    }
}

#[cfg(not(windows))]
fn replace(dir: &Dir, from: &str, to: &str) -> io::Result<()> {
    dir.rename(from, dir, to)
}

#[cfg(windows)]
fn replace(dir: &Dir, from: &str, to: &str) -> io::Result<()> {
    // Windows refuses to rename onto an existing file.
    match dir.remove_file(to) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err),
        _ => {}
    }
    dir.rename(from, dir, to)
}
