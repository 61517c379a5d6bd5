//! Plain-text tab report.
//!
//! The `bar-tab-report` binary delegates to these functions so loading and
//! rendering can be exercised in tests without spawning a process.

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info};

use crate::config::TrackerSettings;
use crate::error::CatalogueError;
use crate::menu::StandardMenu;
use crate::model::drink_label;
use crate::price::format_amount;
use crate::store::{DirStore, KeyValueStore, MemoryStore, keys};
use crate::summary::{OrderLogEntry, Summary};
use crate::tracker::Tracker;

pub use error::ReportError;

const CURRENCY: &str = "€";

/// Loads the configured catalogue and a snapshot of the data directory.
///
/// The tracker works on an in-memory copy of the slots, so repairs made while
/// opening (such as dropping a stale selection) never reach the disk. A
/// missing data directory reads as an empty tab and is not created. The
/// confirmation hook declines everything.
///
/// # Errors
///
/// Returns [`ReportError`] when a path is not UTF-8, the data directory
/// cannot be read, or the catalogue cannot be loaded.
pub fn load_tracker(
    settings: &TrackerSettings,
    clock: Arc<dyn Clock>,
) -> Result<Tracker<MemoryStore>, ReportError> {
    let data_dir = utf8_path(settings.data_dir())?;
    let catalogue_path = utf8_path(settings.catalogue_path())?;

    let menu = load_catalogue(&catalogue_path)?;
    let store = snapshot_slots(&data_dir)?;
    info!(
        data_dir = %data_dir,
        catalogue = %catalogue_path,
        drinks = menu.drinks().len(),
        "tab loaded"
    );
    Ok(Tracker::open(store, menu, clock, Box::new(|_: &str| false)))
}

fn snapshot_slots(data_dir: &Utf8Path) -> Result<MemoryStore, ReportError> {
    let mut snapshot = MemoryStore::default();
    let Some(store) = DirStore::open_existing(data_dir)? else {
        debug!(data_dir = %data_dir, "data directory absent; reporting an empty tab");
        return Ok(snapshot);
    };
    for key in keys::ALL {
        if let Some(contents) = store.read(key)? {
            snapshot.write(key, &contents)?;
        }
    }
    Ok(snapshot)
}

/// Loads a catalogue file through a handle on its parent directory.
///
/// # Errors
///
/// Returns [`ReportError::MissingFileName`] for a path without a file name
/// and [`ReportError::CatalogueError`] when the file cannot be read or parsed.
pub fn load_catalogue(path: &Utf8Path) -> Result<StandardMenu, ReportError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ReportError::MissingFileName {
            path: path.to_string(),
        })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
        CatalogueError::IoError {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    })?;

    Ok(StandardMenu::from_file(&dir, Utf8Path::new(file_name))?)
}

/// Renders the per-person summary, optionally followed by the order log.
#[must_use]
pub fn render_report<S>(tracker: &Tracker<S>, show_log: bool) -> String {
    let mut lines = summary_lines(&tracker.summary());
    if show_log {
        lines.push(String::new());
        lines.extend(log_lines(&tracker.order_log()));
    }
    lines.join("\n")
}

/// One line per person and drink signature, then the grand total.
///
/// # Example
///
/// ```
/// use bar_tab::report::summary_lines;
/// use bar_tab::summarize;
///
/// let lines = summary_lines(&summarize(&[], &[]));
/// assert_eq!(lines, vec!["No one is on the tab yet.", "Total: 0.00 €"]);
/// ```
#[must_use]
pub fn summary_lines(summary: &Summary) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.people.is_empty() {
        lines.push("No one is on the tab yet.".to_owned());
    }
    for person in &summary.people {
        let noun = if person.total_count == 1 {
            "drink"
        } else {
            "drinks"
        };
        lines.push(format!(
            "{}: {} {noun}, {} {CURRENCY}",
            person.name,
            person.total_count,
            format_amount(person.total_cost)
        ));
        for drink in &person.drinks {
            lines.push(format!(
                "  {}x {} @ {} {CURRENCY}",
                drink.count,
                drink_label(&drink.name, non_empty(drink.size.as_deref())),
                format_amount(drink.price)
            ));
        }
    }
    lines.push(format!(
        "Total: {} {CURRENCY}",
        format_amount(summary.grand_total)
    ));
    lines
}

fn log_lines(entries: &[OrderLogEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No orders yet.".to_owned()];
    }
    let mut lines = vec!["Order log:".to_owned()];
    lines.extend(entries.iter().map(|entry| {
        let when = DateTime::<Utc>::from_timestamp_millis(entry.timestamp).map_or_else(
            || "unknown time".to_owned(),
            |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
        );
        format!(
            "  {when}  {}: {} {} {CURRENCY}",
            entry.person_name,
            drink_label(&entry.drink_name, non_empty(entry.drink_size.as_deref())),
            format_amount(entry.price)
        )
    }));
    lines
}

fn non_empty(size: Option<&str>) -> Option<&str> {
    size.filter(|label| !label.is_empty())
}

fn utf8_path(path: PathBuf) -> Result<Utf8PathBuf, ReportError> {
    Utf8PathBuf::from_path_buf(path).map_err(|raw| ReportError::NonUtf8Path {
        path: raw.display().to_string(),
    })
}
