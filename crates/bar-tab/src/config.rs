//! Tracker configuration loaded via OrthoConfig.
//!
//! Values come from `BAR_TAB_*` environment variables, a configuration file
//! or command-line flags, merged by `ortho_config`.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_DATA_DIR: &str = "bar-tab-data";

fn default_catalogue_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("catalogue.json")
}

/// Where the tracker keeps its state and finds its menu.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BAR_TAB")]
pub struct TrackerSettings {
    /// Append the order log to the report.
    #[ortho_config(default = false)]
    pub show_log: bool,
    /// Directory holding the persisted storage slots.
    pub data_dir: Option<PathBuf>,
    /// Standard catalogue JSON file.
    pub catalogue_path: Option<PathBuf>,
}

impl TrackerSettings {
    /// Return the configured data directory, falling back to the default.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Return the configured catalogue path, falling back to the bundled menu.
    #[must_use]
    pub fn catalogue_path(&self) -> PathBuf {
        self.catalogue_path
            .clone()
            .unwrap_or_else(default_catalogue_path)
    }
}
