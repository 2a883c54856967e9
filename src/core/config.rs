//! Configuration management with layered hierarchy

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

use crate::core::clean::ReportingWindow;

/// Fixed prefix for exported query files.
const DEFAULT_EXPORT_PREFIX: &str = "TheReckoning";

/// Reckoning configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the report store database
    pub database: Option<PathBuf>,

    /// First day of the accepted reporting window (inclusive)
    pub window_start: Option<NaiveDate>,

    /// Last day of the accepted reporting window (inclusive)
    pub window_end: Option<NaiveDate>,

    /// Filename prefix for CSV exports
    pub export_prefix: Option<String>,
}

impl Config {
    /// Load configuration, merging in priority order: built-in defaults,
    /// then the global user config file.
    ///
    /// The store path can additionally be overridden per-invocation with
    /// `--db` (or `RECKONING_DB`), which the CLI layer applies on top.
    pub fn load() -> Self {
        let mut config = Config::default();

        // Global user config (~/.config/reckoning/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "reckoning")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.window_start.is_some() {
            self.window_start = other.window_start;
        }
        if other.window_end.is_some() {
            self.window_end = other.window_end;
        }
        if other.export_prefix.is_some() {
            self.export_prefix = other.export_prefix;
        }
    }

    /// Store path, defaulting to the OS data directory.
    pub fn database(&self) -> PathBuf {
        if let Some(ref path) = self.database {
            return path.clone();
        }
        directories::ProjectDirs::from("", "", "reckoning")
            .map(|dirs| dirs.data_dir().join("reckoning.db"))
            .unwrap_or_else(|| PathBuf::from("reckoning.db"))
    }

    /// The accepted reporting window. Defaults cover the current
    /// reporting period.
    pub fn window(&self) -> ReportingWindow {
        ReportingWindow {
            start: self
                .window_start
                .unwrap_or_else(|| NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")),
            end: self
                .window_end
                .unwrap_or_else(|| NaiveDate::from_ymd_opt(2024, 5, 31).expect("valid date")),
        }
    }

    /// Prefix for exported CSV filenames.
    pub fn export_prefix(&self) -> String {
        self.export_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_EXPORT_PREFIX.to_string())
    }
}
