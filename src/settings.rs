//! Runner settings
//!
//! Only outer-loop preferences live here; game rules are the fixed constants
//! in [`crate::consts`]. Read from a JSON file next to the binary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file read when no override is given
pub const DEFAULT_SETTINGS_FILE: &str = "snake-arena.json";
/// Environment variable naming an alternative settings file
pub const SETTINGS_ENV: &str = "SNAKE_ARENA_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the loaded settings came from
#[derive(Debug)]
pub enum SettingsSource {
    File(PathBuf),
    Defaults,
    /// The file existed but could not be used
    Fallback(SettingsError),
}

impl SettingsSource {
    pub fn log(&self) {
        match self {
            Self::File(path) => log::info!("Loaded settings from {}", path.display()),
            Self::Defaults => log::info!("Using default settings"),
            Self::Fallback(err) => log::warn!("{}; using default settings", err),
        }
    }
}

/// Runner preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Session seed; derived from the system time when unset
    pub seed: Option<u64>,
    /// Log destination (the terminal owns stdout/stderr while playing)
    pub log_file: Option<PathBuf>,
    /// Optional JSON-lines trace of every frame
    pub trace_file: Option<PathBuf>,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            log_file: Some(PathBuf::from("snake-arena.log")),
            trace_file: None,
            max_ticks: None,
        }
    }
}

impl Settings {
    /// Strict load: a missing file is `Ok(None)`, anything unreadable is an error
    pub fn try_load(path: &Path) -> Result<Option<Self>, SettingsError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Load settings, falling back to defaults on any problem. The outcome is
    /// returned rather than logged so callers can log it once a logger exists.
    pub fn load(path: &Path) -> (Self, SettingsSource) {
        match Self::try_load(path) {
            Ok(Some(settings)) => (settings, SettingsSource::File(path.to_path_buf())),
            Ok(None) => (Self::default(), SettingsSource::Defaults),
            Err(err) => (Self::default(), SettingsSource::Fallback(err)),
        }
    }

    /// Path from `SNAKE_ARENA_SETTINGS`, else `snake-arena.json`
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }
}
