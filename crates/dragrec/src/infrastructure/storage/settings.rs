//! JSON-file implementation of [`SettingsRepository`].
//!
//! # Failure policy
//!
//! Loading never fails: a missing file is the normal first-run case and a
//! corrupt file is logged and replaced by defaults, so the user can always
//! get to the main window.  Saving does fail loudly, but the in-memory
//! record is updated first so the current session keeps working.
//!
//! # Atomic writes
//!
//! The record is written to a sibling temp file and then renamed over the
//! real one.  A crash mid-write leaves either the old or the new file, never
//! a truncated one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dragrec_core::{Rectangle, SettingsRecord, Trajectory};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::{platform_config_dir, ConfigError};
use crate::application::shell::{SettingsError, SettingsRepository};

/// File name of the settings record inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// `<platform config dir>/dragrec/settings.json`.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the base directory
/// cannot be determined from the environment.
pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    Ok(platform_config_dir()
        .ok_or(ConfigError::NoPlatformConfigDir)?
        .join(SETTINGS_FILE_NAME))
}

/// Reads a record from `path`.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] (including "not found") or
/// [`SettingsError::Parse`].  Callers that want defaults instead use
/// [`JsonSettingsStore::open`].
pub fn load_record(path: &Path) -> Result<SettingsRecord, SettingsError> {
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SettingsRecord::from_json(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `record` to `path` via temp file and rename, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns [`SettingsError::Serialize`] or [`SettingsError::Io`].
pub fn write_record(path: &Path, record: &SettingsRecord) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err(dir))?;
    }

    let content = record.to_json_pretty().map_err(SettingsError::Serialize)?;
    let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
    fs::write(&tmp, content).map_err(io_err(&tmp))?;
    if let Err(source) = fs::rename(&tmp, path) {
        fs::remove_file(&tmp).ok();
        return Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    debug!(path = %path.display(), "settings written");
    Ok(())
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SettingsError {
    let path = path.to_path_buf();
    move |source| SettingsError::Io { path, source }
}

/// Settings kept in memory and mirrored to one JSON file.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    record: SettingsRecord,
}

impl JsonSettingsStore {
    /// Loads the record at `path`, or defaults if it is missing or corrupt.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = match load_record(&path) {
            Ok(record) => {
                info!(path = %path.display(), "loaded settings");
                record
            }
            Err(SettingsError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file yet; using defaults");
                SettingsRecord::default()
            }
            Err(e) => {
                warn!(error = %e, "could not load settings; using defaults");
                SettingsRecord::default()
            }
        };
        Self { path, record }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), SettingsError> {
        write_record(&self.path, &self.record)
    }
}

impl SettingsRepository for JsonSettingsStore {
    fn record(&self) -> SettingsRecord {
        self.record.clone()
    }

    fn save_area(&mut self, area: Rectangle) -> Result<(), SettingsError> {
        self.record.selected_area = area;
        self.persist()
    }

    fn save_track(&mut self, track: Trajectory) -> Result<(), SettingsError> {
        self.record.mouse_track = track;
        self.persist()
    }
}
