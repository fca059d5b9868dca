//! TOML application configuration.
//!
//! Read from the platform-appropriate config file, unless `--config` or
//! `DRAGREC_CONFIG` names another one:
//! - Windows:  `%APPDATA%\dragrec\config.toml`
//! - Linux:    `~/.config/dragrec/config.toml`
//! - macOS:    `~/Library/Application Support/dragrec/config.toml`
//!
//! # What is TOML? (for beginners)
//!
//! TOML is a configuration format that looks like an INI file with types.
//! Every section and every field is optional here:
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [replay]
//! duration_ms = 800
//! countdown_secs = 5
//!
//! [overlay]
//! hide_delay_ms = 150
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent, so a config file only needs to
//! mention what it changes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::replay::ReplayTiming;
use crate::application::shell::ShellOptions;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` level used when neither `RUST_LOG` nor `--log-level` is set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where the settings record lives.  When unset (and no `--settings` is
    /// given) it is `settings.json` in the platform config directory, wherever
    /// `--config` points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,
}

/// Timing of the simulated drag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplayConfig {
    /// How long the drag from start to end takes.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// How long the glide to the start point takes.
    #[serde(default = "default_approach_ms")]
    pub approach_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_before_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_after_ms: u64,
    /// Interval between interpolated moves.
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    /// Countdown shown in the GUI between confirming and replaying.
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    /// Wait between hiding the main window and taking the screen snapshot.
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_duration_ms() -> u64 {
    500
}
fn default_approach_ms() -> u64 {
    200
}
fn default_settle_ms() -> u64 {
    500
}
fn default_step_ms() -> u64 {
    10
}
fn default_countdown_secs() -> u32 {
    3
}
fn default_hide_delay_ms() -> u64 {
    100
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            settings_file: None,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            approach_ms: default_approach_ms(),
            settle_before_ms: default_settle_ms(),
            settle_after_ms: default_settle_ms(),
            step_ms: default_step_ms(),
            countdown_secs: default_countdown_secs(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: default_hide_delay_ms(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl ReplayConfig {
    /// The executor's pauses.  A zero `step_ms` is raised to 1 ms so the
    /// step count stays finite.
    pub fn timing(&self) -> ReplayTiming {
        ReplayTiming {
            settle_before: Duration::from_millis(self.settle_before_ms),
            approach: Duration::from_millis(self.approach_ms),
            settle_after: Duration::from_millis(self.settle_after_ms),
            step: Duration::from_millis(self.step_ms.max(1)),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl AppConfig {
    pub fn shell_options(&self) -> ShellOptions {
        ShellOptions {
            hide_delay: Duration::from_millis(self.overlay.hide_delay_ms),
            countdown_secs: self.replay.countdown_secs,
            replay_duration: self.replay.duration(),
        }
    }
}

// ── Config file location ──────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(platform_config_dir()
        .ok_or(ConfigError::NoPlatformConfigDir)?
        .join("config.toml"))
}

/// Loads `AppConfig` from `path`, or from [`config_file_path`] when `None`.
/// A file that does not exist yields `AppConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

/// The `dragrec` directory under the platform config base directory.
pub(crate) fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("dragrec"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("dragrec"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("dragrec")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
