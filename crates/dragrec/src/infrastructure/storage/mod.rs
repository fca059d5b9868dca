//! Storage infrastructure: settings and configuration file persistence.
//!
//! Two files live in the platform config directory:
//!
//! - `settings.json` – the [`SettingsRecord`](dragrec_core::SettingsRecord)
//!   (last area and last trajectory), rewritten after every capture.  See
//!   [`settings`].
//! - `config.toml` – user-edited knobs such as replay timing and log level,
//!   only ever read.  See [`config`].
//!
//! Both fall back to defaults when the file does not exist yet (first run).

pub mod config;
pub mod settings;
