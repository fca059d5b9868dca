//! Infrastructure layer for dragrec.
//!
//! Contains OS-facing adapters: pointer injection, screen capture, file
//! storage, and the eframe GUI.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `dragrec_core`, but MUST NOT be imported by the `application` or domain
//! layers.
//!
//! # Sub-modules
//!
//! - **`pointer`** – OS-specific implementations of `PointerBackend`.  The
//!   correct implementation is selected at compile time using
//!   `#[cfg(target_os)]`.  A `MockPointerBackend` is also provided for tests
//!   and `--dry-run`.
//!
//! - **`screen_capture`** – `ScreenCapturer` implementations: `xcap` for the
//!   real screen, a solid-color mock for tests.
//!
//! - **`storage`** – The JSON settings store and the TOML application config.
//!
//! - **`ui`** – The eframe application: main window, overlay viewport, and
//!   the `WindowControl` adapter.

pub mod pointer;
pub mod screen_capture;
pub mod storage;
pub mod ui;
