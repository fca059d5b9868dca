//! Application layer use cases for dragrec.
//!
//! # What use cases does dragrec have?
//!
//! - **`replay`** – Plays a recorded trajectory back as a press-drag-release
//!   gesture on a background thread.  The actual OS calls are made by a
//!   `PointerBackend` implementation injected at construction time.
//!
//! - **`capture`** – The `ScreenCapturer` seam and the `Snapshot` an overlay
//!   is drawn over.
//!
//! - **`shell`** – The controller behind the main window: starts captures,
//!   owns the open overlay, persists results, and drives the replay
//!   countdown.

pub mod capture;
pub mod replay;
pub mod shell;
