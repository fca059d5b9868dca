//! dragrec library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does dragrec do? (for beginners)
//!
//! dragrec is a small desktop tool with three buttons:
//!
//! 1. **Select area** – the window hides, the screen is frozen into a
//!    snapshot, and the user drags out a rectangle over it.
//! 2. **Record mouse track** – same frozen screen; the user presses, drags,
//!    and releases, and the two end points are remembered.
//! 3. **Replay mouse track** – after a confirmation and a short countdown,
//!    the recorded gesture is performed again with simulated input
//!    (`SendInput` on Windows, XTest on Linux, CoreGraphics on macOS).
//!
//! Both results are stored in a small JSON settings file and shown again
//! on the next start.

/// Application layer: use cases and the shell controller.
pub mod application;

/// Infrastructure layer: OS adapters, storage, and the eframe UI.
pub mod infrastructure;
