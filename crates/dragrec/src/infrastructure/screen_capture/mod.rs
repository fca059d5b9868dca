//! Screen capture adapters.
//!
//! The application layer asks for a [`Snapshot`](crate::application::capture::Snapshot)
//! through the [`ScreenCapturer`](crate::application::capture::ScreenCapturer)
//! trait.  This module provides the implementations:
//!
//! | Type                  | Backed by                       | Used for            |
//! |-----------------------|---------------------------------|---------------------|
//! | `XcapScreenCapturer`  | `xcap` (DXGI / X11 / ScreenKit) | the real app        |
//! | `MockScreenCapturer`  | an in-memory solid image        | tests, `--dry-run`  |
//!
//! Unlike the pointer backends, no `#[cfg(target_os)]` split is needed here:
//! `xcap` already hides the per-OS capture APIs behind one `Monitor` type.

pub mod mock;
pub mod xcap_capture;

pub use mock::MockScreenCapturer;
pub use xcap_capture::XcapScreenCapturer;
