//! # dragrec-core
//!
//! Shared library for dragrec containing the geometry and settings domain
//! types plus the two full-screen overlays expressed as toolkit-neutral
//! state machines.
//!
//! It has zero dependencies on OS APIs, UI frameworks, or input backends.
//!
//! # Architecture overview (for beginners)
//!
//! dragrec lets a user pick a rectangle on screen, record a press/drag/release
//! gesture, and later replay that gesture with simulated mouse input.  The
//! GUI toolkit draws the overlays and forwards pointer events; everything
//! that decides *what* happens lives here so it can be tested without a
//! display:
//!
//! - **`domain`** – Plain data: [`Point`], [`Rectangle`], [`Trajectory`], and
//!   the persisted [`SettingsRecord`].
//!
//! - **`overlay`** – The region selector and trajectory recorder.  Each one
//!   consumes [`OverlayInput`] events, exposes a [`Scene`] describing what to
//!   paint, and notifies subscribers through two [`Signal`]s: one for the
//!   result and one for the close.

pub mod domain;
pub mod overlay;

pub use domain::geometry::{Point, Rectangle, ScreenArea, Trajectory};
pub use domain::settings::SettingsRecord;
pub use overlay::region::RegionSelector;
pub use overlay::scene::{Rgba, Scene, Shape};
pub use overlay::signal::{Signal, SubscriptionId};
pub use overlay::trajectory::TrajectoryRecorder;
pub use overlay::{CloseReason, Overlay, OverlayInput, OverlayStatus, PointerButton};
