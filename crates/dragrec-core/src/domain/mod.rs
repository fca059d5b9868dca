//! Domain entities for dragrec.
//!
//! This module contains pure data types with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of the application holds the concepts that make the
//! program what it is: a point on the screen, a selected rectangle, a
//! recorded drag.  Outer layers (the replay executor, the JSON store, the
//! eframe UI) depend on these types, but the types never depend on them, so
//! they compile and test on any machine without a display.

/// Screen-space points, rectangles, and drag trajectories.
pub mod geometry;

/// The persisted record of the last selection and the last trajectory.
pub mod settings;
