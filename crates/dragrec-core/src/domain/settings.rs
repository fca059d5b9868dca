//! The persisted settings record.
//!
//! On disk this is a single JSON document:
//!
//! ```json
//! {
//!     "selected_area": { "x": 10, "y": 20, "width": 300, "height": 150 },
//!     "mouse_track": { "start_x": 5, "start_y": 5, "end_x": 400, "end_y": 300 }
//! }
//! ```
//!
//! A key that is absent from the file takes its all-zero default.  Top-level
//! keys this version does not know about are kept in [`SettingsRecord::extra`]
//! so a rewrite does not silently drop them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::geometry::{Rectangle, Trajectory};

/// Everything dragrec remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// The last rectangle picked with the region overlay.
    #[serde(default)]
    pub selected_area: Rectangle,
    /// The last gesture recorded with the trajectory overlay.
    #[serde(default)]
    pub mouse_track: Trajectory,
    /// Unrecognised top-level keys, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsRecord {
    /// Parses a record from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or for a known key
    /// whose value has the wrong shape (e.g. a negative `width`).
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serializes the record as indented JSON.
    ///
    /// # Errors
    ///
    /// Only fails if an `extra` value cannot be represented, which cannot
    /// happen for values that were themselves parsed from JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// `true` when a non-empty area has been saved.
    pub fn has_area(&self) -> bool {
        self.selected_area.width > 0 && self.selected_area.height > 0
    }

    /// `true` when a trajectory with a non-zero end point has been saved.
    pub fn has_track(&self) -> bool {
        self.mouse_track.end_x > 0 || self.mouse_track.end_y > 0
    }
}
