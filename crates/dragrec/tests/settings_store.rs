//! Integration tests for the JSON settings store.
//!
//! Each test works in its own directory under the system temp dir so the
//! tests can run in parallel and never touch the user's real settings.

use std::fs;
use std::path::PathBuf;

use dragrec::application::shell::SettingsRepository;
use dragrec::infrastructure::storage::settings::{load_record, JsonSettingsStore};
use dragrec_core::{Point, Rectangle, SettingsRecord, Trajectory};
use serde_json::Value;
use uuid::Uuid;

struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("dragrec_store_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn file(&self) -> PathBuf {
        self.0.join("settings.json")
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.0).ok();
    }
}

#[test]
fn test_saved_area_and_track_survive_reopen() {
    // Arrange
    let dir = TempDir::new();
    let area = Rectangle::new(10, 20, 300, 150);
    let track = Trajectory::new(Point::new(5, 5), Point::new(400, 300));

    // Act
    {
        let mut store = JsonSettingsStore::open(dir.file());
        store.save_area(area).unwrap();
        store.save_track(track).unwrap();
    }
    let reopened = JsonSettingsStore::open(dir.file());

    // Assert
    assert_eq!(reopened.record().selected_area, area);
    assert_eq!(reopened.record().mouse_track, track);
}

#[test]
fn test_saving_area_keeps_previous_track() {
    // Arrange
    let dir = TempDir::new();
    let track = Trajectory::new(Point::new(1, 2), Point::new(3, 4));
    JsonSettingsStore::open(dir.file()).save_track(track).unwrap();

    // Act
    let mut store = JsonSettingsStore::open(dir.file());
    store.save_area(Rectangle::new(0, 0, 50, 50)).unwrap();

    // Assert
    let on_disk = load_record(&dir.file()).unwrap();
    assert_eq!(on_disk.mouse_track, track);
    assert_eq!(on_disk.selected_area, Rectangle::new(0, 0, 50, 50));
}

#[test]
fn test_missing_file_opens_with_defaults() {
    let dir = TempDir::new();

    let store = JsonSettingsStore::open(dir.file());

    assert_eq!(store.record(), SettingsRecord::default());
    assert!(!dir.file().exists(), "opening must not create the file");
}

#[test]
fn test_corrupt_file_opens_with_defaults_and_is_replaced_on_save() {
    // Arrange
    let dir = TempDir::new();
    fs::write(dir.file(), "{ this is not json").unwrap();

    // Act
    let mut store = JsonSettingsStore::open(dir.file());
    let before = store.record();
    store.save_area(Rectangle::new(1, 1, 2, 2)).unwrap();

    // Assert
    assert_eq!(before, SettingsRecord::default());
    assert_eq!(
        load_record(&dir.file()).unwrap().selected_area,
        Rectangle::new(1, 1, 2, 2)
    );
}

#[test]
fn test_file_uses_documented_keys() {
    // Arrange
    let dir = TempDir::new();
    let mut store = JsonSettingsStore::open(dir.file());

    // Act
    store.save_area(Rectangle::new(10, 20, 300, 150)).unwrap();
    store
        .save_track(Trajectory::new(Point::new(5, 5), Point::new(400, 300)))
        .unwrap();

    // Assert
    let json: Value = serde_json::from_str(&fs::read_to_string(dir.file()).unwrap()).unwrap();
    assert_eq!(json["selected_area"]["x"], 10);
    assert_eq!(json["selected_area"]["y"], 20);
    assert_eq!(json["selected_area"]["width"], 300);
    assert_eq!(json["selected_area"]["height"], 150);
    assert_eq!(json["mouse_track"]["start_x"], 5);
    assert_eq!(json["mouse_track"]["start_y"], 5);
    assert_eq!(json["mouse_track"]["end_x"], 400);
    assert_eq!(json["mouse_track"]["end_y"], 300);
}

#[test]
fn test_unknown_keys_are_kept_across_saves() {
    // Arrange
    let dir = TempDir::new();
    fs::write(dir.file(), r#"{ "window": { "x": 5 } }"#).unwrap();

    // Act
    let mut store = JsonSettingsStore::open(dir.file());
    store.save_area(Rectangle::new(0, 0, 10, 10)).unwrap();

    // Assert
    let json: Value = serde_json::from_str(&fs::read_to_string(dir.file()).unwrap()).unwrap();
    assert_eq!(json["window"]["x"], 5);
}
