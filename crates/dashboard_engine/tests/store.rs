use std::fs;

use dashboard_engine::{PreferenceStore, StoreError};
use tempfile::TempDir;

#[test]
fn missing_file_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    let store = PreferenceStore::new(temp.path().join("prefs.ron"));

    assert_eq!(store.get("theme").unwrap(), None);
}

#[test]
fn set_then_get_round_trips_and_keeps_other_keys() {
    let temp = TempDir::new().unwrap();
    let store = PreferenceStore::new(temp.path().join("nested").join("prefs.ron"));

    store.set("theme", "dark").unwrap();
    store.set("other", "value").unwrap();
    store.set("theme", "light").unwrap();

    assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
    assert_eq!(store.get("other").unwrap().as_deref(), Some("value"));
    assert!(store.path().is_file());
}

#[test]
fn malformed_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("prefs.ron");
    fs::write(&path, "{ not ron").unwrap();

    let err = PreferenceStore::new(&path).get("theme").unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
}

#[test]
fn no_partial_file_when_target_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let store = PreferenceStore::new(blocker.join("prefs.ron"));
    assert!(store.set("theme", "dark").is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
