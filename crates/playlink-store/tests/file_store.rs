//! Durability tests: values written through one `JsonFileStore` must be
//! visible to a fresh one opened on the same path.

use playlink_store::{JsonFileStore, PreferenceStore};

#[test]
fn test_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let store = JsonFileStore::open(&path).unwrap();
        store.set("play_games", "log_in_preference", "false").unwrap();
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(
        reopened
            .get("play_games", "log_in_preference")
            .unwrap()
            .as_deref(),
        Some("false")
    );
}

#[test]
fn test_remove_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let store = JsonFileStore::open(&path).unwrap();
        store.set("play_games", "log_in_preference", "true").unwrap();
        store.set("play_games", "other", "x").unwrap();
        store.remove("play_games", "log_in_preference").unwrap();
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get("play_games", "log_in_preference").unwrap(), None);
    assert_eq!(
        reopened.get("play_games", "other").unwrap().as_deref(),
        Some("x")
    );
}

#[test]
fn test_file_is_plain_nested_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let store = JsonFileStore::open(&path).unwrap();

    store.set("play_games", "log_in_preference", "true").unwrap();

    // Hosts sometimes seed this file by hand; keep the shape obvious.
    let text = std::fs::read_to_string(&path).unwrap();
    let expected = "{\n  \"play_games\": {\n    \"log_in_preference\": \"true\"\n  }\n}";
    assert_eq!(text, expected);
}

#[test]
fn test_hand_written_file_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, r#"{"play_games":{"log_in_preference":"TRUE"}}"#).unwrap();

    let store = JsonFileStore::open(&path).unwrap();

    assert_eq!(
        store.get("play_games", "log_in_preference").unwrap().as_deref(),
        Some("TRUE")
    );
}
