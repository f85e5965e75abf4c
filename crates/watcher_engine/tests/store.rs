use std::collections::BTreeMap;
use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use watcher_core::{NormalizeRules, Normalizer, SeenSet};
use watcher_engine::SeenStore;

fn normalizer() -> Normalizer {
    Normalizer::new(NormalizeRules::default()).unwrap()
}

fn seen(keys: &[&str]) -> SeenSet {
    keys.iter().map(|k| k.to_string()).collect()
}

#[test]
fn missing_snapshot_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("jobs_seen.json"));

    let state = store.load(&normalizer());

    assert!(state.seen.is_empty());
    assert!(state.contents.is_empty());
}

#[test]
fn corrupt_snapshot_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jobs_seen.json");
    fs::write(&path, "{not json").unwrap();

    let state = SeenStore::new(path).load(&normalizer());

    assert!(state.seen.is_empty());
}

#[test]
fn save_then_load_round_trips() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("jobs_seen.json"));
    let keys = seen(&["Intern, Acme", "Backend Dev"]);
    let mut contents = BTreeMap::new();
    contents.insert("Intern, Acme".to_string(), "Apply by Friday".to_string());

    store.save(&keys, &contents).unwrap();
    let state = store.load(&normalizer());

    assert_eq!(state.seen, keys);
    assert_eq!(
        state.contents.get("Intern, Acme").map(String::as_str),
        Some("Apply by Friday")
    );
}

#[test]
fn snapshot_is_written_in_sorted_order() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("jobs_seen.json"));

    store
        .save(&seen(&["Zeta role", "Alpha role"]), &BTreeMap::new())
        .unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    let document: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        document["keys"],
        serde_json::json!(["Alpha role", "Zeta role"])
    );
    assert_eq!(document["contents"], serde_json::json!(["", ""]));
}

#[test]
fn legacy_bare_array_snapshot_is_accepted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jobs_seen.json");
    fs::write(&path, r#"["Intern, Acme", "Backend Dev"]"#).unwrap();

    let state = SeenStore::new(path).load(&normalizer());

    assert_eq!(state.seen, seen(&["Backend Dev", "Intern, Acme"]));
    assert!(state.contents.is_empty());
}

#[test]
fn snapshot_without_contents_list_reads_as_empty_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jobs_seen.json");
    fs::write(&path, r#"{"keys": ["Intern, Acme"]}"#).unwrap();

    let state = SeenStore::new(path).load(&normalizer());

    assert!(state.seen.contains("Intern, Acme"));
    assert!(state.contents.is_empty());
}

#[test]
fn loaded_keys_are_re_normalized() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jobs_seen.json");
    fs::write(&path, r#"["Role X · 3 hours ago."]"#).unwrap();

    let state = SeenStore::new(path).load(&normalizer());

    assert!(state.seen.contains("Role X"));
    assert_eq!(state.seen.len(), 1);
}

#[test]
fn save_creates_missing_parent_directory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("jobs_seen.json");
    let store = SeenStore::new(path.clone());

    store.save(&seen(&["Role"]), &BTreeMap::new()).unwrap();

    assert!(path.is_file());
}

#[test]
fn no_partial_snapshot_on_error() {
    let temp = TempDir::new().unwrap();
    // A plain file where the parent directory should be.
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();
    let store = SeenStore::new(blocker.join("jobs_seen.json"));

    let result = store.save(&seen(&["Role"]), &BTreeMap::new());

    assert!(result.is_err());
    assert!(!blocker.join("jobs_seen.json").exists());
}

#[test]
fn save_overwrites_whole_snapshot() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("jobs_seen.json"));

    store.save(&seen(&["Old role"]), &BTreeMap::new()).unwrap();
    store
        .save(&seen(&["Old role", "New role"]), &BTreeMap::new())
        .unwrap();

    let state = store.load(&normalizer());
    assert_eq!(state.seen.len(), 2);
}
