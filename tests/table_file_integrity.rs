//! Table file integrity tests
//!
//! - Values survive the file format unchanged
//! - Malformed files are reported, never skipped
//! - The header is fixed at creation

use csvstore::{QueryCondition, Record, StoreErrorCode, TableStore};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_store() -> (TempDir, TableStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = TableStore::open(temp_dir.path()).expect("Failed to open store");
    (temp_dir, store)
}

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_special_characters_survive_rewrite() {
    let (_temp_dir, store) = create_temp_store();
    store.create_table("quotes", ["key", "text"]).unwrap();

    let values = [
        "plain",
        "comma, inside",
        "say \"hi\"",
        "two\nlines",
        " leading space",
        "",
        "unicode: żółć 漢字",
    ];
    for (i, text) in values.iter().enumerate() {
        store
            .insert("quotes", &record(&[("key", &i.to_string()), ("text", text)]))
            .unwrap();
    }

    // force a full rewrite of the file
    let updated = store
        .update(
            "quotes",
            &record(&[("key", "0")]),
            &[QueryCondition::eq("text", "plain")],
        )
        .unwrap();
    assert_eq!(updated.count, 1);

    let stored = store.query("quotes", &[]).unwrap();
    let texts: Vec<&str> = stored.iter().map(|r| r["text"].as_str()).collect();
    assert_eq!(texts, values.to_vec());
}

#[test]
fn test_single_empty_column_rows_are_kept() {
    let (_temp_dir, store) = create_temp_store();
    store.create_table("single", ["value"]).unwrap();

    store.insert("single", &Record::new()).unwrap();
    store.insert("single", &record(&[("value", "x")])).unwrap();
    store.insert("single", &Record::new()).unwrap();

    let stored = store.query("single", &[]).unwrap();
    assert_eq!(stored.count, 3);
    assert_eq!(stored.records[0]["value"], "");
    assert_eq!(stored.records[1]["value"], "x");
}

#[test]
fn test_existing_file_is_readable() {
    let (temp_dir, store) = create_temp_store();
    fs::write(
        temp_dir.path().join("legacy.csv"),
        "id,name\r\n1,\"Smith, J\"\r\n\r\n2,Doe\r\n",
    )
    .unwrap();

    assert_eq!(store.list_tables().unwrap(), vec!["legacy"]);
    let stored = store.query("legacy", &[]).unwrap();
    assert_eq!(stored.count, 2);
    assert_eq!(stored.records[0]["name"], "Smith, J");
    assert_eq!(stored.records[1]["name"], "Doe");
}

#[test]
fn test_insert_after_unterminated_last_row() {
    let (temp_dir, store) = create_temp_store();
    let path = temp_dir.path().join("legacy.csv");
    fs::write(&path, "id,name\n1,Ann").unwrap();

    store
        .insert("legacy", &record(&[("id", "2"), ("name", "Bob")]))
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "id,name\n1,Ann\n2,Bob\n");
    let stored = store.query("legacy", &[]).unwrap();
    assert_eq!(stored.count, 2);
    assert_eq!(stored.records[0]["name"], "Ann");
    assert_eq!(stored.records[1]["name"], "Bob");
}

// =============================================================================
// Corruption Is Never Ignored
// =============================================================================

#[test]
fn test_field_count_mismatch_is_corruption() {
    let (temp_dir, store) = create_temp_store();
    fs::write(temp_dir.path().join("broken.csv"), "id,name\n1,Ann\n2\n").unwrap();

    let err = store.query("broken", &[]).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::DataCorruption);
    assert!(err.is_fatal());
    assert!(err.to_string().contains("line: 3"), "got: {}", err);
}

#[test]
fn test_unterminated_quote_is_corruption() {
    let (temp_dir, store) = create_temp_store();
    fs::write(temp_dir.path().join("broken.csv"), "id,name\n1,\"Ann\n").unwrap();

    let err = store.delete("broken", &[]).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::DataCorruption);
}

#[test]
fn test_corrupt_file_is_not_rewritten() {
    let (temp_dir, store) = create_temp_store();
    let path = temp_dir.path().join("broken.csv");
    let content = "id,name\n1,Ann\n2,Bob,extra\n";
    fs::write(&path, content).unwrap();

    assert!(store.update("broken", &record(&[("name", "x")]), &[]).is_err());
    assert!(store.delete("broken", &[]).is_err());
    assert!(store.insert("broken", &record(&[("name", "x")])).is_ok());
    assert!(fs::read_to_string(&path).unwrap().starts_with(content));
}

#[test]
fn test_non_utf8_is_corruption() {
    let (temp_dir, store) = create_temp_store();
    fs::write(temp_dir.path().join("binary.csv"), [0x69, 0x64, 0x0a, 0xff, 0xfe, 0x0a]).unwrap();

    let err = store.query("binary", &[]).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::DataCorruption);
}

// =============================================================================
// Header Immutability
// =============================================================================

#[test]
fn test_header_never_changes() {
    let (temp_dir, store) = create_temp_store();
    store.create_table("users", ["id", "name"]).unwrap();
    let path = temp_dir.path().join("users.csv");

    store
        .insert("users", &record(&[("name", "Ann"), ("age", "30")]))
        .unwrap();
    store
        .update("users", &record(&[("email", "a@example.com")]), &[])
        .unwrap();
    store.delete("users", &[]).unwrap();

    assert_eq!(store.header("users").unwrap(), vec!["id", "name"]);
    assert_eq!(fs::read_to_string(&path).unwrap(), "id,name\n");
}
