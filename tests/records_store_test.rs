use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use gap_runner::core::{JsonRecordStore, RecordId, RecordStore, RoundRecord, StoreError};
use gap_runner::types::Mode;

fn record(score: u32, mode: Mode, offset_secs: i64) -> RoundRecord {
    let at = Utc.timestamp_opt(1_750_000_000 + offset_secs, 0).unwrap();
    RoundRecord::new(score, mode, 95, at)
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempdir().unwrap();
    let store = JsonRecordStore::new(dir.path().join("records.json"));
    assert!(store.fetch_all().unwrap().is_empty());
}

#[test]
fn records_survive_reopening_and_sort_recent_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("records.json");

    let mut store = JsonRecordStore::new(&path);
    store.save(&record(40, Mode::Uniform, 0)).unwrap();
    store.save(&record(70, Mode::Diverse, 600)).unwrap();
    store.save(&record(10, Mode::Uniform, 300)).unwrap();

    let reopened = JsonRecordStore::new(&path);
    let records = reopened.fetch_all().unwrap();
    let scores: Vec<u32> = records.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![70, 10, 40]);
    assert_eq!(records[0].mode, Mode::Diverse);
    assert_eq!(records[0].duration_label(), "1:35");
}

#[test]
fn file_is_a_json_array_of_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records.json");
    let mut store = JsonRecordStore::new(&path);
    let saved = record(120, Mode::Diverse, 0);
    store.save(&saved).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &value.as_array().unwrap()[0];
    assert_eq!(entry["id"], saved.id.to_string());
    assert_eq!(entry["score"], 120);
    assert_eq!(entry["mode"], "diverse");
    assert_eq!(entry["duration_seconds"], 95);
}

#[test]
fn delete_removes_only_the_matching_record() {
    let dir = tempdir().unwrap();
    let mut store = JsonRecordStore::new(dir.path().join("records.json"));
    let keep = record(10, Mode::Uniform, 0);
    let drop = record(20, Mode::Uniform, 10);
    store.save(&keep).unwrap();
    store.save(&drop).unwrap();

    assert!(store.delete(drop.id).unwrap());
    assert!(!store.delete(drop.id).unwrap());
    assert!(!store.delete(RecordId::new()).unwrap());
    assert_eq!(store.fetch_all().unwrap(), vec![keep]);
}

#[test]
fn clear_all_leaves_an_empty_store() {
    let dir = tempdir().unwrap();
    let mut store = JsonRecordStore::new(dir.path().join("records.json"));
    store.save(&record(10, Mode::Uniform, 0)).unwrap();
    store.clear_all().unwrap();
    assert!(store.fetch_all().unwrap().is_empty());
    store.save(&record(30, Mode::Diverse, 0)).unwrap();
    assert_eq!(store.fetch_all().unwrap().len(), 1);
}

#[test]
fn corrupt_file_is_reported_not_overwritten() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut store = JsonRecordStore::new(&path);
    assert!(matches!(store.fetch_all(), Err(StoreError::Json { .. })));
    assert!(store.save(&record(5, Mode::Uniform, 0)).is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn record_ids_parse_from_their_display_form() {
    let id = RecordId::new();
    let parsed: RecordId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
    assert!("not-a-uuid".parse::<RecordId>().is_err());
}
