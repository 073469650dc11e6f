use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use stockledger_journal::{FrameKind, JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Movement {
    sequence: u64,
    tenant_id: String,
    quantity: i64,
}

fn movement(sequence: u64) -> Movement {
    Movement {
        sequence,
        tenant_id: "acme".into(),
        quantity: 10 * sequence as i64,
    }
}

#[test]
fn test_write_read_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_record(&movement(1)).unwrap();
    writer.append_record(&movement(2)).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_record::<Movement>().unwrap(), Some(movement(1)));
    assert_eq!(reader.read_record::<Movement>().unwrap(), Some(movement(2)));
    assert_eq!(reader.read_record::<Movement>().unwrap(), None);
}

#[test]
fn test_append_to_existing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    for seq in 1..=3 {
        let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
        writer.append_record(&movement(seq)).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    let all: Vec<Movement> = reader.read_all().unwrap();
    assert_eq!(all, vec![movement(1), movement(2), movement(3)]);
}

#[test]
fn test_offsets_are_monotonic() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    let mut writer = JournalWriter::open(&path, WriteOptions { sync: true, create: true }).unwrap();
    assert!(writer.is_empty());
    let first = writer.append_record(&movement(1)).unwrap();
    let second = writer.append_record(&movement(2)).unwrap();
    assert_eq!(first, 16);
    assert!(second > first);
    assert_eq!(writer.len(), fs::metadata(&path).unwrap().len());
}

#[test]
fn test_empty_journal_reads_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");
    JournalWriter::open(&path, WriteOptions::default())
        .unwrap()
        .finish()
        .unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len(), 16);
    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(reader.read_record::<Value>().unwrap().is_none());
}

#[test]
fn test_unknown_frames_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_raw(FrameKind::Unknown(0x7F), b"opaque").unwrap();
    writer.append_record(&json!({"sequence": 1})).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    let record: Value = reader.read_record().unwrap().unwrap();
    assert_eq!(record["sequence"], 1);
}

#[test]
fn test_missing_file_without_create_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.slj");
    let result = JournalWriter::open(&path, WriteOptions { sync: false, create: false });
    assert!(matches!(result, Err(JournalError::Io(_))));
}

#[test]
fn test_writer_refuses_foreign_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.txt");
    fs::write(&path, b"this is not a journal, just text").unwrap();

    let result = JournalWriter::open(&path, WriteOptions::default());
    assert!(matches!(result, Err(JournalError::InvalidHeader(_))));
    assert_eq!(fs::read(&path).unwrap(), b"this is not a journal, just text");
}

#[test]
fn test_decode_error_surfaces_for_wrong_shape() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_record(&json!({"sequence": "one"})).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(matches!(
        reader.read_record::<Movement>(),
        Err(JournalError::Decode(_))
    ));
}

#[test]
fn test_second_writer_is_locked_out() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    let mut first = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    assert!(matches!(
        JournalWriter::open(&path, WriteOptions::default()),
        Err(JournalError::Locked(_))
    ));
    first.append_record(&movement(1)).unwrap();
    drop(first);

    let mut second = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    second.append_record(&movement(2)).unwrap();
    second.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    let all: Vec<Movement> = reader.read_all().unwrap();
    assert_eq!(all, vec![movement(1), movement(2)]);
}

#[test]
fn test_truncate_drops_trailing_frames() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_record(&movement(1)).unwrap();
    let cut = writer.append_record(&movement(2)).unwrap();
    writer.truncate(cut).unwrap();
    assert_eq!(writer.len(), cut);
    assert!(writer.truncate(cut + 1).is_err());
    writer.append_record(&movement(3)).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    let all: Vec<Movement> = reader.read_all().unwrap();
    assert_eq!(all, vec![movement(1), movement(3)]);
}
