use serde_json::{json, Value};
use stockledger_journal::{
    FrameKind, JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions,
    MAX_PAYLOAD_SIZE,
};
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::TempDir;

fn write_records(path: &Path, count: u64) {
    let mut writer = JournalWriter::open(path, WriteOptions::default()).unwrap();
    for seq in 1..=count {
        writer
            .append_record(&json!({"sequence": seq, "skuId": "sku-1"}))
            .unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn test_payload_size_limit() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    let oversized = vec![b' '; MAX_PAYLOAD_SIZE as usize + 1];
    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    match writer.append_raw(FrameKind::LedgerRecord, &oversized) {
        Err(JournalError::PayloadTooLarge { size, max }) => {
            assert_eq!(size, MAX_PAYLOAD_SIZE as usize + 1);
            assert_eq!(max, MAX_PAYLOAD_SIZE);
        }
        other => panic!("expected PayloadTooLarge, got {:?}", other.map(|_| ())),
    }
    // Nothing was written past the header.
    assert_eq!(fs::metadata(&path).unwrap().len(), 16);
}

#[test]
fn test_truncated_payload_strict_vs_permissive() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");
    write_records(&path, 2);

    let len = fs::metadata(&path).unwrap().len();
    OpenOptions::new()
        .write(true)
        .open(&path)
        .unwrap()
        .set_len(len - 5)
        .unwrap();

    let mut strict = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(strict.read_record::<Value>().unwrap().is_some());
    assert!(matches!(
        strict.read_record::<Value>(),
        Err(JournalError::TruncatedFrame { .. })
    ));

    let mut permissive = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    let records: Vec<Value> = permissive.read_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["sequence"], 1);
}

#[test]
fn test_truncated_frame_header() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");
    write_records(&path, 1);

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0x01, 0x00, 0x00]).unwrap();
    drop(file);

    let mut strict = JournalReader::open(&path, ReadMode::Strict).unwrap();
    strict.read_record::<Value>().unwrap();
    let offset = strict.position();
    match strict.read_record::<Value>() {
        Err(JournalError::TruncatedFrame { offset: at }) => assert_eq!(at, offset),
        other => panic!("expected TruncatedFrame, got {:?}", other),
    }

    let mut permissive = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert_eq!(permissive.read_all::<Value>().unwrap().len(), 1);
}

#[test]
fn test_corrupted_payload_fails_in_both_modes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");
    write_records(&path, 2);

    // Flip a byte inside the first payload: 16 header + 12 frame header + 2.
    let mut file = OpenOptions::new().write(true).open(&path).unwrap();
    file.seek(SeekFrom::Start(16 + 12 + 2)).unwrap();
    file.write_all(b"X").unwrap();
    drop(file);

    for mode in [ReadMode::Strict, ReadMode::Permissive] {
        let mut reader = JournalReader::open(&path, mode).unwrap();
        match reader.read_record::<Value>() {
            Err(JournalError::ChecksumMismatch { offset, .. }) => assert_eq!(offset, 16),
            other => panic!("expected ChecksumMismatch, got {:?}", other),
        }
    }
}

#[test]
fn test_nonzero_reserved_bytes_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");
    write_records(&path, 1);

    let mut file = OpenOptions::new().write(true).open(&path).unwrap();
    file.seek(SeekFrom::Start(16 + 1)).unwrap();
    file.write_all(&[0xAA]).unwrap();
    drop(file);

    let mut reader = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert!(matches!(
        reader.read_record::<Value>(),
        Err(JournalError::InvalidFrame { offset: 16, .. })
    ));
}

#[test]
fn test_short_file_is_not_a_journal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");
    fs::write(&path, b"SLJ1").unwrap();

    assert!(matches!(
        JournalReader::open(&path, ReadMode::Permissive),
        Err(JournalError::InvalidHeader(_))
    ));
    assert!(matches!(
        JournalWriter::open(&path, WriteOptions::default()),
        Err(JournalError::InvalidHeader(_))
    ));
}

#[test]
fn test_append_after_torn_tail_is_not_silently_hidden() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");
    write_records(&path, 1);

    let len = fs::metadata(&path).unwrap().len();
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0x01, 0, 0, 0, 0xFF, 0, 0, 0]).unwrap();
    drop(file);
    assert_eq!(fs::metadata(&path).unwrap().len(), len + 8);

    let mut strict = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert_eq!(strict.read_record::<Value>().unwrap().unwrap()["sequence"], 1);
    assert!(strict.read_record::<Value>().is_err());
}
