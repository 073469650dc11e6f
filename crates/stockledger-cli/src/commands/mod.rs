//! Subcommand implementations.

use serde_json::Value;
use std::io::{self, Read};
use std::path::PathBuf;
use stockledger_store::{JournalStore, ReadMode};

use crate::path;

pub mod canonicalize;
pub mod get;
pub mod hash;
pub mod list;
pub mod submit;
pub mod verify;

/// Reads JSON from `input`, or stdin when `None`.
pub fn read_json(input: Option<String>) -> Result<Value, Box<dyn std::error::Error>> {
    let json_str = if let Some(path) = input {
        std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };
    Ok(serde_json::from_str(&json_str).map_err(|e| format!("Invalid JSON: {}", e))?)
}

/// Opens an existing journal for read-only commands.
pub fn open_existing(
    journal: PathBuf,
    mode: ReadMode,
) -> Result<JournalStore, Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(&journal, true)
        .map_err(|e| format!("Invalid journal path: {}", e))?;
    let store = JournalStore::open(&journal_path, mode, false).map_err(|e| {
        format!(
            "Failed to open journal file: {}: {}",
            path::sanitize_path_for_error(&journal_path),
            e
        )
    })?;
    Ok(store)
}
