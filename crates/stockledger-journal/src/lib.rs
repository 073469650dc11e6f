//! Append-only journal file format for stockledger records.
//!
//! A journal is a 16-byte header followed by length-prefixed frames. Each
//! frame carries a CRC-32 checksum of its payload, so a reader can
//! tell a torn tail (frame cut short by a crash) from corruption in the
//! middle of the file.
//!
//! - [`JournalWriter`] appends JSON records and never rewrites earlier bytes
//! - [`JournalReader`] replays them in [`ReadMode::Strict`] or
//!   [`ReadMode::Permissive`] mode
//!
//! ```rust,no_run
//! use stockledger_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use serde_json::{json, Value};
//!
//! let mut writer = JournalWriter::open("ledger.slj", WriteOptions::default())?;
//! writer.append_record(&json!({"sequence": 1}))?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open("ledger.slj", ReadMode::Strict)?;
//! while let Some(record) = reader.read_record::<Value>()? {
//!     println!("{}", record["sequence"]);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Header and frame layout.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Journal writer implementation.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame, MAX_PAYLOAD_SIZE};
pub use reader::{JournalReader, ReadMode};
pub use writer::{JournalWriter, WriteOptions};
