//! Journal writer.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, HEADER_SIZE};
use fs2::FileExt;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// fsync after each append (default: false).
    pub sync: bool,
    /// Create the file if it doesn't exist (default: true).
    pub create: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
        }
    }
}

/// Append-only writer for `SLJ1` journals.
///
/// Existing files are validated and never truncated; every append lands at
/// the end of the file. The writer holds an exclusive advisory lock on the
/// file until it is dropped, so a second writer on the same path fails with
/// [`JournalError::Locked`].
///
/// A failed append is rolled back to the last good length. If the rollback
/// itself fails the writer is poisoned and refuses further appends.
///
/// ```rust,no_run
/// use stockledger_journal::{JournalWriter, WriteOptions};
/// use serde_json::json;
///
/// let mut writer = JournalWriter::open("ledger.slj", WriteOptions::default())?;
/// writer.append_record(&json!({"sequence": 1}))?;
/// writer.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalWriter {
    file: File,
    sync: bool,
    len: u64,
    poisoned: bool,
}

impl JournalWriter {
    /// Opens or creates a journal file for appending.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened, when another writer holds it,
    /// or when it is non-empty but does not start with a valid journal header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .append(true)
            .open(path)?;
        if let Err(err) = file.try_lock_exclusive() {
            if err.kind() == fs2::lock_contended_error().kind() {
                return Err(JournalError::Locked(path.to_path_buf()));
            }
            return Err(err.into());
        }

        let len = file.metadata()?.len();
        let mut writer = if len == 0 {
            let mut writer = Self {
                file,
                sync: options.sync,
                len: 0,
                poisoned: false,
            };
            writer.write_all(&JournalHeader::current().encode())?;
            writer
        } else {
            if len < HEADER_SIZE as u64 {
                return Err(JournalError::InvalidHeader(format!(
                    "file is {} bytes, shorter than the {} byte header",
                    len, HEADER_SIZE
                )));
            }
            let mut header = [0u8; HEADER_SIZE];
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            JournalHeader::decode(&header)?;
            Self {
                file,
                sync: options.sync,
                len,
                poisoned: false,
            }
        };
        writer.file.seek(SeekFrom::End(0))?;
        Ok(writer)
    }

    /// Serializes `record` as JSON and appends it as a ledger record frame.
    ///
    /// Returns the byte offset of the new frame.
    pub fn append_record<T: Serialize>(&mut self, record: &T) -> Result<u64, JournalError> {
        let payload = serde_json::to_vec(record)?;
        self.append_raw(FrameKind::LedgerRecord, &payload)
    }

    /// Appends a raw frame with the given kind and payload.
    ///
    /// Header and payload go out in a single write so a crash leaves at most
    /// one torn frame at the tail.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<u64, JournalError> {
        let frame = RecordFrame::for_payload(kind, payload)?;
        let offset = self.len;
        let mut buf = Vec::with_capacity(frame.encode().len() + payload.len());
        buf.extend_from_slice(&frame.encode());
        buf.extend_from_slice(payload);
        self.write_all(&buf)?;
        Ok(offset)
    }

    /// Current file length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True when only the header has been written.
    pub fn is_empty(&self) -> bool {
        self.len <= HEADER_SIZE as u64
    }

    /// Cuts the file back to `len` bytes, dropping everything after it.
    ///
    /// Used to discard a torn tail found during replay. `len` must lie between
    /// the header and the current length.
    pub fn truncate(&mut self, len: u64) -> Result<(), JournalError> {
        if len < HEADER_SIZE as u64 || len > self.len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot truncate {} byte journal to {} bytes", self.len, len),
            )
            .into());
        }
        self.file.set_len(len)?;
        self.file.seek(SeekFrom::Start(len))?;
        self.file.sync_all()?;
        self.len = len;
        Ok(())
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), JournalError> {
        if self.poisoned {
            return Err(JournalError::Poisoned);
        }
        if let Err(err) = self.write_through(bytes) {
            if self.rollback().is_err() {
                self.poisoned = true;
            }
            return Err(err.into());
        }
        self.len += bytes.len() as u64;
        Ok(())
    }

    fn write_through(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)?;
        self.file.flush()?;
        if self.sync {
            self.file.sync_data()?;
        }
        Ok(())
    }

    // Drops any partial frame so the next append starts at a frame boundary.
    fn rollback(&mut self) -> io::Result<()> {
        self.file.set_len(self.len)?;
        self.file.seek(SeekFrom::Start(self.len))?;
        if self.sync {
            self.file.sync_data()?;
        }
        Ok(())
    }
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
    }
}
