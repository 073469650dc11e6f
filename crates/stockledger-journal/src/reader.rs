//! Journal reader.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, FRAME_HEADER_SIZE, HEADER_SIZE};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// How the reader treats a torn tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Truncated frames are errors.
    Strict,
    /// A truncated final frame is treated as end-of-file.
    Permissive,
}

/// Sequential reader for `SLJ1` journals.
///
/// Checksum mismatches are errors in both modes; only a frame cut short by
/// end-of-file is forgiven in [`ReadMode::Permissive`].
pub struct JournalReader {
    inner: BufReader<File>,
    mode: ReadMode,
    position: u64,
}

impl JournalReader {
    /// Opens a journal and validates its header.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut inner = BufReader::new(File::open(path)?);
        let mut header = [0u8; HEADER_SIZE];
        inner.read_exact(&mut header).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                JournalError::InvalidHeader("file shorter than header".to_string())
            } else {
                e.into()
            }
        })?;
        JournalHeader::decode(&header)?;
        Ok(Self {
            inner,
            mode,
            position: HEADER_SIZE as u64,
        })
    }

    /// Byte offset of the next frame.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next frame, verifying its checksum.
    ///
    /// Returns `Ok(None)` at end-of-file (or at a torn tail in permissive mode).
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let offset = self.position;
        let mut header = [0u8; FRAME_HEADER_SIZE];
        match fill(&mut self.inner, &mut header)? {
            0 => return Ok(None),
            n if n < FRAME_HEADER_SIZE => return self.truncated(offset),
            _ => {}
        }
        let frame = RecordFrame::decode(&header, offset)?;

        let mut payload = vec![0u8; frame.len as usize];
        if fill(&mut self.inner, &mut payload)? < payload.len() {
            return self.truncated(offset);
        }
        frame.verify(&payload, offset)?;

        self.position += (FRAME_HEADER_SIZE + payload.len()) as u64;
        Ok(Some((frame.kind, payload)))
    }

    /// Reads and decodes the next ledger record, skipping unknown frame kinds.
    pub fn read_record<T: DeserializeOwned>(&mut self) -> Result<Option<T>, JournalError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::LedgerRecord, payload)) => {
                    return Ok(Some(serde_json::from_slice(&payload)?));
                }
                Some((FrameKind::Unknown(_), _)) => continue,
            }
        }
    }

    /// Reads every remaining record.
    pub fn read_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>, JournalError> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }

    fn truncated<T>(&self, offset: u64) -> Result<Option<T>, JournalError> {
        match self.mode {
            ReadMode::Permissive => Ok(None),
            ReadMode::Strict => Err(JournalError::TruncatedFrame { offset }),
        }
    }
}

/// Reads until `buf` is full or EOF; returns the number of bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, JournalError> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(read)
}
