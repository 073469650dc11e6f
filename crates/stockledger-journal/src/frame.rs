//! On-disk layout.
//!
//! ```text
//! header (16 bytes):  magic "SLJ1" | version u16 LE | flags u16 LE | 8 reserved zero bytes
//! frame  (12 bytes):  kind u8 | 3 reserved zero bytes | len u32 LE | crc32(payload) u32 LE
//! payload (len bytes): UTF-8 JSON record
//! ```

use crate::errors::JournalError;

/// Journal file magic bytes.
pub const MAGIC: &[u8; 4] = b"SLJ1";

/// Current journal format version.
pub const VERSION: u16 = 0x0001;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 12;

/// Largest record payload accepted: 1 MiB.
pub const MAX_PAYLOAD_SIZE: u32 = 1024 * 1024;

const FRAME_KIND_LEDGER_RECORD: u8 = 0x01;

/// Journal file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
}

impl JournalHeader {
    /// Header for the current format version.
    pub fn current() -> Self {
        Self { version: VERSION }
    }

    /// Serializes the header to bytes.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Parses and validates a header.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Result<Self, JournalError> {
        if &bytes[0..4] != MAGIC {
            return Err(JournalError::InvalidHeader(format!(
                "invalid magic: {:?}",
                &bytes[0..4]
            )));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version: 0x{:04x}, expected 0x{:04x}",
                version, VERSION
            )));
        }
        if bytes[6..].iter().any(|b| *b != 0) {
            return Err(JournalError::InvalidHeader(
                "non-zero flags or reserved bytes".to_string(),
            ));
        }
        Ok(Self { version })
    }
}

/// Record frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 JSON ledger record.
    LedgerRecord,
    /// Kind written by a newer format revision; readers skip it.
    Unknown(u8),
}

impl From<u8> for FrameKind {
    fn from(byte: u8) -> Self {
        match byte {
            FRAME_KIND_LEDGER_RECORD => FrameKind::LedgerRecord,
            other => FrameKind::Unknown(other),
        }
    }
}

impl From<FrameKind> for u8 {
    fn from(kind: FrameKind) -> Self {
        match kind {
            FrameKind::LedgerRecord => FRAME_KIND_LEDGER_RECORD,
            FrameKind::Unknown(b) => b,
        }
    }
}

/// Record frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFrame {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
    /// CRC-32 of the payload.
    pub checksum: u32,
}

impl RecordFrame {
    /// Builds the frame header for `payload`.
    pub fn for_payload(kind: FrameKind, payload: &[u8]) -> Result<Self, JournalError> {
        let len = u32::try_from(payload.len())
            .ok()
            .filter(|len| *len <= MAX_PAYLOAD_SIZE)
            .ok_or(JournalError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            })?;
        Ok(Self {
            kind,
            len,
            checksum: crc32fast::hash(payload),
        })
    }

    /// Serializes the frame header.
    pub fn encode(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0] = self.kind.into();
        bytes[4..8].copy_from_slice(&self.len.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes
    }

    /// Parses a frame header found at `offset`.
    pub fn decode(bytes: &[u8; FRAME_HEADER_SIZE], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0u8; 3] {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "non-zero reserved bytes".to_string(),
            });
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("payload size {} exceeds maximum {}", len, MAX_PAYLOAD_SIZE),
            });
        }
        Ok(Self {
            kind: FrameKind::from(bytes[0]),
            len,
            checksum: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }

    /// Fails if `payload` does not match this frame's checksum.
    pub fn verify(&self, payload: &[u8], offset: u64) -> Result<(), JournalError> {
        let found = crc32fast::hash(payload);
        if found != self.checksum {
            return Err(JournalError::ChecksumMismatch {
                offset,
                expected: self.checksum,
                found,
            });
        }
        Ok(())
    }
}
