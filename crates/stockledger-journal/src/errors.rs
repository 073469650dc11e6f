use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid file header (magic, version, or flags).
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure (reserved bytes or length).
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds maximum size limit.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: u32,
    },
    /// Payload bytes do not match the frame checksum.
    #[error("checksum mismatch at offset {offset}: expected {expected:08x}, found {found:08x}")]
    ChecksumMismatch {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Checksum recorded in the frame header.
        expected: u32,
        /// Checksum of the payload as read.
        found: u32,
    },
    /// Record payload is not valid JSON for the requested type.
    #[error("record decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// Another writer holds the journal's exclusive lock.
    #[error("journal {} is locked by another writer", .0.display())]
    Locked(std::path::PathBuf),
    /// An earlier failed append could not be rolled back; the writer refuses
    /// further appends.
    #[error("journal writer poisoned by an unrecoverable write failure")]
    Poisoned,
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where truncation occurred.
        offset: u64,
    },
}
