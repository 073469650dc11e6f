//! Error types for store operations.

use stockledger_canonical::{IdempotencyKey, TenantId};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] stockledger_journal::JournalError),
    /// `(tenant, idempotencyKey)` already has an event.
    #[error("duplicate idempotency key {key} for tenant {tenant}")]
    DuplicateIdempotencyKey {
        /// Owning tenant.
        tenant: TenantId,
        /// Key that was reused.
        key: IdempotencyKey,
    },
    /// `(tenant, sequence)` already has an event.
    #[error("sequence {sequence} already taken for tenant {tenant}")]
    SequenceConflict {
        /// Owning tenant.
        tenant: TenantId,
        /// Sequence that was reused.
        sequence: u64,
    },
    /// Sequence skips ahead of `max + 1`.
    #[error("sequence gap for tenant {tenant}: expected {expected}, got {found}")]
    SequenceGap {
        /// Owning tenant.
        tenant: TenantId,
        /// The only sequence the tenant can accept next.
        expected: u64,
        /// Sequence on the rejected event.
        found: u64,
    },
    /// A stored record could not be encoded or decoded.
    #[error("record error: {0}")]
    Record(#[from] serde_json::Error),
    /// The journal is already open in another store or process.
    #[error("journal {} is already open by another writer", .0.display())]
    Locked(std::path::PathBuf),
    /// A lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}
