use thiserror::Error;

/// Core error types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization of a fact failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] stockledger_canonical::CanonicalizationError),
    /// A stored record could not be decoded into a ledger event.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    /// Serialization of an event failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
