//! Ledger event model, validation, identity and verification for stockledger.
//!
//! This crate provides:
//! - The persisted [`LedgerEvent`] and the validated [`LedgerFact`] it carries
//! - Closed-field schema validation of write bodies and persisted records
//! - Per-event-type business rules
//! - Deterministic `le_` event identity and per-tenant sequence derivation
//! - Offline verification of stored events
//!
//! Core invariants:
//! - Validation is total and fail-closed: every input yields a fact or a [`Rejection`]
//! - Identity is a pure function of tenant, basis and fact fields
//! - Nothing here performs I/O
//!
#![deny(missing_docs)]

/// Error types for core operations.
pub mod errors;
/// Event model types.
pub mod events;
/// Event identity, canonical hashing and sequencing.
pub mod identity;
/// Rejection taxonomy.
pub mod rejection;
/// Business rule validator.
pub mod rules;
/// Schema validator.
pub mod schema;
/// Offline verification of stored events.
pub mod verification;

pub use errors::CoreError;
pub use events::{
    EventType, ExternalContextRef, LedgerEvent, LedgerEventInput, LedgerFact, Location,
    ReasonCode,
};
pub use identity::{canonical_hash, compute_event_id, identity_basis, next_sequence};
pub use rejection::{Rejection, RejectionCode, RejectionKind};
pub use rules::validate_business;
pub use schema::{validate_input, validate_record, SchemaLimits};
pub use verification::{check_sequence_density, verify_event, EventVerdict, SequenceViolation};

/// Runs schema then business validation.
pub fn validate(
    body: &serde_json::Value,
    limits: &SchemaLimits,
) -> Result<LedgerFact, Rejection> {
    let input = validate_input(body, limits)?;
    validate_business(&input)
}
