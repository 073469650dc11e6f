//! Canonical hashing and identifier primitives for the stockledger inventory ledger.
//!
//! Every value that participates in idempotency comparison or event identity
//! flows through this crate:
//! - [`Canonicalizer`] produces RFC 8785 bytes (object keys sorted recursively,
//!   array order preserved) and the SHA-256 [`CanonicalHash`] over them
//! - [`fnv1a32`] is the fast, non-cryptographic fingerprint behind `le_` event ids
//! - identifier newtypes scope tenants, actors, requests and idempotency keys
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// SHA-256 canonical hash newtype.
pub mod digest;
/// 32-bit FNV-1a fingerprints.
pub mod fingerprint;
/// Core identifiers and newtypes.
pub mod identifiers;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer, LEDGER_PROFILE_ID};
pub use digest::CanonicalHash;
pub use fingerprint::{fnv1a32, fingerprint_hex};
pub use identifiers::{
    ActorId, EventId, IdempotencyKey, ProfileId, RequestId, TenantId, Timestamp,
};
pub use validation::ValidationError;
