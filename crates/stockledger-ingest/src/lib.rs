//! Idempotent append orchestrator for the stockledger inventory ledger.
//!
//! [`LedgerIngestor::submit`] takes an already-resolved [`RequestContext`]
//! and a raw JSON body, and returns an HTTP-shaped [`IngestResponse`]:
//!
//! | status | meaning |
//! |--------|---------|
//! | 201 | new event appended |
//! | 200 | `IDEMPOTENT_REPLAY` of an accepted write |
//! | 400 | schema or business rejection |
//! | 403 | `TENANT_UNRESOLVED` |
//! | 409 | `IDEMPOTENCY_KEY_REUSE_MISMATCH` |
//! | 500 | `LEDGER_STORE_APPEND_FAILED` |
//!
//! Every outcome is mirrored to an [`AuditSink`].

#![deny(missing_docs)]

/// Audit records and sinks.
pub mod audit;
/// Clock abstraction for `createdAtUtc`.
pub mod clock;
/// Environment configuration.
pub mod config;
/// Request context.
pub mod context;
/// Per-tenant writer locks.
pub mod locks;
/// The append state machine.
pub mod orchestrator;
/// Response envelope.
pub mod response;

pub use audit::{AuditEventType, AuditRecord, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, IngestConfig};
pub use context::RequestContext;
pub use orchestrator::LedgerIngestor;
pub use response::IngestResponse;
