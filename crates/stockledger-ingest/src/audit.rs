//! Audit side channel.
//!
//! Emission is fire-and-forget: sinks have no failure path visible to the
//! orchestrator.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Mutex;
use stockledger_canonical::{ActorId, RequestId, TenantId};
use tracing::info;

/// Category stamped on every ledger audit record.
pub const AUDIT_CATEGORY: &str = "inventory_ledger";

/// Terminal outcome being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditEventType {
    /// New event appended.
    #[serde(rename = "ledger.event.accepted")]
    Accepted,
    /// Retry resolved to the original event.
    #[serde(rename = "ledger.event.replayed")]
    Replayed,
    /// Schema or business validation failed.
    #[serde(rename = "ledger.event.rejected")]
    Rejected,
    /// Idempotency key reused with a different payload.
    #[serde(rename = "ledger.event.conflict")]
    Conflict,
    /// The store could not persist the event.
    #[serde(rename = "ledger.event.store_failure")]
    StoreFailure,
    /// No tenant in the request context.
    #[serde(rename = "ledger.event.tenant_unresolved")]
    TenantUnresolved,
}

impl AuditEventType {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            AuditEventType::Accepted => "ledger.event.accepted",
            AuditEventType::Replayed => "ledger.event.replayed",
            AuditEventType::Rejected => "ledger.event.rejected",
            AuditEventType::Conflict => "ledger.event.conflict",
            AuditEventType::StoreFailure => "ledger.event.store_failure",
            AuditEventType::TenantUnresolved => "ledger.event.tenant_unresolved",
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Always [`AUDIT_CATEGORY`].
    pub category: &'static str,
    /// Outcome.
    pub event_type: AuditEventType,
    /// Request correlation id.
    pub request_id: RequestId,
    /// Tenant, when resolved.
    pub tenant_id: Option<TenantId>,
    /// Submitting actor.
    pub user_id: Option<ActorId>,
    /// Codes, keys and partial payload facts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Receiver of audit records.
pub trait AuditSink: Send + Sync {
    /// Records one outcome. Must not fail or block for long.
    fn emit_audit(&self, record: AuditRecord);
}

/// Writes audit records as `tracing` events on the `stockledger::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit_audit(&self, record: AuditRecord) {
        let details = record
            .details
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default();
        info!(
            target: "stockledger::audit",
            category = record.category,
            event_type = %record.event_type,
            request_id = %record.request_id,
            tenant_id = record.tenant_id.as_ref().map(|t| t.as_str()),
            user_id = record.user_id.as_ref().map(|u| u.as_str()),
            details = %details,
            error = record.error.as_deref(),
            "audit"
        );
    }
}

/// Keeps records in memory; used by tests and embedders that ship them elsewhere.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for MemoryAuditSink {
    fn emit_audit(&self, record: AuditRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

impl<T: AuditSink + ?Sized> AuditSink for std::sync::Arc<T> {
    fn emit_audit(&self, record: AuditRecord) {
        (**self).emit_audit(record)
    }
}
