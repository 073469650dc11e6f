//! The idempotent append state machine.

use serde_json::{json, Map, Value};
use std::sync::Arc;
use stockledger_canonical::{Canonicalizer, TenantId};
use stockledger_core::{
    canonical_hash, compute_event_id, identity_basis, next_sequence, validate, validate_record,
    LedgerEvent, LedgerFact, Rejection, SchemaLimits,
};
use stockledger_store::LedgerStore;
use tracing::{debug, error, info, warn};

use crate::audit::{AuditEventType, AuditRecord, AuditSink, TracingAuditSink, AUDIT_CATEGORY};
use crate::clock::{Clock, SystemClock};
use crate::context::RequestContext;
use crate::locks::{acquire, TenantLocks};
use crate::response::IngestResponse;

/// Raw body keys copied into rejection audits.
const AUDITED_BODY_FIELDS: &[&str] = &[
    "idempotencyKey",
    "eventType",
    "skuId",
    "itemId",
    "hubId",
    "binId",
    "quantity",
    "qtyDelta",
    "reasonCode",
];

/// Validates, deduplicates, sequences and appends ledger writes.
///
/// Lookup, sequencing and append for one tenant run under that tenant's
/// mutex, so concurrent writers see a consistent `max(sequence)` and a key
/// can be accepted at most once. Every terminal outcome is audited.
pub struct LedgerIngestor<S> {
    store: S,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    canonicalizer: Canonicalizer,
    limits: SchemaLimits,
    locks: TenantLocks,
}

impl<S: LedgerStore> LedgerIngestor<S> {
    /// Ingestor over `store` with tracing audits, the wall clock and default limits.
    pub fn new(store: S) -> Self {
        Self {
            store,
            audit: Arc::new(TracingAuditSink),
            clock: Arc::new(SystemClock),
            canonicalizer: Canonicalizer::ledger(),
            limits: SchemaLimits::default(),
            locks: TenantLocks::new(),
        }
    }

    /// Replaces the audit sink.
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the schema limits.
    pub fn with_limits(mut self, limits: SchemaLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one write through the pipeline.
    ///
    /// Never panics and always returns exactly one terminal response.
    pub fn submit(&self, ctx: &RequestContext, body: &Value) -> IngestResponse {
        let request_id = &ctx.request_id;

        let tenant = match &ctx.tenant_id {
            Some(tenant) => tenant,
            None => {
                warn!(request_id = %request_id, "ledger write without tenant");
                self.emit(ctx, AuditEventType::TenantUnresolved, None, None);
                return IngestResponse::tenant_unresolved(request_id);
            }
        };

        let fact = match validate(body, &self.limits) {
            Ok(fact) => fact,
            Err(rejection) => return self.reject(ctx, tenant, body, &rejection),
        };

        let hash = match canonical_hash(&fact, &self.canonicalizer) {
            Ok(hash) => hash,
            Err(err) => return self.store_failure(ctx, tenant, &fact, err.to_string()),
        };

        let lock = self.locks.handle(tenant);
        let _guard = acquire(&lock);

        match self
            .store
            .lookup_by_idempotency_key(tenant, &fact.idempotency_key)
        {
            Ok(Some(existing)) if existing.canonical_hash == hash => {
                debug!(
                    tenant_id = %tenant,
                    request_id = %request_id,
                    idempotency_key = %fact.idempotency_key,
                    sequence = existing.sequence,
                    "idempotent replay"
                );
                self.emit(
                    ctx,
                    AuditEventType::Replayed,
                    Some(json!({
                        "idempotencyKey": fact.idempotency_key,
                        "eventId": existing.event_id,
                        "sequence": existing.sequence,
                    })),
                    None,
                );
                return IngestResponse::replayed(&existing, request_id);
            }
            Ok(Some(existing)) => {
                warn!(
                    tenant_id = %tenant,
                    request_id = %request_id,
                    idempotency_key = %fact.idempotency_key,
                    existing_event_id = %existing.event_id,
                    "idempotency key reused with a different payload"
                );
                self.emit(
                    ctx,
                    AuditEventType::Conflict,
                    Some(json!({
                        "code": crate::response::IDEMPOTENCY_KEY_REUSE_MISMATCH,
                        "idempotencyKey": fact.idempotency_key,
                        "existingEventId": existing.event_id,
                        "existingHash": existing.canonical_hash,
                        "submittedHash": hash,
                    })),
                    None,
                );
                return IngestResponse::conflict(
                    &fact.idempotency_key,
                    &existing.event_id,
                    request_id,
                );
            }
            Ok(None) => {}
            Err(err) => return self.store_failure(ctx, tenant, &fact, err.to_string()),
        }

        let sequence = match self.store.max_sequence(tenant) {
            Ok(max) => next_sequence([max]),
            Err(err) => return self.store_failure(ctx, tenant, &fact, err.to_string()),
        };
        let event_id = compute_event_id(tenant, &identity_basis(&fact, request_id), &fact);
        let event = LedgerEvent {
            event_id,
            sequence,
            tenant_id: tenant.clone(),
            actor_user_id: ctx.actor_user_id.clone(),
            correlation_id: request_id.clone(),
            created_at_utc: self.clock.timestamp(),
            canonical_hash: hash,
            fact,
        };

        match serde_json::to_value(&event) {
            Ok(record) => {
                if let Err(rejection) = validate_record(&record) {
                    return self.reject(ctx, tenant, body, &rejection);
                }
            }
            Err(err) => return self.store_failure(ctx, tenant, &event.fact, err.to_string()),
        }

        match self.store.append(event.clone()) {
            Ok(stored) => {
                info!(
                    tenant_id = %tenant,
                    request_id = %request_id,
                    idempotency_key = %stored.fact.idempotency_key,
                    sequence = stored.sequence,
                    event_id = %stored.event_id,
                    event_type = %stored.fact.event_type,
                    "ledger event accepted"
                );
                self.emit(
                    ctx,
                    AuditEventType::Accepted,
                    Some(json!({
                        "idempotencyKey": stored.fact.idempotency_key,
                        "eventId": stored.event_id,
                        "sequence": stored.sequence,
                        "eventType": stored.fact.event_type,
                        "skuId": stored.fact.sku_id,
                        "quantity": stored.fact.quantity,
                    })),
                    None,
                );
                IngestResponse::created(&stored, request_id)
            }
            Err(err) => self.store_failure(ctx, tenant, &event.fact, err.to_string()),
        }
    }

    fn reject(
        &self,
        ctx: &RequestContext,
        tenant: &TenantId,
        body: &Value,
        rejection: &Rejection,
    ) -> IngestResponse {
        warn!(
            tenant_id = %tenant,
            request_id = %ctx.request_id,
            error = rejection.kind().as_str(),
            code = %rejection.code,
            "ledger write rejected"
        );
        self.emit(
            ctx,
            AuditEventType::Rejected,
            Some(json!({
                "code": rejection.code,
                "details": rejection.details,
                "payload": payload_facts(body),
            })),
            Some(rejection.kind().as_str().to_string()),
        );
        IngestResponse::rejected(rejection, &ctx.request_id)
    }

    fn store_failure(
        &self,
        ctx: &RequestContext,
        tenant: &TenantId,
        fact: &LedgerFact,
        cause: String,
    ) -> IngestResponse {
        error!(
            tenant_id = %tenant,
            request_id = %ctx.request_id,
            idempotency_key = %fact.idempotency_key,
            error = %cause,
            "ledger append failed"
        );
        self.emit(
            ctx,
            AuditEventType::StoreFailure,
            Some(json!({
                "code": crate::response::LEDGER_STORE_APPEND_FAILED,
                "idempotencyKey": fact.idempotency_key,
                "eventType": fact.event_type,
                "skuId": fact.sku_id,
            })),
            Some(cause),
        );
        IngestResponse::store_failure(&ctx.request_id)
    }

    fn emit(
        &self,
        ctx: &RequestContext,
        event_type: AuditEventType,
        details: Option<Value>,
        error: Option<String>,
    ) {
        self.audit.emit_audit(AuditRecord {
            category: AUDIT_CATEGORY,
            event_type,
            request_id: ctx.request_id.clone(),
            tenant_id: ctx.tenant_id.clone(),
            user_id: ctx.actor_user_id.clone(),
            details,
            error,
        });
    }
}

/// Scalar facts from a raw body, for rejection audits.
fn payload_facts(body: &Value) -> Value {
    let mut facts = Map::new();
    if let Some(obj) = body.as_object() {
        for field in AUDITED_BODY_FIELDS {
            if let Some(value) = obj.get(*field).filter(|v| !v.is_object() && !v.is_array()) {
                facts.insert((*field).to_string(), value.clone());
            }
        }
    }
    Value::Object(facts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_facts_keeps_scalars_only() {
        let facts = payload_facts(&json!({
            "idempotencyKey": "k1",
            "quantity": 3,
            "skuId": {"nested": true},
            "note": "not audited"
        }));
        assert_eq!(facts, json!({"idempotencyKey": "k1", "quantity": 3}));
        assert_eq!(payload_facts(&json!([1, 2])), json!({}));
    }
}
