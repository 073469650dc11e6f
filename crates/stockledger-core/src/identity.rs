//! Event identity and per-tenant sequencing.
//!
//! `event_id` is a pure function of the tenant, a uniqueness basis and the
//! fact fields; wall-clock time never participates. The uniqueness basis is
//! `referenceType:referenceId` when the caller supplied both, otherwise the
//! request id.

use stockledger_canonical::{
    fingerprint_hex, CanonicalHash, Canonicalizer, EventId, RequestId, TenantId,
};

use crate::errors::CoreError;
use crate::events::{ExternalContextRef, LedgerFact};

/// Basis that makes an event id unique within a tenant.
pub fn identity_basis(fact: &LedgerFact, request_id: &RequestId) -> String {
    match (fact.reference_type.as_deref(), fact.reference_id.as_deref()) {
        (Some(kind), Some(id)) => format!("{}:{}", kind, id),
        _ => request_id.as_str().to_string(),
    }
}

/// Computes the deterministic `le_<8 hex>` identifier for a fact.
pub fn compute_event_id(tenant: &TenantId, basis: &str, fact: &LedgerFact) -> EventId {
    EventId::new(format!("le_{}", fingerprint_hex(&fingerprint_material(tenant, basis, fact))))
}

/// The string hashed into an event id.
///
/// Every field is length-prefixed (`<bytes>:<text>`, `~` when absent), so
/// caller text can never shift content from one field into another. External
/// references are projected into a sorted list so the identity does not
/// depend on the order the caller listed them in.
pub fn fingerprint_material(tenant: &TenantId, basis: &str, fact: &LedgerFact) -> String {
    let mut out = String::from("v2");
    push(&mut out, Some(tenant.as_str()));
    push(&mut out, Some(basis));
    push(&mut out, Some(fact.event_type.as_str()));
    push(&mut out, Some(fact.sku_id.as_str()));
    push(&mut out, Some(fact.hub_id.as_str()));
    push(&mut out, fact.bin_id.as_deref());
    push(&mut out, Some(fact.quantity.to_string().as_str()));
    push(&mut out, fact.reason_code.map(|r| r.as_str()));
    for field in [
        &fact.note,
        &fact.from_hub_id,
        &fact.from_bin_id,
        &fact.to_hub_id,
        &fact.to_bin_id,
        &fact.parent_event_id,
        &fact.causal_chain_id,
        &fact.authorization_ref,
        &fact.decision_ref,
    ] {
        push(&mut out, field.as_deref());
    }
    push(&mut out, Some(project_refs(&fact.external_context_refs).as_str()));
    out
}

fn push(out: &mut String, field: Option<&str>) {
    match field {
        Some(text) => {
            out.push_str(&format!("|{}:", text.len()));
            out.push_str(text);
        }
        None => out.push_str("|~"),
    }
}

fn project_refs(refs: &[ExternalContextRef]) -> String {
    let mut projected: Vec<String> = refs
        .iter()
        .map(|r| {
            let mut one = String::new();
            push(&mut one, r.id.as_deref());
            push(&mut one, r.uri.as_deref());
            push(&mut one, r.hash.as_deref());
            one
        })
        .collect();
    projected.sort();
    let mut out = String::new();
    for one in &projected {
        push(&mut out, Some(one.as_str()));
    }
    out
}

/// SHA-256 over the canonical JSON of a fact: the idempotency-equality basis.
pub fn canonical_hash(
    fact: &LedgerFact,
    canonicalizer: &Canonicalizer,
) -> Result<CanonicalHash, CoreError> {
    Ok(canonicalizer.hash_serializable(fact)?)
}

/// Next sequence for a tenant: one past the highest stored, or 1.
pub fn next_sequence<I>(existing: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    existing.into_iter().max().map_or(1, |max| max + 1)
}
