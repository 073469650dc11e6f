//! Offline verification of stored ledger events.
//!
//! Recomputes what the write path derived (canonical hash, event id) and
//! checks that each tenant's sequence is dense from 1.

use serde::Serialize;
use std::collections::HashMap;
use stockledger_canonical::{Canonicalizer, TenantId};

use crate::errors::CoreError;
use crate::events::LedgerEvent;
use crate::identity::{canonical_hash, compute_event_id, identity_basis};

/// Outcome of verifying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventVerdict {
    /// Hash and identity both recompute.
    Ok,
    /// Stored `canonicalHash` differs from the recomputed one.
    HashMismatch,
    /// Stored `event_id` differs from the recomputed one.
    EventIdMismatch,
}

/// A break in a tenant's sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceViolation {
    /// Tenant whose sequence is broken.
    pub tenant_id: TenantId,
    /// Sequence that was expected next.
    pub expected: u64,
    /// Sequence actually found.
    pub found: u64,
}

/// Recomputes hash and identity for a stored event.
pub fn verify_event(
    event: &LedgerEvent,
    canonicalizer: &Canonicalizer,
) -> Result<EventVerdict, CoreError> {
    if canonical_hash(&event.fact, canonicalizer)? != event.canonical_hash {
        return Ok(EventVerdict::HashMismatch);
    }
    let basis = identity_basis(&event.fact, &event.correlation_id);
    if compute_event_id(&event.tenant_id, &basis, &event.fact) != event.event_id {
        return Ok(EventVerdict::EventIdMismatch);
    }
    Ok(EventVerdict::Ok)
}

/// Checks that, in log order, every tenant's sequence runs 1, 2, 3, ...
pub fn check_sequence_density<'a, I>(events: I) -> Vec<SequenceViolation>
where
    I: IntoIterator<Item = &'a LedgerEvent>,
{
    let mut last: HashMap<&TenantId, u64> = HashMap::new();
    let mut violations = Vec::new();
    for event in events {
        let expected = last.get(&event.tenant_id).copied().unwrap_or(0) + 1;
        if event.sequence != expected {
            violations.push(SequenceViolation {
                tenant_id: event.tenant_id.clone(),
                expected,
                found: event.sequence,
            });
        }
        last.insert(&event.tenant_id, event.sequence.max(expected - 1));
    }
    violations
}
