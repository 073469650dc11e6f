//! In-memory index shared by every backend.

use crate::error::StoreError;
use std::collections::HashMap;
use stockledger_canonical::{IdempotencyKey, TenantId};
use stockledger_core::LedgerEvent;

/// Ordered events plus the lookups that enforce the uniqueness constraints.
#[derive(Debug, Default)]
pub(crate) struct LedgerIndex {
    events: Vec<LedgerEvent>,
    by_key: HashMap<(TenantId, IdempotencyKey), usize>,
    max_sequence: HashMap<TenantId, u64>,
}

impl LedgerIndex {
    /// Fails unless `event` can be appended without breaking uniqueness or density.
    pub(crate) fn check(&self, event: &LedgerEvent) -> Result<(), StoreError> {
        let tenant = &event.tenant_id;
        let key = (tenant.clone(), event.idempotency_key().clone());
        if self.by_key.contains_key(&key) {
            return Err(StoreError::DuplicateIdempotencyKey {
                tenant: key.0,
                key: key.1,
            });
        }
        let expected = self.max_sequence(tenant) + 1;
        if event.sequence < expected {
            return Err(StoreError::SequenceConflict {
                tenant: tenant.clone(),
                sequence: event.sequence,
            });
        }
        if event.sequence > expected {
            return Err(StoreError::SequenceGap {
                tenant: tenant.clone(),
                expected,
                found: event.sequence,
            });
        }
        Ok(())
    }

    /// Records an event that already passed [`LedgerIndex::check`].
    pub(crate) fn insert(&mut self, event: LedgerEvent) {
        let position = self.events.len();
        self.by_key.insert(
            (event.tenant_id.clone(), event.idempotency_key().clone()),
            position,
        );
        self.max_sequence
            .insert(event.tenant_id.clone(), event.sequence);
        self.events.push(event);
    }

    pub(crate) fn lookup(&self, tenant: &TenantId, key: &IdempotencyKey) -> Option<&LedgerEvent> {
        self.by_key
            .get(&(tenant.clone(), key.clone()))
            .map(|&i| &self.events[i])
    }

    pub(crate) fn max_sequence(&self, tenant: &TenantId) -> u64 {
        self.max_sequence.get(tenant).copied().unwrap_or(0)
    }

    pub(crate) fn events(&self) -> &[LedgerEvent] {
        &self.events
    }
}
