//! In-process store.

use crate::error::StoreError;
use crate::index::LedgerIndex;
use crate::traits::LedgerStore;
use std::sync::RwLock;
use stockledger_canonical::{IdempotencyKey, TenantId};
use stockledger_core::LedgerEvent;
use tracing::debug;

/// Volatile [`LedgerStore`] backed by a `RwLock`ed index.
#[derive(Debug, Default)]
pub struct MemoryStore {
    index: RwLock<LedgerIndex>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn append(&self, event: LedgerEvent) -> Result<LedgerEvent, StoreError> {
        let mut index = self.index.write().map_err(|_| StoreError::Poisoned)?;
        index.check(&event)?;
        debug!(
            tenant_id = %event.tenant_id,
            sequence = event.sequence,
            event_id = %event.event_id,
            "memory store append"
        );
        index.insert(event.clone());
        Ok(event)
    }

    fn lookup_by_idempotency_key(
        &self,
        tenant: &TenantId,
        key: &IdempotencyKey,
    ) -> Result<Option<LedgerEvent>, StoreError> {
        let index = self.index.read().map_err(|_| StoreError::Poisoned)?;
        Ok(index.lookup(tenant, key).cloned())
    }

    fn list_all(&self) -> Result<Vec<LedgerEvent>, StoreError> {
        let index = self.index.read().map_err(|_| StoreError::Poisoned)?;
        Ok(index.events().to_vec())
    }

    fn max_sequence(&self, tenant: &TenantId) -> Result<u64, StoreError> {
        let index = self.index.read().map_err(|_| StoreError::Poisoned)?;
        Ok(index.max_sequence(tenant))
    }
}
