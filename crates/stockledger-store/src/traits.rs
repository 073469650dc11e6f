//! Storage backend trait.

use crate::error::StoreError;
use crate::filter::EventFilter;
use stockledger_canonical::{IdempotencyKey, TenantId};
use stockledger_core::LedgerEvent;

/// Append-only ledger storage.
///
/// `append` is the only mutator. Implementations enforce, atomically under
/// their own lock, that `(tenant, idempotencyKey)` is unique and that each
/// tenant's sequences are exactly `1..=N`. Stored events are never edited or
/// removed.
pub trait LedgerStore: Send + Sync {
    /// Appends `event`, returning it as stored.
    fn append(&self, event: LedgerEvent) -> Result<LedgerEvent, StoreError>;

    /// Event previously accepted for `(tenant, key)`, if any.
    fn lookup_by_idempotency_key(
        &self,
        tenant: &TenantId,
        key: &IdempotencyKey,
    ) -> Result<Option<LedgerEvent>, StoreError>;

    /// Every event in append order.
    fn list_all(&self) -> Result<Vec<LedgerEvent>, StoreError>;

    /// Highest sequence stored for `tenant`, or 0.
    fn max_sequence(&self, tenant: &TenantId) -> Result<u64, StoreError> {
        Ok(self
            .list_all()?
            .iter()
            .filter(|e| &e.tenant_id == tenant)
            .map(|e| e.sequence)
            .max()
            .unwrap_or(0))
    }

    /// Events matching `filter`, in append order.
    fn list_filtered(&self, filter: &dyn EventFilter) -> Result<Vec<LedgerEvent>, StoreError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect())
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for std::sync::Arc<S> {
    fn append(&self, event: LedgerEvent) -> Result<LedgerEvent, StoreError> {
        (**self).append(event)
    }

    fn lookup_by_idempotency_key(
        &self,
        tenant: &TenantId,
        key: &IdempotencyKey,
    ) -> Result<Option<LedgerEvent>, StoreError> {
        (**self).lookup_by_idempotency_key(tenant, key)
    }

    fn list_all(&self) -> Result<Vec<LedgerEvent>, StoreError> {
        (**self).list_all()
    }

    fn max_sequence(&self, tenant: &TenantId) -> Result<u64, StoreError> {
        (**self).max_sequence(tenant)
    }
}
