//! Diagnostic lookups over a store.

use crate::error::StoreError;
use crate::filter::{AndFilter, EventIdFilter, TenantFilter};
use crate::traits::LedgerStore;
use stockledger_canonical::{EventId, TenantId};
use stockledger_core::LedgerEvent;

/// Finds an event by its `le_` id within a tenant.
///
/// Event ids are 32-bit fingerprints, not unique keys; when several events of
/// one tenant share an id the earliest is returned. Requires a full scan.
pub fn find_by_event_id<S: LedgerStore + ?Sized>(
    store: &S,
    tenant: &TenantId,
    event_id: &EventId,
) -> Result<Option<LedgerEvent>, StoreError> {
    let filter = AndFilter::default()
        .with(TenantFilter {
            tenant_id: tenant.clone(),
        })
        .with(EventIdFilter {
            event_id: event_id.clone(),
        });
    Ok(store.list_filtered(&filter)?.into_iter().next())
}

/// Events of one tenant, in sequence order.
pub fn tenant_history<S: LedgerStore + ?Sized>(
    store: &S,
    tenant: &TenantId,
) -> Result<Vec<LedgerEvent>, StoreError> {
    let mut events = store.list_filtered(&TenantFilter {
        tenant_id: tenant.clone(),
    })?;
    events.sort_by_key(|e| e.sequence);
    Ok(events)
}
