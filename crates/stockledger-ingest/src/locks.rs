use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stockledger_canonical::TenantId;

/// One writer mutex per tenant, created on first use.
///
/// Writes for different tenants never contend; writes for one tenant run
/// lookup, sequencing and append one at a time.
#[derive(Debug, Default)]
pub struct TenantLocks {
    locks: Mutex<HashMap<TenantId, Arc<Mutex<()>>>>,
}

impl TenantLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `tenant`.
    pub fn handle(&self, tenant: &TenantId) -> Arc<Mutex<()>> {
        // The table only ever gains entries, so a poisoned guard is still consistent.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(tenant.clone()).or_default())
    }
}

/// Acquires a tenant mutex, ignoring poison left by a panicking writer.
pub fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}
