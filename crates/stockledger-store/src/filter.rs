//! Event filtering for selective listing.

use stockledger_canonical::{EventId, TenantId};
use stockledger_core::{EventType, LedgerEvent};

/// Predicate over stored events.
pub trait EventFilter {
    /// Returns true if the event matches the filter criteria.
    fn matches(&self, event: &LedgerEvent) -> bool;
}

/// Filter by owning tenant.
#[derive(Debug, Clone)]
pub struct TenantFilter {
    /// Tenant to match.
    pub tenant_id: TenantId,
}

impl EventFilter for TenantFilter {
    fn matches(&self, event: &LedgerEvent) -> bool {
        event.tenant_id == self.tenant_id
    }
}

/// Filter by movement kind.
#[derive(Debug, Clone)]
pub struct EventTypeFilter {
    /// Event type to match.
    pub event_type: EventType,
}

impl EventFilter for EventTypeFilter {
    fn matches(&self, event: &LedgerEvent) -> bool {
        event.fact.event_type == self.event_type
    }
}

/// Filter by item (`skuId`).
#[derive(Debug, Clone)]
pub struct ItemFilter {
    /// Item identifier to match.
    pub sku_id: String,
}

impl EventFilter for ItemFilter {
    fn matches(&self, event: &LedgerEvent) -> bool {
        event.fact.sku_id == self.sku_id
    }
}

/// Filter by event id (exact match).
#[derive(Debug, Clone)]
pub struct EventIdFilter {
    /// Event id to match.
    pub event_id: EventId,
}

impl EventFilter for EventIdFilter {
    fn matches(&self, event: &LedgerEvent) -> bool {
        event.event_id == self.event_id
    }
}

/// Composite filter: all filters must match (AND).
#[derive(Default)]
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn EventFilter>>,
}

impl AndFilter {
    /// Adds a filter to the conjunction.
    pub fn with<F: EventFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl EventFilter for AndFilter {
    fn matches(&self, event: &LedgerEvent) -> bool {
        self.filters.iter().all(|f| f.matches(event))
    }
}

/// Composite filter: any filter must match (OR).
pub struct OrFilter {
    /// Filters to combine with OR logic.
    pub filters: Vec<Box<dyn EventFilter>>,
}

impl EventFilter for OrFilter {
    fn matches(&self, event: &LedgerEvent) -> bool {
        self.filters.iter().any(|f| f.matches(event))
    }
}
