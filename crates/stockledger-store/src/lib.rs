//! Append-only storage backends for stockledger events.
//!
//! This crate provides:
//! - The [`LedgerStore`] trait: `append` is the only mutator
//! - [`MemoryStore`], a volatile backend for tests and embedding
//! - [`JournalStore`], a durable backend over `stockledger-journal`
//! - Event filters and diagnostic views
//!
//! Every backend enforces, atomically under its own lock, that
//! `(tenant, idempotencyKey)` is unique and that each tenant's sequences are
//! dense from 1.

#![deny(missing_docs)]

/// Error types for store operations.
pub mod error;
/// Event filtering API.
pub mod filter;
mod index;
/// Journal-backed storage implementation.
pub mod journal;
/// In-memory storage implementation.
pub mod memory;
/// Storage backend trait.
pub mod traits;
/// Diagnostic lookups.
pub mod view;

pub use error::StoreError;
pub use filter::{
    AndFilter, EventFilter, EventIdFilter, EventTypeFilter, ItemFilter, OrFilter, TenantFilter,
};
pub use journal::JournalStore;
pub use memory::MemoryStore;
pub use stockledger_journal::ReadMode;
pub use traits::LedgerStore;
pub use view::{find_by_event_id, tenant_history};
