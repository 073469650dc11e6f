//! List command implementation.

use std::path::PathBuf;
use stockledger_canonical::TenantId;
use stockledger_core::EventType;
use stockledger_store::{AndFilter, EventTypeFilter, ItemFilter, LedgerStore, ReadMode, TenantFilter};

use super::open_existing;
use crate::output;

pub fn run(
    journal: PathBuf,
    mode: ReadMode,
    tenant: Option<String>,
    event_type: Option<String>,
    sku: Option<String>,
    json: bool,
    max_events: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(journal, mode)?;

    let mut filter = AndFilter::default();
    if let Some(tenant) = tenant {
        filter = filter.with(TenantFilter {
            tenant_id: TenantId::parse(tenant)?,
        });
    }
    if let Some(raw) = event_type {
        let event_type: EventType = raw
            .parse()
            .map_err(|_| format!("Unknown event type: {}", raw))?;
        filter = filter.with(EventTypeFilter { event_type });
    }
    if let Some(sku_id) = sku {
        filter = filter.with(ItemFilter { sku_id });
    }

    let events = store.list_filtered(&filter)?;
    let limit = max_events.unwrap_or(usize::MAX);

    if !json {
        output::print_table_header();
    }
    for event in events.iter().take(limit) {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{}", output::format_table_row(event));
        }
    }

    Ok(())
}
