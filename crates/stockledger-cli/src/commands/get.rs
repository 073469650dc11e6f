//! Get command implementation.

use std::path::PathBuf;
use stockledger_canonical::{EventId, TenantId};
use stockledger_store::{find_by_event_id, ReadMode};

use super::open_existing;

pub fn run(
    journal: PathBuf,
    mode: ReadMode,
    tenant: String,
    event_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(journal, mode)?;
    let tenant = TenantId::parse(tenant)?;
    let event_id = EventId::parse(event_id).map_err(|e| format!("Invalid event ID: {}", e))?;

    match find_by_event_id(&store, &tenant, &event_id)? {
        Some(event) => {
            println!("{}", serde_json::to_string_pretty(&event)?);
            Ok(())
        }
        None => Err(format!("Event {} not found for tenant {}", event_id, tenant).into()),
    }
}
