//! Submit command implementation.

use chrono::Utc;
use std::path::PathBuf;
use stockledger_canonical::{ActorId, RequestId, TenantId};
use stockledger_ingest::{IngestConfig, LedgerIngestor, RequestContext};
use stockledger_store::{JournalStore, ReadMode};

use super::read_json;
use crate::path;

/// Flags of the `submit` subcommand.
pub struct Args {
    pub tenant: Option<String>,
    pub actor: Option<String>,
    pub request_id: Option<String>,
    pub sync: bool,
    pub input: Option<String>,
}

pub fn run(
    config: &IngestConfig,
    journal: PathBuf,
    mode: ReadMode,
    args: Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = read_json(args.input)?;

    let journal_path = path::validate_journal_path(&journal, false)
        .map_err(|e| format!("Invalid journal path: {}", e))?;
    let store = JournalStore::open(&journal_path, mode, args.sync).map_err(|e| {
        format!(
            "Failed to open journal file: {}: {}",
            path::sanitize_path_for_error(&journal_path),
            e
        )
    })?;

    let request_id = match args.request_id {
        Some(id) => RequestId::parse(id)?,
        None => RequestId::new(format!("cli-{}", Utc::now().timestamp_millis())),
    };
    let ctx = RequestContext {
        tenant_id: args.tenant.map(TenantId::parse).transpose()?,
        actor_user_id: args.actor.map(ActorId::parse).transpose()?,
        request_id,
    };

    let ingestor = LedgerIngestor::new(store).with_limits(config.limits.clone());
    let response = ingestor.submit(&ctx, &body);
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    if !response.is_success() {
        return Err(format!(
            "submission failed with status {} ({})",
            response.status,
            response.code().unwrap_or("unknown")
        )
        .into());
    }
    Ok(())
}
