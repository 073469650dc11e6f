//! Verify command implementation.

use serde_json::json;
use std::path::PathBuf;
use stockledger_canonical::Canonicalizer;
use stockledger_core::{check_sequence_density, verify_event, EventVerdict};
use stockledger_store::{LedgerStore, ReadMode};

use super::open_existing;
use crate::output::truncate;

pub fn run(
    journal: PathBuf,
    mode: ReadMode,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(journal, mode)?;
    let events = store.list_all()?;
    let canonicalizer = Canonicalizer::ledger();

    let mut results = Vec::with_capacity(events.len());
    for event in &events {
        let verdict = verify_event(event, &canonicalizer)?;
        results.push((event, verdict));
    }
    // Opening the store already enforces density; this re-checks the listing.
    let violations = check_sequence_density(&events);
    let all_ok = violations.is_empty() && results.iter().all(|(_, v)| *v == EventVerdict::Ok);

    if json_output {
        let report = json!({
            "ok": all_ok,
            "events": results.iter().map(|(event, verdict)| json!({
                "tenantId": event.tenant_id,
                "sequence": event.sequence,
                "event_id": event.event_id,
                "verdict": verdict,
            })).collect::<Vec<_>>(),
            "sequenceViolations": violations,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{:<16} {:>6} {:<11} {}", "TENANT", "SEQ", "EVENT_ID", "VERDICT");
        println!("{}", "-".repeat(60));
        for (event, verdict) in &results {
            println!(
                "{:<16} {:>6} {:<11} {:?}",
                truncate(event.tenant_id.as_str(), 16),
                event.sequence,
                event.event_id.as_str(),
                verdict
            );
        }
        for violation in &violations {
            println!(
                "sequence violation: tenant {} expected {} found {}",
                violation.tenant_id, violation.expected, violation.found
            );
        }
        println!("{} events, {}", events.len(), if all_ok { "ok" } else { "FAILED" });
    }

    if strict && !all_ok {
        std::process::exit(1);
    }

    Ok(())
}
