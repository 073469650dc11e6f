//! Hash command implementation.

use stockledger_canonical::Canonicalizer;
use stockledger_core::{canonical_hash, validate};
use stockledger_ingest::IngestConfig;

use super::read_json;

/// Prints the canonical SHA-256 of the input, or of the validated fact with `fact`.
pub fn run(
    config: &IngestConfig,
    fact: bool,
    input: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_json(input)?;
    let canonicalizer = Canonicalizer::ledger();
    let hash = if fact {
        let fact = validate(&value, &config.limits).map_err(|r| {
            format!("{}: {}", r, r.details)
        })?;
        canonical_hash(&fact, &canonicalizer)?
    } else {
        canonicalizer.hash(&value)?
    };
    println!("{}", hash);
    Ok(())
}
