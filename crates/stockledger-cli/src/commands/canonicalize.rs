//! Canonicalize command implementation.

use stockledger_canonical::Canonicalizer;

use super::read_json;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_json(input)?;
    let bytes = Canonicalizer::ledger()
        .canonicalize(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;
    println!("{}", String::from_utf8(bytes)?);
    Ok(())
}
