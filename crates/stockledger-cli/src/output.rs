//! Output formatting utilities.

use stockledger_core::LedgerEvent;

/// Formats an event as a simple table row.
pub fn format_table_row(event: &LedgerEvent) -> String {
    let location = match event.fact.move_locations() {
        Some((from, to)) => format!(
            "{}/{}->{}/{}",
            from.hub_id, from.bin_id, to.hub_id, to.bin_id
        ),
        None => format!(
            "{}/{}",
            event.fact.hub_id,
            event.fact.bin_id.as_deref().unwrap_or("-")
        ),
    };
    format!(
        "{:<16} {:>6} {:<11} {:<16} {:<16} {:>8} {}",
        truncate(event.tenant_id.as_str(), 16),
        event.sequence,
        event.event_id.as_str(),
        event.fact.event_type.as_str(),
        truncate(&event.fact.sku_id, 16),
        event.fact.quantity,
        location
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<16} {:>6} {:<11} {:<16} {:<16} {:>8} {}",
        "TENANT", "SEQ", "EVENT_ID", "TYPE", "SKU", "QTY", "LOCATION"
    );
    println!("{}", "-".repeat(100));
}

/// Shortens `s` to `max_len` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
