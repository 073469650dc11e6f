//! stockledger CLI: submit, list and verify inventory ledger events.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stockledger_ingest::IngestConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod path;

use commands::{canonicalize, get, hash, list, submit, verify};

#[derive(Parser)]
#[command(name = "stockledger")]
#[command(about = "Append-only inventory ledger: submit, list and verify events")]
struct Cli {
    /// Journal file (overrides LEDGER_JOURNAL_PATH)
    #[arg(long, global = true)]
    journal: Option<PathBuf>,
    /// Read a journal with a torn final frame, dropping the torn bytes
    #[arg(long, global = true)]
    permissive: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one write through the ingestion pipeline
    Submit {
        /// Tenant the write belongs to (omit to exercise TENANT_UNRESOLVED)
        #[arg(long)]
        tenant: Option<String>,
        /// Submitting user or service
        #[arg(long)]
        actor: Option<String>,
        /// Request correlation id (default: derived from the current time)
        #[arg(long)]
        request_id: Option<String>,
        /// fsync after the append (overrides LEDGER_JOURNAL_SYNC)
        #[arg(long)]
        sync: bool,
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// List events in a journal
    List {
        /// Only events of this tenant
        #[arg(long)]
        tenant: Option<String>,
        /// Only events of this type (e.g. RECEIPT)
        #[arg(long)]
        event_type: Option<String>,
        /// Only events for this item
        #[arg(long)]
        sku: Option<String>,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
        /// Stop after N events (default: unlimited)
        #[arg(long)]
        max_events: Option<usize>,
    },
    /// Show one event by tenant and event id
    Get {
        /// Owning tenant
        #[arg(long)]
        tenant: String,
        /// `le_` event id
        event_id: String,
    },
    /// Recompute hashes and ids and check sequence density
    Verify {
        /// Exit with error code if any check fails
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Show the canonical SHA-256 of input JSON
    Hash {
        /// Validate the input as a write body and hash the resulting fact
        #[arg(long)]
        fact: bool,
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match IngestConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_filter);

    let journal = cli.journal.unwrap_or_else(|| config.journal_path.clone());
    let mode = if cli.permissive {
        stockledger_store::ReadMode::Permissive
    } else {
        stockledger_store::ReadMode::Strict
    };

    let result = match cli.command {
        Commands::Submit {
            tenant,
            actor,
            request_id,
            sync,
            input,
        } => submit::run(
            &config,
            journal,
            mode,
            submit::Args {
                tenant,
                actor,
                request_id,
                sync: sync || config.journal_sync,
                input,
            },
        ),
        Commands::List {
            tenant,
            event_type,
            sku,
            json,
            max_events,
        } => list::run(journal, mode, tenant, event_type, sku, json, max_events),
        Commands::Get { tenant, event_id } => get::run(journal, mode, tenant, event_id),
        Commands::Verify { strict, json } => verify::run(journal, mode, strict, json),
        Commands::Canonicalize { input } => canonicalize::run(input),
        Commands::Hash { fact, input } => hash::run(&config, fact, input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `LEDGER_LOG_FILTER`.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
