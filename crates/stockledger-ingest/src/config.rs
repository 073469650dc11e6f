//! Ingestion configuration.
//!
//! Loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;
use stockledger_core::SchemaLimits;

/// Default journal file.
pub const DEFAULT_JOURNAL_PATH: &str = "stockledger.slj";
/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration for the ingestion pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// Journal backing the durable store (`LEDGER_JOURNAL_PATH`).
    pub journal_path: PathBuf,
    /// fsync after every append (`LEDGER_JOURNAL_SYNC`).
    pub journal_sync: bool,
    /// `tracing` filter used when `RUST_LOG` is unset (`LEDGER_LOG_FILTER`).
    pub log_filter: String,
    /// Field length and list limits applied by the schema validator.
    pub limits: SchemaLimits,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            journal_path: PathBuf::from(DEFAULT_JOURNAL_PATH),
            journal_sync: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            limits: SchemaLimits::default(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |name: &str, default: usize| -> Result<usize, ConfigError> {
            match lookup(name) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ConfigError::InvalidValue(name.to_string())),
            }
        };

        let journal_sync = match lookup("LEDGER_JOURNAL_SYNC").as_deref().map(str::trim) {
            None => defaults.journal_sync,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(_) => return Err(ConfigError::InvalidValue("LEDGER_JOURNAL_SYNC".to_string())),
        };

        Ok(IngestConfig {
            journal_path: lookup("LEDGER_JOURNAL_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.journal_path),
            journal_sync,
            log_filter: lookup("LEDGER_LOG_FILTER").unwrap_or(defaults.log_filter),
            limits: SchemaLimits {
                note_max: number("LEDGER_NOTE_MAX_LEN", defaults.limits.note_max)?,
                ref_max: number("LEDGER_REF_MAX_LEN", defaults.limits.ref_max)?,
                id_max: number("LEDGER_ID_MAX_LEN", defaults.limits.id_max)?,
                max_external_refs: number(
                    "LEDGER_MAX_EXTERNAL_REFS",
                    defaults.limits.max_external_refs,
                )?,
            },
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
