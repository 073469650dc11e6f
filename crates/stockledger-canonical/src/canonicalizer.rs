use canonical_json::to_string;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest as _, Sha256};

use crate::digest::CanonicalHash;
use crate::identifiers::ProfileId;
use std::fmt;

/// Profile identifier for the ledger's canonical form.
pub const LEDGER_PROFILE_ID: &str = "stockledger-canonical-v1";

/// Maximum nesting depth accepted before canonicalization.
const MAX_DEPTH: usize = 32;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// The value could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Nesting exceeds the profile limit.
    #[error("nesting depth exceeds {max} at {path}")]
    DepthExceeded {
        /// Path where the limit was crossed.
        path: String,
        /// Configured limit.
        max: usize,
    },
    /// The RFC 8785 encoder rejected the value.
    #[error("canonical encoding failed: {0}")]
    Encoding(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }

    fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic bytes and content hashes.
///
/// Two payloads that differ only in object key order produce the same bytes;
/// any change to a value, or to array order, changes them.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    profile: ProfileId,
}

impl Canonicalizer {
    /// Creates a new canonicalizer for the provided profile.
    pub fn new(profile: ProfileId) -> Self {
        Self { profile }
    }

    /// Canonicalizer for the ledger's v1 profile.
    pub fn ledger() -> Self {
        Self::new(ProfileId::new(LEDGER_PROFILE_ID.to_string()))
    }

    /// Profile this canonicalizer encodes for.
    pub fn profile(&self) -> &ProfileId {
        &self.profile
    }

    /// Produces canonical UTF-8 bytes for a JSON value.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        self.validate(value, Path::root())?;
        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Encoding(err.to_string()))?;
        Ok(canonical.into_bytes())
    }

    /// Serializes `payload` and produces its canonical bytes.
    pub fn canonicalize_serializable<T: Serialize>(
        &self,
        payload: &T,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        let value = serde_json::to_value(payload)
            .map_err(|e| CanonicalizationError::Serialization(e.to_string()))?;
        self.canonicalize(&value)
    }

    /// SHA-256 over the canonical bytes of a JSON value.
    pub fn hash(&self, value: &Value) -> Result<CanonicalHash, CanonicalizationError> {
        let bytes = self.canonicalize(value)?;
        Ok(CanonicalHash::from_digest(Sha256::digest(&bytes).as_slice()))
    }

    /// SHA-256 over the canonical bytes of any serializable payload.
    pub fn hash_serializable<T: Serialize>(
        &self,
        payload: &T,
    ) -> Result<CanonicalHash, CanonicalizationError> {
        let bytes = self.canonicalize_serializable(payload)?;
        Ok(CanonicalHash::from_digest(Sha256::digest(&bytes).as_slice()))
    }

    fn validate(&self, value: &Value, path: Path) -> Result<(), CanonicalizationError> {
        if path.depth() > MAX_DEPTH {
            return Err(CanonicalizationError::DepthExceeded {
                path: path.to_string(),
                max: MAX_DEPTH,
            });
        }
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.validate(child, path.push_field(key))?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.validate(item, path.push_index(idx))?;
                }
                Ok(())
            }
            Value::Number(num) => match num.as_f64() {
                Some(f) if !f.is_finite() => {
                    Err(CanonicalizationError::NonFiniteNumber(path.to_string()))
                }
                _ => Ok(()),
            },
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::ledger()
    }
}
