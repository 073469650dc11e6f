use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::ValidationError;

/// Lowercase hex SHA-256 digest of a canonicalized payload.
///
/// This is the `canonicalHash` stored on every ledger event and the only
/// input to idempotency-equality decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalHash(String);

impl CanonicalHash {
    /// Parses a 64-character lowercase hex digest.
    pub fn parse(hex: impl Into<String>) -> Result<Self, ValidationError> {
        let hex = hex.into();
        let re = Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex");
        if !re.is_match(&hex) {
            return Err(ValidationError::PatternMismatch {
                field: "canonicalHash",
                value: hex,
            });
        }
        Ok(Self(hex))
    }

    /// Encodes raw digest bytes.
    pub fn from_digest(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Hex string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_uppercase_and_short_values() {
        assert!(CanonicalHash::parse("AB".repeat(32)).is_err());
        assert!(CanonicalHash::parse("ab").is_err());
        assert!(CanonicalHash::parse("ab".repeat(32)).is_ok());
    }
}
