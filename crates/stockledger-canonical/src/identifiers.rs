use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Borrowed string form.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    ProfileId,
    "Identifier for canonicalization profiles (pattern: `[A-Za-z0-9_-]{16,128}`)",
    r"^[A-Za-z0-9_-]{16,128}$"
);
newtype!(
    TenantId,
    "Tenant isolation boundary; scopes identity, sequencing and idempotency.",
    r"^[A-Za-z0-9][A-Za-z0-9._:-]{0,127}$"
);
newtype!(
    ActorId,
    "User or service that submitted a write.",
    r"^[A-Za-z0-9][A-Za-z0-9._:@-]{0,127}$"
);
newtype!(
    RequestId,
    "Per-request correlation identifier.",
    r"^[A-Za-z0-9][A-Za-z0-9._:-]{0,127}$"
);
newtype!(
    IdempotencyKey,
    "Caller-chosen token naming one logical write across retries.",
    r"^[^\x00-\x1f\x7f]{1,128}$"
);
newtype!(
    Timestamp,
    "UTC RFC3339 timestamp with `Z` suffix.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$"
);
newtype!(
    EventId,
    "Deterministic ledger event identifier (`le_` + 8 hex).",
    r"^le_[0-9a-f]{8}$"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_pattern() {
        assert!(EventId::parse("le_0badf00d").is_ok());
        assert!(EventId::parse("le_0BADF00D").is_err());
        assert!(EventId::parse("0badf00d").is_err());
    }

    #[test]
    fn tenant_rejects_whitespace() {
        assert!(TenantId::parse("tenant-1").is_ok());
        assert!(TenantId::parse("tenant 1").is_err());
        assert!(TenantId::parse("").is_err());
    }
}
