use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a value is longer than its documented maximum.
    #[error("{field} is {len} characters, maximum is {max}")]
    TooLong {
        /// Field name that is too long.
        field: &'static str,
        /// Actual length in characters.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
}
