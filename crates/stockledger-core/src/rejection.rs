//! Closed rejection taxonomy shared by the schema and rule validators.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

/// Layer-level category, surfaced as the `error` field of a rejection body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// Structural failure of the request body.
    Schema,
    /// Unknown or missing event type.
    EventType,
    /// Missing item or location.
    Location,
    /// Quantity type or sign.
    Quantity,
    /// Reason code missing or outside the closed set.
    Reason,
    /// MOVE locations.
    Move,
    /// Record about to be persisted has the wrong shape.
    Record,
}

impl RejectionKind {
    /// Wire name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            RejectionKind::Schema => "LEDGER_SCHEMA_INVALID",
            RejectionKind::EventType => "LEDGER_EVENTTYPE_INVALID",
            RejectionKind::Location => "LEDGER_LOCATION_INVALID",
            RejectionKind::Quantity => "LEDGER_QUANTITY_INVALID",
            RejectionKind::Reason => "LEDGER_REASON_INVALID",
            RejectionKind::Move => "LEDGER_MOVE_INVALID",
            RejectionKind::Record => "LEDGER_RECORD_INVALID",
        }
    }
}

/// Specific failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCode {
    /// Body is not a JSON object.
    InvalidBodyObject,
    /// Body carries keys outside the allow-list.
    UnknownFields,
    /// `idempotencyKey` absent or empty.
    MissingIdempotencyKey,
    /// `idempotencyKey` is not a string.
    InvalidIdempotencyKey,
    /// Neither `skuId` nor `itemId` given.
    MissingItemId,
    /// `skuId`/`itemId` is not a string.
    InvalidItemId,
    /// `skuId` and `itemId` disagree.
    ItemIdConflict,
    /// `quantity`/`qtyDelta` absent or not a number.
    InvalidQtyDelta,
    /// `quantity` and `qtyDelta` disagree.
    QtyDeltaConflict,
    /// Optional field has the wrong JSON type.
    InvalidFieldType,
    /// `external_context_refs` malformed.
    InvalidExternalContextRefs,
    /// Event type outside the taxonomy.
    EventTypeInvalid,
    /// Item or hub missing.
    SkuOrHubRequired,
    /// Quantity is fractional or out of range.
    QuantityNotInteger,
    /// Quantity must be > 0 for this type.
    QuantityMustBePositive,
    /// ADJUSTMENT of zero.
    QuantityZeroInvalid,
    /// ADJUSTMENT without a valid reason.
    ReasonCodeRequired,
    /// Reason code outside the closed set on a non-ADJUSTMENT event.
    ReasonCodeInvalid,
    /// MOVE missing one of its four locations.
    MoveFieldsRequired,
    /// MOVE with identical source and destination.
    MoveNoopInvalid,
    /// Non-MOVE without a bin.
    BinRequired,
    /// MOVE carrying a single `binId`.
    BinNotAllowed,
    /// Non-MOVE carrying MOVE location fields.
    MoveFieldsNotAllowed,
    /// Persisted record is not an object.
    RecordNotObject,
    /// Persisted record carries keys outside the record allow-list.
    RecordUnknownFields,
    /// Persisted record lacks a required key.
    RecordMissingField,
}

impl RejectionCode {
    /// Wire name of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            RejectionCode::InvalidBodyObject => "INVALID_BODY_OBJECT",
            RejectionCode::UnknownFields => "UNKNOWN_FIELDS",
            RejectionCode::MissingIdempotencyKey => "MISSING_IDEMPOTENCY_KEY",
            RejectionCode::InvalidIdempotencyKey => "INVALID_IDEMPOTENCY_KEY",
            RejectionCode::MissingItemId => "MISSING_ITEM_ID",
            RejectionCode::InvalidItemId => "INVALID_ITEM_ID",
            RejectionCode::ItemIdConflict => "ITEM_ID_CONFLICT",
            RejectionCode::InvalidQtyDelta => "INVALID_QTY_DELTA",
            RejectionCode::QtyDeltaConflict => "QTY_DELTA_CONFLICT",
            RejectionCode::InvalidFieldType => "INVALID_FIELD_TYPE",
            RejectionCode::InvalidExternalContextRefs => "INVALID_EXTERNAL_CONTEXT_REFS",
            RejectionCode::EventTypeInvalid => "LEDGER_EVENTTYPE_INVALID",
            RejectionCode::SkuOrHubRequired => "SKU_OR_HUB_REQUIRED",
            RejectionCode::QuantityNotInteger => "QUANTITY_NOT_INTEGER",
            RejectionCode::QuantityMustBePositive => "QUANTITY_MUST_BE_POSITIVE",
            RejectionCode::QuantityZeroInvalid => "QUANTITY_ZERO_INVALID",
            RejectionCode::ReasonCodeRequired => "REASON_CODE_REQUIRED",
            RejectionCode::ReasonCodeInvalid => "REASON_CODE_INVALID",
            RejectionCode::MoveFieldsRequired => "MOVE_FIELDS_REQUIRED",
            RejectionCode::MoveNoopInvalid => "MOVE_NOOP_INVALID",
            RejectionCode::BinRequired => "BIN_REQUIRED",
            RejectionCode::BinNotAllowed => "BIN_NOT_ALLOWED",
            RejectionCode::MoveFieldsNotAllowed => "MOVE_FIELDS_NOT_ALLOWED",
            RejectionCode::RecordNotObject => "RECORD_NOT_OBJECT",
            RejectionCode::RecordUnknownFields => "RECORD_UNKNOWN_FIELDS",
            RejectionCode::RecordMissingField => "RECORD_MISSING_FIELD",
        }
    }

    /// Category this code belongs to.
    pub fn kind(self) -> RejectionKind {
        use RejectionCode::*;
        match self {
            InvalidBodyObject
            | UnknownFields
            | MissingIdempotencyKey
            | InvalidIdempotencyKey
            | MissingItemId
            | InvalidItemId
            | ItemIdConflict
            | InvalidQtyDelta
            | QtyDeltaConflict
            | InvalidFieldType
            | InvalidExternalContextRefs => RejectionKind::Schema,
            EventTypeInvalid => RejectionKind::EventType,
            SkuOrHubRequired | BinRequired | BinNotAllowed => RejectionKind::Location,
            QuantityNotInteger | QuantityMustBePositive | QuantityZeroInvalid => {
                RejectionKind::Quantity
            }
            ReasonCodeRequired | ReasonCodeInvalid => RejectionKind::Reason,
            MoveFieldsRequired | MoveNoopInvalid | MoveFieldsNotAllowed => RejectionKind::Move,
            RecordNotObject | RecordUnknownFields | RecordMissingField => RejectionKind::Record,
        }
    }
}

impl Serialize for RejectionCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fail-closed validation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Specific code.
    pub code: RejectionCode,
    /// Structured context (offending field, observed value, ...).
    pub details: Value,
}

impl Rejection {
    /// Rejection with empty details.
    pub fn new(code: RejectionCode) -> Self {
        Self {
            code,
            details: json!({}),
        }
    }

    /// Rejection naming a single field.
    pub fn field(code: RejectionCode, field: &str) -> Self {
        Self {
            code,
            details: json!({ "field": field }),
        }
    }

    /// Rejection with arbitrary details.
    pub fn with_details(code: RejectionCode, details: Value) -> Self {
        Self { code, details }
    }

    /// Category of this rejection.
    pub fn kind(&self) -> RejectionKind {
        self.code.kind()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind().as_str(), self.code)
    }
}

impl std::error::Error for Rejection {}
