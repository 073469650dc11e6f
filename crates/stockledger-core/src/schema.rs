//! Closed-field structural validation.
//!
//! Two allow-lists live here: one for inbound write bodies and one for the
//! serialized shape of a [`LedgerEvent`](crate::LedgerEvent) about to be
//! persisted. Anything outside either list fails closed; new fields must be
//! added to the list before clients may send them.

use serde_json::{json, Map, Number, Value};
use stockledger_canonical::IdempotencyKey;

use crate::events::{ExternalContextRef, LedgerEventInput};
use crate::rejection::{Rejection, RejectionCode};

/// Keys accepted on an inbound write body.
pub const INPUT_FIELDS: &[&str] = &[
    "idempotencyKey",
    "eventType",
    "skuId",
    "itemId",
    "hubId",
    "binId",
    "quantity",
    "qtyDelta",
    "reasonCode",
    "fromHubId",
    "fromBinId",
    "toHubId",
    "toBinId",
    "note",
    "referenceType",
    "referenceId",
    "parent_event_id",
    "causal_chain_id",
    "authorization_ref",
    "decision_ref",
    "external_context_refs",
];

/// Keys a persisted record may carry.
pub const RECORD_FIELDS: &[&str] = &[
    "event_id",
    "sequence",
    "tenantId",
    "actorUserId",
    "correlationId",
    "createdAtUtc",
    "canonicalHash",
    "idempotencyKey",
    "eventType",
    "skuId",
    "hubId",
    "binId",
    "quantity",
    "reasonCode",
    "fromHubId",
    "fromBinId",
    "toHubId",
    "toBinId",
    "note",
    "referenceType",
    "referenceId",
    "parent_event_id",
    "causal_chain_id",
    "authorization_ref",
    "decision_ref",
    "external_context_refs",
];

/// Keys every persisted record must carry.
pub const RECORD_REQUIRED_FIELDS: &[&str] = &[
    "event_id",
    "sequence",
    "tenantId",
    "correlationId",
    "createdAtUtc",
    "canonicalHash",
    "idempotencyKey",
    "eventType",
    "skuId",
    "hubId",
    "quantity",
];

const REF_FIELDS: &[&str] = &["id", "uri", "hash"];

/// Length limits applied after trimming. Longer strings are clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLimits {
    /// `note`.
    pub note_max: usize,
    /// Lineage, opaque refs, `referenceId` and `external_context_refs` values.
    pub ref_max: usize,
    /// Keys, item/hub/bin ids and enum-valued fields.
    pub id_max: usize,
    /// Elements accepted in `external_context_refs`.
    pub max_external_refs: usize,
}

impl Default for SchemaLimits {
    fn default() -> Self {
        Self {
            note_max: 512,
            ref_max: 256,
            id_max: 128,
            max_external_refs: 32,
        }
    }
}

/// Validates and normalizes an inbound write body.
///
/// Never panics: every input yields either the normalized request or a
/// [`Rejection`] from the schema category.
pub fn validate_input(body: &Value, limits: &SchemaLimits) -> Result<LedgerEventInput, Rejection> {
    let obj = body
        .as_object()
        .ok_or_else(|| Rejection::new(RejectionCode::InvalidBodyObject))?;

    let mut unknown: Vec<&str> = obj
        .keys()
        .map(String::as_str)
        .filter(|k| !INPUT_FIELDS.contains(k))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(Rejection::with_details(
            RejectionCode::UnknownFields,
            json!({ "fields": unknown }),
        ));
    }

    let idempotency_key = match obj.get("idempotencyKey") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => clamp(s, limits.id_max),
        Some(_) => {
            return Err(Rejection::field(
                RejectionCode::InvalidIdempotencyKey,
                "idempotencyKey",
            ))
        }
    }
    .ok_or_else(|| Rejection::field(RejectionCode::MissingIdempotencyKey, "idempotencyKey"))?;

    let sku_id = item_id(obj, limits)?;
    let quantity = quantity(obj)?;

    let text = |field: &str, max: usize| optional_string(obj, field, max);

    Ok(LedgerEventInput {
        idempotency_key: IdempotencyKey::new(idempotency_key),
        event_type: text("eventType", limits.id_max)?,
        sku_id,
        hub_id: text("hubId", limits.id_max)?,
        bin_id: text("binId", limits.id_max)?,
        quantity,
        reason_code: text("reasonCode", limits.id_max)?,
        from_hub_id: text("fromHubId", limits.id_max)?,
        from_bin_id: text("fromBinId", limits.id_max)?,
        to_hub_id: text("toHubId", limits.id_max)?,
        to_bin_id: text("toBinId", limits.id_max)?,
        note: text("note", limits.note_max)?,
        reference_type: text("referenceType", limits.id_max)?,
        reference_id: text("referenceId", limits.ref_max)?,
        parent_event_id: text("parent_event_id", limits.ref_max)?,
        causal_chain_id: text("causal_chain_id", limits.ref_max)?,
        authorization_ref: text("authorization_ref", limits.ref_max)?,
        decision_ref: text("decision_ref", limits.ref_max)?,
        external_context_refs: external_refs(obj.get("external_context_refs"), limits)?,
    })
}

/// Validates the serialized shape of a record about to be persisted.
pub fn validate_record(record: &Value) -> Result<(), Rejection> {
    let obj = record
        .as_object()
        .ok_or_else(|| Rejection::new(RejectionCode::RecordNotObject))?;

    let mut unknown: Vec<&str> = obj
        .keys()
        .map(String::as_str)
        .filter(|k| !RECORD_FIELDS.contains(k))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(Rejection::with_details(
            RejectionCode::RecordUnknownFields,
            json!({ "fields": unknown }),
        ));
    }

    for field in RECORD_REQUIRED_FIELDS {
        if obj.get(*field).map_or(true, Value::is_null) {
            return Err(Rejection::field(RejectionCode::RecordMissingField, field));
        }
    }
    Ok(())
}

/// Trims and clamps to `max` characters; empty becomes `None`.
fn clamp(raw: &str, max: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max).collect())
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    max: usize,
) -> Result<Option<String>, Rejection> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(clamp(s, max)),
        Some(_) => Err(Rejection::field(RejectionCode::InvalidFieldType, field)),
    }
}

fn item_id(obj: &Map<String, Value>, limits: &SchemaLimits) -> Result<String, Rejection> {
    let read = |field: &str| match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(clamp(s, limits.id_max)),
        Some(_) => Err(Rejection::field(RejectionCode::InvalidItemId, field)),
    };
    match (read("skuId")?, read("itemId")?) {
        (Some(sku), Some(item)) if sku != item => Err(Rejection::with_details(
            RejectionCode::ItemIdConflict,
            json!({ "skuId": sku, "itemId": item }),
        )),
        (Some(id), _) | (None, Some(id)) => Ok(id),
        (None, None) => Err(Rejection::field(RejectionCode::MissingItemId, "skuId")),
    }
}

fn quantity(obj: &Map<String, Value>) -> Result<Number, Rejection> {
    let read = |field: &str| match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(_) => Err(Rejection::field(RejectionCode::InvalidQtyDelta, field)),
    };
    match (read("quantity")?, read("qtyDelta")?) {
        (Some(q), Some(d)) if !same_number(&q, &d) => Err(Rejection::with_details(
            RejectionCode::QtyDeltaConflict,
            json!({ "quantity": q, "qtyDelta": d }),
        )),
        (Some(n), _) | (None, Some(n)) => Ok(n),
        (None, None) => Err(Rejection::field(RejectionCode::InvalidQtyDelta, "quantity")),
    }
}

/// Exact for integers; `10` and `10.0` still agree.
fn same_number(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if a.is_f64() || b.is_f64() {
        return a.as_f64() == b.as_f64();
    }
    false
}

fn external_refs(
    raw: Option<&Value>,
    limits: &SchemaLimits,
) -> Result<Vec<ExternalContextRef>, Rejection> {
    let items = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(refs_rejection("not_a_list", None)),
    };
    if items.len() > limits.max_external_refs {
        return Err(Rejection::with_details(
            RejectionCode::InvalidExternalContextRefs,
            json!({ "reason": "too_many", "max": limits.max_external_refs }),
        ));
    }

    let mut refs = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| refs_rejection("element_not_object", Some(index)))?;
        if obj.keys().any(|k| !REF_FIELDS.contains(&k.as_str())) {
            return Err(refs_rejection("unknown_key", Some(index)));
        }
        let field = |name: &str| match obj.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(clamp(s, limits.ref_max)),
            Some(_) => Err(refs_rejection("value_not_string", Some(index))),
        };
        let reference = ExternalContextRef {
            id: field("id")?,
            uri: field("uri")?,
            hash: field("hash")?,
        };
        if !reference.is_empty() {
            refs.push(reference);
        }
    }
    Ok(refs)
}

fn refs_rejection(reason: &str, index: Option<usize>) -> Rejection {
    Rejection::with_details(
        RejectionCode::InvalidExternalContextRefs,
        json!({ "reason": reason, "index": index }),
    )
}
