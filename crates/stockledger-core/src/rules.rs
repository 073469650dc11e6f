//! Per-event-type business rules.
//!
//! Rules run in a fixed order and stop at the first failure:
//! event type, item/hub, integral quantity, sign, reason, MOVE locations, bin.
//! Location fields are fail-closed: MOVE takes the four `from`/`to` fields and
//! no `binId`, every other type takes `binId` and none of the MOVE fields.

use serde_json::{json, Number};

use crate::events::{EventType, LedgerEventInput, LedgerFact, ReasonCode};
use crate::rejection::{Rejection, RejectionCode};

/// Largest magnitude a float quantity may have and still be taken as an integer.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Applies the business rules to a structurally valid input.
pub fn validate_business(input: &LedgerEventInput) -> Result<LedgerFact, Rejection> {
    let event_type = input
        .event_type
        .as_deref()
        .and_then(|s| s.parse::<EventType>().ok())
        .ok_or_else(|| {
            Rejection::with_details(
                RejectionCode::EventTypeInvalid,
                json!({ "eventType": input.event_type }),
            )
        })?;

    let hub_id = match input.hub_id.as_deref() {
        Some(hub) if !input.sku_id.is_empty() => hub.to_string(),
        _ => {
            return Err(Rejection::with_details(
                RejectionCode::SkuOrHubRequired,
                json!({ "skuId": input.sku_id, "hubId": input.hub_id }),
            ))
        }
    };

    let quantity = integral(&input.quantity).ok_or_else(|| {
        Rejection::with_details(
            RejectionCode::QuantityNotInteger,
            json!({ "quantity": input.quantity }),
        )
    })?;

    match event_type {
        EventType::OpeningBalance | EventType::Receipt | EventType::Move if quantity <= 0 => {
            return Err(Rejection::with_details(
                RejectionCode::QuantityMustBePositive,
                json!({ "eventType": event_type.as_str(), "quantity": quantity }),
            ));
        }
        EventType::Adjustment if quantity == 0 => {
            return Err(Rejection::with_details(
                RejectionCode::QuantityZeroInvalid,
                json!({ "eventType": event_type.as_str(), "quantity": quantity }),
            ));
        }
        _ => {}
    }

    let reason_code = reason(event_type, input.reason_code.as_deref())?;

    if event_type == EventType::Move {
        let (from_hub, from_bin, to_hub, to_bin) = match (
            input.from_hub_id.as_deref(),
            input.from_bin_id.as_deref(),
            input.to_hub_id.as_deref(),
            input.to_bin_id.as_deref(),
        ) {
            (Some(fh), Some(fb), Some(th), Some(tb)) => (fh, fb, th, tb),
            _ => {
                let missing: Vec<&str> = [
                    ("fromHubId", &input.from_hub_id),
                    ("fromBinId", &input.from_bin_id),
                    ("toHubId", &input.to_hub_id),
                    ("toBinId", &input.to_bin_id),
                ]
                .into_iter()
                .filter(|(_, v)| v.is_none())
                .map(|(name, _)| name)
                .collect();
                return Err(Rejection::with_details(
                    RejectionCode::MoveFieldsRequired,
                    json!({ "missing": missing }),
                ));
            }
        };
        if from_hub == to_hub && from_bin == to_bin {
            return Err(Rejection::with_details(
                RejectionCode::MoveNoopInvalid,
                json!({ "hubId": from_hub, "binId": from_bin }),
            ));
        }
        if input.bin_id.is_some() {
            return Err(Rejection::field(RejectionCode::BinNotAllowed, "binId"));
        }
    } else {
        if input.bin_id.is_none() {
            return Err(Rejection::field(RejectionCode::BinRequired, "binId"));
        }
        let stray: Vec<&str> = [
            ("fromHubId", &input.from_hub_id),
            ("fromBinId", &input.from_bin_id),
            ("toHubId", &input.to_hub_id),
            ("toBinId", &input.to_bin_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_some())
        .map(|(name, _)| name)
        .collect();
        if !stray.is_empty() {
            return Err(Rejection::with_details(
                RejectionCode::MoveFieldsNotAllowed,
                json!({ "eventType": event_type.as_str(), "fields": stray }),
            ));
        }
    }

    Ok(LedgerFact {
        idempotency_key: input.idempotency_key.clone(),
        event_type,
        sku_id: input.sku_id.clone(),
        hub_id,
        bin_id: input.bin_id.clone(),
        quantity,
        reason_code,
        from_hub_id: input.from_hub_id.clone(),
        from_bin_id: input.from_bin_id.clone(),
        to_hub_id: input.to_hub_id.clone(),
        to_bin_id: input.to_bin_id.clone(),
        note: input.note.clone(),
        reference_type: input.reference_type.clone(),
        reference_id: input.reference_id.clone(),
        parent_event_id: input.parent_event_id.clone(),
        causal_chain_id: input.causal_chain_id.clone(),
        authorization_ref: input.authorization_ref.clone(),
        decision_ref: input.decision_ref.clone(),
        external_context_refs: input.external_context_refs.clone(),
    })
}

/// Integer value of a JSON number; whole floats within the safe range count.
fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        return None;
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        Some(f as i64)
    } else {
        None
    }
}

fn reason(event_type: EventType, raw: Option<&str>) -> Result<Option<ReasonCode>, Rejection> {
    let parsed = raw.map(|s| s.parse::<ReasonCode>());
    match (event_type, parsed) {
        (EventType::Adjustment, Some(Ok(code))) => Ok(Some(code)),
        (EventType::Adjustment, _) => Err(Rejection::with_details(
            RejectionCode::ReasonCodeRequired,
            json!({ "reasonCode": raw }),
        )),
        (_, Some(Err(()))) => Err(Rejection::with_details(
            RejectionCode::ReasonCodeInvalid,
            json!({ "reasonCode": raw }),
        )),
        (_, Some(Ok(code))) => Ok(Some(code)),
        (_, None) => Ok(None),
    }
}
