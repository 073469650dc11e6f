use serde::{Deserialize, Serialize};
use serde_json::Number;
use stockledger_canonical::{
    ActorId, CanonicalHash, EventId, IdempotencyKey, RequestId, TenantId, Timestamp,
};
use std::fmt;
use std::str::FromStr;

/// Closed taxonomy of inventory movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Initial stock for an item at a location.
    OpeningBalance,
    /// Signed correction with a reason code.
    Adjustment,
    /// Transfer between two (hub, bin) locations.
    Move,
    /// Inbound stock.
    Receipt,
}

impl EventType {
    /// Wire name of the event type.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::OpeningBalance => "OPENING_BALANCE",
            EventType::Adjustment => "ADJUSTMENT",
            EventType::Move => "MOVE",
            EventType::Receipt => "RECEIPT",
        }
    }
}

impl FromStr for EventType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPENING_BALANCE" => Ok(EventType::OpeningBalance),
            "ADJUSTMENT" => Ok(EventType::Adjustment),
            "MOVE" => Ok(EventType::Move),
            "RECEIPT" => Ok(EventType::Receipt),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of adjustment reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Stock damaged.
    Damage,
    /// Stock lost.
    Loss,
    /// Stock found.
    Found,
    /// Count correction.
    Correction,
    /// Anything else; the note should explain.
    Other,
}

impl ReasonCode {
    /// Wire name of the reason code.
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::Damage => "DAMAGE",
            ReasonCode::Loss => "LOSS",
            ReasonCode::Found => "FOUND",
            ReasonCode::Correction => "CORRECTION",
            ReasonCode::Other => "OTHER",
        }
    }
}

impl FromStr for ReasonCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAMAGE" => Ok(ReasonCode::Damage),
            "LOSS" => Ok(ReasonCode::Loss),
            "FOUND" => Ok(ReasonCode::Found),
            "CORRECTION" => Ok(ReasonCode::Correction),
            "OTHER" => Ok(ReasonCode::Other),
            _ => Err(()),
        }
    }
}

/// Opaque `{id, uri, hash}` reference triple. Stored and fingerprinted, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalContextRef {
    /// Reference identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Reference location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Content hash claimed by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl ExternalContextRef {
    /// True when all three fields are absent.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.uri.is_none() && self.hash.is_none()
    }
}

/// A (hub, bin) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location<'a> {
    /// Hub identifier.
    pub hub_id: &'a str,
    /// Bin identifier within the hub.
    pub bin_id: &'a str,
}

/// Structurally valid write request, before business rules.
///
/// Aliases are already folded: `itemId` lands in `sku_id` and `qtyDelta` in
/// `quantity`. String fields are trimmed, clamped, and `None` when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEventInput {
    /// Caller-chosen idempotency key.
    pub idempotency_key: IdempotencyKey,
    /// Raw event type, checked against the taxonomy by the rule validator.
    pub event_type: Option<String>,
    /// Item being moved.
    pub sku_id: String,
    /// Hub of the movement.
    pub hub_id: Option<String>,
    /// Bin within the hub.
    pub bin_id: Option<String>,
    /// Raw JSON number; integrality is a business rule.
    pub quantity: Number,
    /// Raw reason code.
    pub reason_code: Option<String>,
    /// MOVE source hub.
    pub from_hub_id: Option<String>,
    /// MOVE source bin.
    pub from_bin_id: Option<String>,
    /// MOVE destination hub.
    pub to_hub_id: Option<String>,
    /// MOVE destination bin.
    pub to_bin_id: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
    /// Business reference kind (e.g. `PO`).
    pub reference_type: Option<String>,
    /// Business reference identifier.
    pub reference_id: Option<String>,
    /// Lineage: parent event.
    pub parent_event_id: Option<String>,
    /// Lineage: causal chain.
    pub causal_chain_id: Option<String>,
    /// Opaque authorization reference.
    pub authorization_ref: Option<String>,
    /// Opaque decision reference.
    pub decision_ref: Option<String>,
    /// Opaque external references, in caller order.
    pub external_context_refs: Vec<ExternalContextRef>,
}

/// Business-valid movement fact: the payload that is hashed and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerFact {
    /// Caller-chosen idempotency key.
    pub idempotency_key: IdempotencyKey,
    /// Movement kind.
    pub event_type: EventType,
    /// Item being moved.
    pub sku_id: String,
    /// Hub of the movement.
    pub hub_id: String,
    /// Bin within the hub; required for every type except MOVE.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_id: Option<String>,
    /// Signed integer quantity.
    pub quantity: i64,
    /// Adjustment reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<ReasonCode>,
    /// MOVE source hub.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_hub_id: Option<String>,
    /// MOVE source bin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_bin_id: Option<String>,
    /// MOVE destination hub.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_hub_id: Option<String>,
    /// MOVE destination bin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_bin_id: Option<String>,
    /// Free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Business reference kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
    /// Business reference identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Lineage: parent event.
    #[serde(
        rename = "parent_event_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_event_id: Option<String>,
    /// Lineage: causal chain.
    #[serde(
        rename = "causal_chain_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub causal_chain_id: Option<String>,
    /// Opaque authorization reference.
    #[serde(
        rename = "authorization_ref",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub authorization_ref: Option<String>,
    /// Opaque decision reference.
    #[serde(rename = "decision_ref", default, skip_serializing_if = "Option::is_none")]
    pub decision_ref: Option<String>,
    /// Opaque external references, in caller order.
    #[serde(
        rename = "external_context_refs",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub external_context_refs: Vec<ExternalContextRef>,
}

impl LedgerFact {
    /// Source and destination for MOVE facts.
    pub fn move_locations(&self) -> Option<(Location<'_>, Location<'_>)> {
        match (
            self.from_hub_id.as_deref(),
            self.from_bin_id.as_deref(),
            self.to_hub_id.as_deref(),
            self.to_bin_id.as_deref(),
        ) {
            (Some(fh), Some(fb), Some(th), Some(tb)) => Some((
                Location {
                    hub_id: fh,
                    bin_id: fb,
                },
                Location {
                    hub_id: th,
                    bin_id: tb,
                },
            )),
            _ => None,
        }
    }
}

/// Persisted, immutable ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEvent {
    /// Deterministic `le_` identifier.
    #[serde(rename = "event_id")]
    pub event_id: EventId,
    /// Per-tenant ordinal, dense from 1.
    pub sequence: u64,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Submitting actor, when the context carried one.
    pub actor_user_id: Option<ActorId>,
    /// Request id of the accepting write.
    pub correlation_id: RequestId,
    /// Accept time.
    pub created_at_utc: Timestamp,
    /// SHA-256 of the canonical fact.
    pub canonical_hash: CanonicalHash,
    /// The validated fact.
    #[serde(flatten)]
    pub fact: LedgerFact,
}

impl LedgerEvent {
    /// Idempotency key of the write that produced this event.
    pub fn idempotency_key(&self) -> &IdempotencyKey {
        &self.fact.idempotency_key
    }
}
