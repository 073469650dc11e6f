use serde_json::json;
use stockledger_canonical::{CanonicalHash, Canonicalizer, RequestId, TenantId, Timestamp};
use stockledger_core::{
    canonical_hash, check_sequence_density, compute_event_id, identity_basis, validate,
    verify_event, EventVerdict, LedgerEvent, SchemaLimits,
};

fn make_event(tenant: &str, sequence: u64, key: &str) -> LedgerEvent {
    let canonicalizer = Canonicalizer::ledger();
    let fact = validate(
        &json!({
            "idempotencyKey": key,
            "eventType": "RECEIPT",
            "skuId": "sku-1",
            "hubId": "hub-1",
            "binId": "bin-1",
            "quantity": 10
        }),
        &SchemaLimits::default(),
    )
    .unwrap();
    let tenant_id = TenantId::from(tenant);
    let correlation_id = RequestId::from(format!("req-{}", key));
    let basis = identity_basis(&fact, &correlation_id);
    LedgerEvent {
        event_id: compute_event_id(&tenant_id, &basis, &fact),
        sequence,
        tenant_id,
        actor_user_id: None,
        correlation_id,
        created_at_utc: Timestamp::parse("2024-01-01T00:00:00Z").unwrap(),
        canonical_hash: canonical_hash(&fact, &canonicalizer).unwrap(),
        fact,
    }
}

#[test]
fn freshly_built_event_verifies() {
    let event = make_event("acme", 1, "k1");
    let verdict = verify_event(&event, &Canonicalizer::ledger()).unwrap();
    assert_eq!(verdict, EventVerdict::Ok);
}

#[test]
fn tampered_quantity_is_a_hash_mismatch() {
    let mut event = make_event("acme", 1, "k1");
    event.fact.quantity = 11;
    let verdict = verify_event(&event, &Canonicalizer::ledger()).unwrap();
    assert_eq!(verdict, EventVerdict::HashMismatch);
}

#[test]
fn tampered_tenant_is_an_event_id_mismatch() {
    let mut event = make_event("acme", 1, "k1");
    event.tenant_id = TenantId::from("globex");
    let verdict = verify_event(&event, &Canonicalizer::ledger()).unwrap();
    assert_eq!(verdict, EventVerdict::EventIdMismatch);
}

#[test]
fn forged_hash_is_detected() {
    let mut event = make_event("acme", 1, "k1");
    event.canonical_hash = CanonicalHash::from_digest(&[0u8; 32]);
    assert_eq!(
        verify_event(&event, &Canonicalizer::ledger()).unwrap(),
        EventVerdict::HashMismatch
    );
}

#[test]
fn dense_sequences_per_tenant_pass() {
    let events = vec![
        make_event("acme", 1, "a1"),
        make_event("globex", 1, "g1"),
        make_event("acme", 2, "a2"),
        make_event("globex", 2, "g2"),
        make_event("acme", 3, "a3"),
    ];
    assert!(check_sequence_density(&events).is_empty());
}

#[test]
fn gaps_and_duplicates_are_reported() {
    let events = vec![
        make_event("acme", 1, "a1"),
        make_event("acme", 3, "a3"),
        make_event("acme", 3, "a3b"),
    ];
    let violations = check_sequence_density(&events);
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].expected, 2);
    assert_eq!(violations[0].found, 3);
    assert_eq!(violations[1].expected, 4);
    assert_eq!(violations[1].found, 3);
}

#[test]
fn event_serializes_with_wire_field_names() {
    let event = make_event("acme", 7, "k1");
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["sequence"], 7);
    assert_eq!(value["tenantId"], "acme");
    assert_eq!(value["eventType"], "RECEIPT");
    assert_eq!(value["idempotencyKey"], "k1");
    assert!(value["event_id"].as_str().unwrap().starts_with("le_"));
    assert!(value.get("fact").is_none());
    stockledger_core::validate_record(&value).unwrap();

    let back: LedgerEvent = serde_json::from_value(value).unwrap();
    assert_eq!(back, event);
}
