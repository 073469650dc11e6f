use stockledger_canonical::{
    fingerprint_hex, CanonicalHash, Canonicalizer, IdempotencyKey, ProfileId, TenantId,
    LEDGER_PROFILE_ID,
};
use serde_json::json;

#[test]
fn canonical_hash_serializes_as_plain_hex() {
    let hash = CanonicalHash::from_digest(&[0xab; 32]);
    assert_eq!(
        serde_json::to_string(&hash).unwrap(),
        format!("\"{}\"", "ab".repeat(32))
    );
}

#[test]
fn sha256_of_canonical_bytes_is_stable() {
    // sha256("{}")
    let hash = Canonicalizer::ledger().hash(&json!({})).unwrap();
    assert_eq!(
        hash.as_str(),
        "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
    );
}

#[test]
fn canonicalizer_produces_ordered_bytes() {
    let profile = ProfileId::parse("profileid000000001").unwrap();
    let canonicalizer = Canonicalizer::new(profile);
    let value = json!({"b": 1, "a": {"nested": 2}});
    let bytes = canonicalizer.canonicalize(&value).unwrap();
    assert_eq!(bytes, br#"{"a":{"nested":2},"b":1}"#.to_vec());
}

#[test]
fn ledger_profile_id_is_valid() {
    assert!(ProfileId::parse(LEDGER_PROFILE_ID).is_ok());
    assert_eq!(Canonicalizer::ledger().profile().as_str(), LEDGER_PROFILE_ID);
}

#[test]
fn serializable_and_value_hashes_agree() {
    #[derive(serde::Serialize)]
    struct Payload {
        quantity: i64,
        sku: &'static str,
    }
    let canonicalizer = Canonicalizer::ledger();
    let a = canonicalizer
        .hash_serializable(&Payload { quantity: 3, sku: "s" })
        .unwrap();
    let b = canonicalizer.hash(&json!({"sku": "s", "quantity": 3})).unwrap();
    assert_eq!(a, b);
}

#[test]
fn identifiers_serialize_transparently() {
    let tenant = TenantId::parse("acme").unwrap();
    let key = IdempotencyKey::from("k1");
    assert_eq!(serde_json::to_value(&tenant).unwrap(), json!("acme"));
    assert_eq!(serde_json::to_value(&key).unwrap(), json!("k1"));
    assert_eq!(fingerprint_hex("acme").len(), 8);
}
