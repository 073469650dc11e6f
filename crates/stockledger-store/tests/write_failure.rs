//! Failed journal writes must not leave partial frames behind.
//!
//! Lowers `RLIMIT_FSIZE` for the whole process, so this file holds a single
//! test and runs as its own binary.
#![cfg(target_os = "linux")]

use std::fs;

use stockledger_canonical::{Canonicalizer, IdempotencyKey, RequestId, TenantId, Timestamp};
use stockledger_core::{canonical_hash, compute_event_id, EventType, LedgerEvent, LedgerFact};
use stockledger_store::{JournalStore, LedgerStore, ReadMode};
use tempfile::TempDir;

fn make_event(key: &str, sequence: u64) -> LedgerEvent {
    let fact = LedgerFact {
        idempotency_key: IdempotencyKey::from(key),
        event_type: EventType::Receipt,
        sku_id: "sku-1".into(),
        hub_id: "hub-1".into(),
        bin_id: Some("bin-1".into()),
        quantity: 5,
        reason_code: None,
        from_hub_id: None,
        from_bin_id: None,
        to_hub_id: None,
        to_bin_id: None,
        note: None,
        reference_type: None,
        reference_id: None,
        parent_event_id: None,
        causal_chain_id: None,
        authorization_ref: None,
        decision_ref: None,
        external_context_refs: Vec::new(),
    };
    let tenant_id = TenantId::from("acme");
    let request_id = format!("req-{}", key);
    LedgerEvent {
        event_id: compute_event_id(&tenant_id, &request_id, &fact),
        sequence,
        tenant_id,
        actor_user_id: None,
        correlation_id: RequestId::from(request_id.as_str()),
        created_at_utc: Timestamp::from("2026-03-01T12:00:00Z"),
        canonical_hash: canonical_hash(&fact, &Canonicalizer::ledger()).unwrap(),
        fact,
    }
}

fn file_size_limit() -> libc::rlimit {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    assert_eq!(unsafe { libc::getrlimit(libc::RLIMIT_FSIZE, &mut limit) }, 0);
    limit
}

fn set_file_size_limit(limit: &libc::rlimit) {
    assert_eq!(unsafe { libc::setrlimit(libc::RLIMIT_FSIZE, limit) }, 0);
}

#[test]
fn test_failed_append_rolls_back_partial_frame() {
    // Exceeding the limit must fail the write with EFBIG, not kill the process.
    unsafe {
        libc::signal(libc::SIGXFSZ, libc::SIG_IGN);
    }

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");
    let tenant = TenantId::from("acme");

    let store = JournalStore::open(&path, ReadMode::Strict, false).unwrap();
    store.append(make_event("k1", 1)).unwrap();
    let good_len = fs::metadata(&path).unwrap().len();

    // Room for part of the next frame, never all of it.
    let original = file_size_limit();
    let capped = libc::rlimit {
        rlim_cur: good_len + 40,
        rlim_max: original.rlim_max,
    };
    set_file_size_limit(&capped);
    let failed = store.append(make_event("k2", 2));
    set_file_size_limit(&original);

    assert!(failed.is_err());
    assert_eq!(fs::metadata(&path).unwrap().len(), good_len);
    assert_eq!(store.max_sequence(&tenant).unwrap(), 1);
    assert!(store
        .lookup_by_idempotency_key(&tenant, &IdempotencyKey::from("k2"))
        .unwrap()
        .is_none());

    store.append(make_event("k2", 2)).unwrap();
    store.append(make_event("k3", 3)).unwrap();
    drop(store);

    for mode in [ReadMode::Strict, ReadMode::Permissive] {
        let store = JournalStore::open(&path, mode, false).unwrap();
        let events = store.list_all().unwrap();
        let sequences: Vec<u64> = events.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }
}
