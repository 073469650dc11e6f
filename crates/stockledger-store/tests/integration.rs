use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::thread;

use stockledger_canonical::{Canonicalizer, IdempotencyKey, RequestId, TenantId, Timestamp};
use stockledger_core::{
    canonical_hash, compute_event_id, EventType, LedgerEvent, LedgerFact,
};
use stockledger_store::{
    find_by_event_id, tenant_history, AndFilter, EventTypeFilter, ItemFilter, JournalStore,
    LedgerStore, MemoryStore, ReadMode, StoreError, TenantFilter,
};
use tempfile::TempDir;

fn make_event(tenant: &str, key: &str, sequence: u64, sku: &str) -> LedgerEvent {
    let fact = LedgerFact {
        idempotency_key: IdempotencyKey::from(key),
        event_type: EventType::Receipt,
        sku_id: sku.into(),
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
    let tenant_id = TenantId::from(tenant);
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

fn exercise_constraints(store: &dyn LedgerStore) {
    store.append(make_event("acme", "k1", 1, "sku-1")).unwrap();
    store.append(make_event("acme", "k2", 2, "sku-2")).unwrap();
    store.append(make_event("globex", "k1", 1, "sku-1")).unwrap();

    assert!(matches!(
        store.append(make_event("acme", "k1", 3, "sku-1")),
        Err(StoreError::DuplicateIdempotencyKey { .. })
    ));
    assert!(matches!(
        store.append(make_event("acme", "k3", 2, "sku-1")),
        Err(StoreError::SequenceConflict { sequence: 2, .. })
    ));
    assert!(matches!(
        store.append(make_event("acme", "k3", 5, "sku-1")),
        Err(StoreError::SequenceGap { expected: 3, found: 5, .. })
    ));

    assert_eq!(store.list_all().unwrap().len(), 3);
    assert_eq!(store.max_sequence(&TenantId::from("acme")).unwrap(), 2);
    assert_eq!(store.max_sequence(&TenantId::from("initech")).unwrap(), 0);

    let found = store
        .lookup_by_idempotency_key(&TenantId::from("globex"), &IdempotencyKey::from("k1"))
        .unwrap()
        .unwrap();
    assert_eq!(found.tenant_id.as_str(), "globex");
    assert!(store
        .lookup_by_idempotency_key(&TenantId::from("globex"), &IdempotencyKey::from("k2"))
        .unwrap()
        .is_none());
}

#[test]
fn test_memory_store_constraints() {
    exercise_constraints(&MemoryStore::new());
}

#[test]
fn test_journal_store_constraints() {
    let temp_dir = TempDir::new().unwrap();
    let store = JournalStore::open(temp_dir.path().join("ledger.slj"), ReadMode::Strict, false)
        .unwrap();
    exercise_constraints(&store);
}

#[test]
fn test_journal_store_reopens_with_index() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    {
        let store = JournalStore::open(&path, ReadMode::Strict, true).unwrap();
        store.append(make_event("acme", "k1", 1, "sku-1")).unwrap();
        store.append(make_event("acme", "k2", 2, "sku-1")).unwrap();
        // Rejected appends leave nothing behind.
        assert!(store.append(make_event("acme", "k2", 3, "sku-1")).is_err());
    }

    let store = JournalStore::open(&path, ReadMode::Strict, false).unwrap();
    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1], make_event("acme", "k2", 2, "sku-1"));
    assert_eq!(store.max_sequence(&TenantId::from("acme")).unwrap(), 2);
    assert!(store
        .lookup_by_idempotency_key(&TenantId::from("acme"), &IdempotencyKey::from("k1"))
        .unwrap()
        .is_some());
    store.append(make_event("acme", "k3", 3, "sku-1")).unwrap();
}

#[test]
fn test_journal_store_torn_tail() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");
    {
        let store = JournalStore::open(&path, ReadMode::Strict, false).unwrap();
        store.append(make_event("acme", "k1", 1, "sku-1")).unwrap();
    }
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0x01, 0, 0, 0, 0x40, 0, 0, 0, 0, 0]).unwrap();
    drop(file);

    assert!(matches!(
        JournalStore::open(&path, ReadMode::Strict, false),
        Err(StoreError::Journal(_))
    ));
    let store = JournalStore::open(&path, ReadMode::Permissive, false).unwrap();
    assert_eq!(store.list_all().unwrap().len(), 1);
    store.append(make_event("acme", "k2", 2, "sku-1")).unwrap();
    drop(store);

    let store = JournalStore::open(&path, ReadMode::Strict, false).unwrap();
    assert_eq!(store.list_all().unwrap().len(), 2);
}

#[test]
fn test_journal_store_is_single_writer() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.slj");

    let first = JournalStore::open(&path, ReadMode::Strict, false).unwrap();
    assert!(matches!(
        JournalStore::open(&path, ReadMode::Strict, false),
        Err(StoreError::Locked(_))
    ));
    assert!(matches!(
        JournalStore::open(&path, ReadMode::Permissive, false),
        Err(StoreError::Locked(_))
    ));
    first.append(make_event("acme", "ka", 1, "sku-1")).unwrap();
    drop(first);

    let second = JournalStore::open(&path, ReadMode::Strict, false).unwrap();
    assert_eq!(second.max_sequence(&TenantId::from("acme")).unwrap(), 1);
    second.append(make_event("acme", "kb", 2, "sku-1")).unwrap();
    drop(second);

    let store = JournalStore::open(&path, ReadMode::Strict, false).unwrap();
    let events = store.list_all().unwrap();
    let keys: Vec<&str> = events.iter().map(|e| e.idempotency_key().as_str()).collect();
    assert_eq!(keys, vec!["ka", "kb"]);
}

#[test]
fn test_filters_and_views() {
    let store = MemoryStore::new();
    store.append(make_event("acme", "k1", 1, "sku-1")).unwrap();
    store.append(make_event("acme", "k2", 2, "sku-2")).unwrap();
    store.append(make_event("globex", "k1", 1, "sku-1")).unwrap();

    let filter = AndFilter::default()
        .with(TenantFilter {
            tenant_id: TenantId::from("acme"),
        })
        .with(ItemFilter {
            sku_id: "sku-1".into(),
        });
    let matched = store.list_filtered(&filter).unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].idempotency_key().as_str(), "k1");

    let receipts = store
        .list_filtered(&EventTypeFilter {
            event_type: EventType::Receipt,
        })
        .unwrap();
    assert_eq!(receipts.len(), 3);

    let acme = TenantId::from("acme");
    let target = make_event("acme", "k2", 2, "sku-2");
    let found = find_by_event_id(&store, &acme, &target.event_id).unwrap();
    assert_eq!(found, Some(target));

    let history = tenant_history(&store, &acme).unwrap();
    let sequences: Vec<u64> = history.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![1, 2]);
}

#[test]
fn test_concurrent_appends_never_duplicate() {
    let store = Arc::new(MemoryStore::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                // Every thread races for sequence 1 of the same tenant.
                store.append(make_event("acme", &format!("k{}", i), 1, "sku-1"))
            })
        })
        .collect();
    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(store.list_all().unwrap().len(), 1);
}
