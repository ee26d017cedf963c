use utxowallet_storage::memory::MemoryStore;
use utxowallet_storage::{Column, KeyValueStore, WriteBatch};

#[test]
fn columns_are_isolated() {
    let store = MemoryStore::new();
    store.put(Column::Outputs, b"key", b"out").expect("put");
    store.put(Column::SpentInputs, b"key", b"in").expect("put");

    assert_eq!(
        store.get(Column::Outputs, b"key").expect("get"),
        Some(b"out".to_vec())
    );
    assert_eq!(
        store.get(Column::SpentInputs, b"key").expect("get"),
        Some(b"in".to_vec())
    );
    assert!(store.get(Column::Transactions, b"key").expect("get").is_none());
    assert_eq!(store.len(Column::Outputs).expect("len"), 1);
}

#[test]
fn scan_prefix_stays_within_column() {
    let store = MemoryStore::new();
    store.put(Column::Transactions, b"a1", b"1").expect("put");
    store.put(Column::Transactions, b"a2", b"2").expect("put");
    store.put(Column::Transactions, b"b1", b"3").expect("put");
    store
        .put(Column::UnverifiedTransactions, b"a3", b"")
        .expect("put");

    let scanned = store.scan_prefix(Column::Transactions, b"a").expect("scan");
    assert_eq!(
        scanned,
        vec![
            (b"a1".to_vec(), b"1".to_vec()),
            (b"a2".to_vec(), b"2".to_vec()),
        ]
    );
    assert_eq!(
        store
            .scan_prefix(Column::Transactions, b"")
            .expect("scan all")
            .len(),
        3
    );

    assert_eq!(
        store
            .scan_prefix(Column::UnverifiedTransactions, b"")
            .expect("scan unverified"),
        vec![(b"a3".to_vec(), Vec::new())]
    );
    assert_eq!(store.len(Column::UnverifiedTransactions).expect("len"), 1);
}

#[test]
fn write_batch_applies_in_order() {
    let store = MemoryStore::new();
    store.put(Column::Outputs, b"gone", b"x").expect("put");

    let mut batch = WriteBatch::new();
    batch.put(Column::Outputs, b"key", b"first");
    batch.put(Column::Outputs, b"key", b"second");
    batch.delete(Column::Outputs, b"gone");
    store.write_batch(&batch).expect("commit");

    assert_eq!(
        store.get(Column::Outputs, b"key").expect("get"),
        Some(b"second".to_vec())
    );
    assert!(store.get(Column::Outputs, b"gone").expect("get").is_none());
}
