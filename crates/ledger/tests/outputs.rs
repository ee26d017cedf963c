use utxowallet_ledger::{LedgerError, LedgerStore, ScriptHashHex, TxHistoryEntry};
use utxowallet_primitives::{OutPoint, TxOut};

fn output(value: i64, tag: u8) -> TxOut {
    TxOut {
        value,
        script_pubkey: vec![0x76, 0xa9, 0x14, tag, 0x88, 0xac],
    }
}

#[test]
fn utxo_roundtrip_and_delete() {
    let ledger = LedgerStore::in_memory();
    let outpoint = OutPoint::new([0xaa; 32], 3);
    let out = output(123_456, 1);

    let mut unit = ledger.begin().expect("begin");
    unit.put_utxo(&outpoint, &out).expect("put");
    unit.commit().expect("commit");

    let mut unit = ledger.begin().expect("begin");
    assert_eq!(unit.get_utxo(&outpoint).expect("get"), Some(out));
    unit.delete_utxo(&outpoint).expect("delete");
    assert_eq!(unit.get_utxo(&outpoint).expect("get"), None);
    unit.commit().expect("commit");

    let unit = ledger.begin().expect("begin");
    assert_eq!(unit.get_utxo(&outpoint).expect("get"), None);
}

#[test]
fn list_utxos_keeps_last_written_value() {
    let ledger = LedgerStore::in_memory();
    let mut unit = ledger.begin().expect("begin");
    for index in 0..5u32 {
        let outpoint = OutPoint::new([0xbb; 32], index);
        unit.put_utxo(&outpoint, &output(1, index as u8)).expect("put");
        unit.put_utxo(&outpoint, &output(1_000 + i64::from(index), index as u8))
            .expect("overwrite");
    }
    unit.commit().expect("commit");

    let unit = ledger.begin().expect("begin");
    let utxos = unit.list_utxos().expect("list");
    assert_eq!(utxos.len(), 5);
    for (outpoint, out) in &utxos {
        assert_eq!(out.value, 1_000 + i64::from(outpoint.index));
        assert_eq!(out.script_pubkey, output(0, outpoint.index as u8).script_pubkey);
    }
}

#[test]
fn spent_input_roundtrip() {
    let ledger = LedgerStore::in_memory();
    let spent = OutPoint::new([0xcc; 32], 0);
    let spender = [0xdd; 32];

    let mut unit = ledger.begin().expect("begin");
    assert_eq!(unit.get_spent_input(&spent).expect("get"), None);
    unit.put_spent_input(&spent, &spender).expect("put");
    assert_eq!(unit.get_spent_input(&spent).expect("get"), Some(spender));
    assert_eq!(
        unit.list_spent_inputs().expect("list"),
        vec![(spent.clone(), spender)]
    );
    unit.delete_spent_input(&spent).expect("delete");
    assert_eq!(unit.get_spent_input(&spent).expect("get"), None);
}

#[test]
fn spent_inputs_and_utxos_are_independent() {
    let ledger = LedgerStore::in_memory();
    let outpoint = OutPoint::new([0xee; 32], 1);

    let mut unit = ledger.begin().expect("begin");
    unit.put_utxo(&outpoint, &output(700, 9)).expect("put utxo");
    unit.put_spent_input(&outpoint, &[0x11; 32]).expect("put spent");
    assert!(unit.get_utxo(&outpoint).expect("get").is_some());
    unit.delete_spent_input(&outpoint).expect("delete spent");
    assert!(unit.get_utxo(&outpoint).expect("get").is_some());
}

#[test]
fn address_history_is_replaced_not_merged() {
    let ledger = LedgerStore::in_memory();
    let addr = ScriptHashHex::from_script(&[0x51]);
    let first = vec![
        TxHistoryEntry {
            tx_hash: [1; 32],
            height: 100,
        },
        TxHistoryEntry {
            tx_hash: [2; 32],
            height: 0,
        },
    ];
    let second = vec![TxHistoryEntry {
        tx_hash: [3; 32],
        height: -1,
    }];

    let mut unit = ledger.begin().expect("begin");
    assert!(unit.get_address_history(&addr).expect("get").is_empty());
    unit.put_address_history(&addr, &first).expect("put");
    assert_eq!(unit.get_address_history(&addr).expect("get"), first);
    unit.put_address_history(&addr, &second).expect("replace");
    unit.commit().expect("commit");

    let unit = ledger.begin().expect("begin");
    assert_eq!(unit.get_address_history(&addr).expect("get"), second);
    assert!(unit
        .get_address_history(&ScriptHashHex::from_script(&[0x52]))
        .expect("get unknown")
        .is_empty());
}

#[test]
fn malformed_output_key_is_reported() {
    use utxowallet_storage::memory::MemoryStore;
    use utxowallet_storage::{Column, KeyValueStore};

    let backend = MemoryStore::new();
    backend
        .put(Column::Outputs, b"not-an-outpoint", br#"{"value":1,"script":""}"#)
        .expect("seed");
    let ledger = LedgerStore::with_store(backend);

    let unit = ledger.begin().expect("begin");
    let err = unit.list_utxos().expect_err("malformed key");
    assert!(matches!(
        err,
        LedgerError::MalformedKey {
            partition: "outputs",
            ..
        }
    ));
}

#[test]
fn corrupt_transaction_record_is_reported() {
    use utxowallet_storage::memory::MemoryStore;
    use utxowallet_storage::{Column, KeyValueStore};

    let backend = MemoryStore::new();
    backend
        .put(Column::Transactions, &[7u8; 32], b"{not json")
        .expect("seed");
    let ledger = LedgerStore::with_store(backend);

    let unit = ledger.begin().expect("begin");
    let err = unit.get_transaction(&[7u8; 32]).expect_err("corrupt");
    assert!(matches!(
        err,
        LedgerError::CorruptRecord {
            partition: "transactions",
            ..
        }
    ));
    assert!(!err.is_fatal());
}
