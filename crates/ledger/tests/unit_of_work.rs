use std::thread;
use std::time::Duration;

use utxowallet_ledger::{LedgerError, LedgerStore, ScriptHashHex};
use utxowallet_primitives::{OutPoint, TxOut};

fn outpoint(index: u32) -> OutPoint {
    OutPoint::new([0x42; 32], index)
}

fn output(value: i64) -> TxOut {
    TxOut {
        value,
        script_pubkey: vec![0x51],
    }
}

#[test]
fn rollback_discards_every_write() {
    let ledger = LedgerStore::in_memory();

    let mut unit = ledger.begin().expect("begin");
    unit.put_utxo(&outpoint(0), &output(1)).expect("put utxo");
    unit.put_spent_input(&outpoint(1), &[1; 32]).expect("put spent");
    unit.add_address_to_transaction(&[2; 32], &ScriptHashHex::new("addr"))
        .expect("add address");
    assert_eq!(unit.pending_writes(), 4);
    unit.rollback();
    assert!(!unit.is_open());

    let unit = ledger.begin().expect("begin");
    assert!(unit.list_utxos().expect("list").is_empty());
    assert_eq!(unit.get_spent_input(&outpoint(1)).expect("get"), None);
    assert!(unit.list_transactions().expect("list").is_empty());
    assert!(unit.list_unverified_transactions().expect("list").is_empty());
}

#[test]
fn dropping_an_open_unit_rolls_back() {
    let ledger = LedgerStore::in_memory();
    {
        let mut unit = ledger.begin().expect("begin");
        unit.put_utxo(&outpoint(0), &output(1)).expect("put");
    }
    let unit = ledger.begin().expect("begin");
    assert!(unit.list_utxos().expect("list").is_empty());
}

#[test]
fn update_commits_on_ok_and_rolls_back_on_err() {
    let ledger = LedgerStore::in_memory();

    let value = ledger
        .update(|unit| {
            unit.put_utxo(&outpoint(0), &output(10))?;
            Ok(10)
        })
        .expect("update");
    assert_eq!(value, 10);

    let err = ledger
        .update(|unit| -> Result<(), LedgerError> {
            unit.put_utxo(&outpoint(1), &output(20))?;
            Err(LedgerError::StoreUnavailable("indexer went away".to_string()))
        })
        .expect_err("update fails");
    assert!(matches!(err, LedgerError::StoreUnavailable(_)));

    let unit = ledger.begin().expect("begin");
    let utxos = unit.list_utxos().expect("list");
    assert_eq!(utxos.len(), 1);
    assert!(utxos.contains_key(&outpoint(0)));
}

#[test]
fn second_begin_blocks_until_commit() {
    let ledger = LedgerStore::in_memory();

    thread::scope(|scope| {
        let mut unit = ledger.begin().expect("begin");
        unit.put_utxo(&outpoint(0), &output(5)).expect("put");

        let waiter = scope.spawn(|| {
            let unit = ledger.begin().expect("second begin");
            unit.list_utxos().expect("list")
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!waiter.is_finished());
        unit.commit().expect("commit");

        let seen = waiter.join().expect("waiter");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[&outpoint(0)], output(5));
    });
}

#[test]
fn second_begin_sees_nothing_after_rollback() {
    let ledger = LedgerStore::in_memory();

    thread::scope(|scope| {
        let mut unit = ledger.begin().expect("begin");
        unit.put_utxo(&outpoint(0), &output(5)).expect("put");

        let waiter = scope.spawn(|| {
            let unit = ledger.begin().expect("second begin");
            unit.list_utxos().expect("list")
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!waiter.is_finished());
        unit.rollback();

        assert!(waiter.join().expect("waiter").is_empty());
    });
}

#[test]
fn finished_unit_rejects_work() {
    let ledger = LedgerStore::in_memory();
    let mut unit = ledger.begin().expect("begin");
    unit.put_utxo(&outpoint(0), &output(1)).expect("put");
    unit.commit().expect("commit");

    let err = unit.delete_utxo(&outpoint(0)).expect_err("delete after commit");
    assert!(err.is_fatal());
    let err = unit.mark_verified(&[1; 32], 5).expect_err("verify after commit");
    assert!(err.is_fatal());

    let err = unit.put_utxo(&outpoint(1), &output(1)).expect_err("put after commit");
    assert!(matches!(err, LedgerError::StoreUnavailable(_)));
    let err = unit.list_utxos().expect_err("read after commit");
    assert!(matches!(err, LedgerError::StoreUnavailable(_)));
    let err = unit.commit().expect_err("second commit");
    assert!(matches!(err, LedgerError::StoreUnavailable(_)));

    unit.rollback();
    unit.rollback();

    let unit = ledger.begin().expect("begin");
    assert_eq!(unit.get_utxo(&outpoint(0)).expect("get"), Some(output(1)));
}

#[test]
fn panicking_writer_does_not_wedge_the_store() {
    let ledger = LedgerStore::in_memory();

    let result = thread::scope(|scope| {
        scope
            .spawn(|| {
                let mut unit = ledger.begin().expect("begin");
                unit.put_utxo(&outpoint(0), &output(1)).expect("put");
                panic!("writer crashed mid-unit");
            })
            .join()
    });
    assert!(result.is_err());

    let unit = ledger.begin().expect("begin after panic");
    assert!(unit.list_utxos().expect("list").is_empty());
}

#[test]
fn close_makes_begin_fail() {
    let ledger = LedgerStore::in_memory();
    ledger
        .update(|unit| unit.put_utxo(&outpoint(0), &output(1)))
        .expect("update");

    assert!(!ledger.is_closed());
    ledger.close().expect("close");
    assert!(ledger.is_closed());
    ledger.close().expect("close twice");

    let err = ledger.begin().err().expect("begin after close");
    assert!(matches!(err, LedgerError::StoreUnavailable(_)));
    let err = ledger
        .update(|unit| unit.put_utxo(&outpoint(1), &output(1)))
        .expect_err("update after close");
    assert!(matches!(err, LedgerError::StoreUnavailable(_)));
}

#[test]
fn close_waits_for_the_open_unit() {
    let ledger = LedgerStore::in_memory();

    thread::scope(|scope| {
        let mut unit = ledger.begin().expect("begin");
        let closer = scope.spawn(|| ledger.close());

        thread::sleep(Duration::from_millis(100));
        assert!(!closer.is_finished());
        unit.put_utxo(&outpoint(0), &output(1)).expect("put");
        unit.commit().expect("commit");

        closer.join().expect("closer").expect("close");
    });
    assert!(ledger.is_closed());
}
