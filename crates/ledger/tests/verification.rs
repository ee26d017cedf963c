use utxowallet_ledger::{LedgerStore, ScriptHashHex, VerificationState};
use utxowallet_primitives::{OutPoint, Transaction, TxIn, TxOut};

// 2023-01-01T00:00:00Z
const NEW_YEAR_2023: u64 = 1_672_531_200;

fn spend(seed: u8) -> Transaction {
    Transaction {
        version: 1,
        inputs: vec![TxIn {
            prevout: OutPoint::new([seed; 32], 0),
            script_sig: Vec::new(),
            sequence: u32::MAX,
            witness: vec![vec![0x30; 72], vec![0x02; 33]],
        }],
        outputs: vec![TxOut {
            value: 50_000,
            script_pubkey: vec![0x00, 0x14, 0xab, 0xcd],
        }],
        lock_time: 0,
    }
}

#[test]
fn lifecycle_moves_forward_only() {
    let ledger = LedgerStore::in_memory();
    let tx = spend(1);
    let hash = tx.txid();

    let mut unit = ledger.begin().expect("begin");
    assert_eq!(
        unit.verification_state(&hash).expect("state"),
        VerificationState::Unknown
    );

    unit.put_transaction(&hash, &tx, 0).expect("put");
    assert_eq!(
        unit.verification_state(&hash).expect("state"),
        VerificationState::Unverified
    );

    unit.mark_verified(&hash, NEW_YEAR_2023).expect("verify");
    assert_eq!(
        unit.verification_state(&hash).expect("state"),
        VerificationState::Verified {
            header_timestamp: NEW_YEAR_2023
        }
    );

    unit.put_transaction(&hash, &tx, 100).expect("put again");
    assert_eq!(
        unit.verification_state(&hash).expect("state"),
        VerificationState::Verified {
            header_timestamp: NEW_YEAR_2023
        }
    );
    assert!(unit
        .list_unverified_transactions()
        .expect("list")
        .is_empty());
}

#[test]
fn mark_verified_twice_rewrites_timestamp() {
    let ledger = LedgerStore::in_memory();
    let tx = spend(2);
    let hash = tx.txid();

    ledger
        .update(|unit| {
            unit.put_transaction(&hash, &tx, 0)?;
            unit.mark_verified(&hash, NEW_YEAR_2023)
        })
        .expect("first verify");
    ledger
        .update(|unit| unit.mark_verified(&hash, NEW_YEAR_2023 + 600))
        .expect("second verify");

    let unit = ledger.begin().expect("begin");
    assert_eq!(
        unit.get_transaction(&hash).expect("get").header_timestamp,
        Some(NEW_YEAR_2023 + 600)
    );
    assert!(!unit
        .list_unverified_transactions()
        .expect("list")
        .contains(&hash));
}

#[test]
fn only_unverified_transactions_are_listed() {
    let ledger = LedgerStore::in_memory();
    let verified = spend(3);
    let pending = spend(4);

    let mut unit = ledger.begin().expect("begin");
    unit.put_transaction(&verified.txid(), &verified, 10).expect("put");
    unit.put_transaction(&pending.txid(), &pending, 0).expect("put");
    unit.mark_verified(&verified.txid(), NEW_YEAR_2023).expect("verify");
    unit.commit().expect("commit");

    let unit = ledger.begin().expect("begin");
    assert_eq!(
        unit.list_unverified_transactions().expect("list"),
        vec![pending.txid()]
    );
    let mut all = unit.list_transactions().expect("list");
    all.sort();
    let mut expected = vec![verified.txid(), pending.txid()];
    expected.sort();
    assert_eq!(all, expected);
}

#[test]
fn wallet_scenario() {
    let ledger = LedgerStore::in_memory();
    let t1 = spend(5);
    let hash = t1.txid();
    let a1 = ScriptHashHex::from_script(&t1.outputs[0].script_pubkey);

    ledger
        .update(|unit| {
            unit.put_transaction(&hash, &t1, 0)?;
            unit.add_address_to_transaction(&hash, &a1)
        })
        .expect("write T1");
    {
        let unit = ledger.begin().expect("begin");
        assert_eq!(
            unit.list_unverified_transactions().expect("list"),
            vec![hash]
        );
    }

    ledger
        .update(|unit| unit.mark_verified(&hash, NEW_YEAR_2023))
        .expect("verify T1");
    {
        let unit = ledger.begin().expect("begin");
        assert!(unit
            .list_unverified_transactions()
            .expect("list")
            .is_empty());
        assert_eq!(
            unit.get_transaction(&hash).expect("get").header_timestamp,
            Some(NEW_YEAR_2023)
        );
    }

    let outpoint = OutPoint::new(hash, 0);
    ledger
        .update(|unit| unit.put_utxo(&outpoint, &t1.outputs[0]))
        .expect("add utxo");
    {
        let unit = ledger.begin().expect("begin");
        let utxos = unit.list_utxos().expect("list");
        assert_eq!(utxos.len(), 1);
        assert_eq!(utxos[&outpoint].value, 50_000);
    }

    ledger
        .update(|unit| unit.delete_utxo(&outpoint))
        .expect("delete utxo");
    let unit = ledger.begin().expect("begin");
    assert!(unit.list_utxos().expect("list").is_empty());
}
