use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use racha_shared::types::{CategoryId, Money, TransactionId, UserId};

use crate::model::{Split, Transaction, TransactionKind};
use crate::store::{MemoryStore, Store, StoreError};

use super::error::MirrorError;
use super::service::MirrorSync;

fn shared_expense(owner: UserId, amount: Money) -> Transaction {
    Transaction {
        id: TransactionId::new(),
        owner_id: owner,
        amount,
        description: "Mercado da semana".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(),
        category_id: Some(CategoryId::new()),
        is_shared: true,
        payer_id: None,
        source_transaction_id: None,
        kind: TransactionKind::Expense { account_id: None },
    }
}

async fn seed_shared(
    store: &Arc<MemoryStore>,
    owner: UserId,
    other: UserId,
) -> (Transaction, Vec<Split>) {
    let txn = store
        .insert_transaction(shared_expense(owner, Money::from_minor_units(9_000)))
        .await
        .unwrap();
    let splits = store
        .insert_splits(vec![
            Split::new(txn.id, owner, dec!(50), Money::from_minor_units(4_500)),
            Split::new(txn.id, other, dec!(50), Money::from_minor_units(4_500)),
        ])
        .await
        .unwrap();
    (txn, splits)
}

#[tokio::test]
async fn test_create_mirrors_skips_the_payer() {
    let store = Arc::new(MemoryStore::new());
    let owner = UserId::new();
    let other = UserId::new();
    let (txn, splits) = seed_shared(&store, owner, other).await;

    let sync = MirrorSync::new(store.clone());
    let mirrors = sync.create_mirrors(&txn, &splits).await.unwrap();

    // 90.00 split 50/50 produces exactly one mirror of 45.00 for the
    // non-payer, none for the payer.
    assert_eq!(mirrors.len(), 1);
    let mirror = &mirrors[0];
    assert_eq!(mirror.owner_id, other);
    assert_eq!(mirror.amount, Money::from_minor_units(4_500));
    assert_eq!(mirror.description, txn.description);
    assert_eq!(mirror.date, txn.date);
    assert_eq!(mirror.category_id, txn.category_id);
    assert_eq!(mirror.source_transaction_id, Some(txn.id));
    assert_eq!(mirror.payer_id, Some(owner));
    assert_eq!(mirror.kind, TransactionKind::Expense { account_id: None });
    assert!(mirror.is_mirror());
    assert!(!mirror.is_shared);
}

#[tokio::test]
async fn test_create_mirrors_uses_explicit_payer() {
    let store = Arc::new(MemoryStore::new());
    let owner = UserId::new();
    let payer = UserId::new();
    let mut txn = shared_expense(owner, Money::from_minor_units(9_000));
    txn.payer_id = Some(payer);
    let txn = store.insert_transaction(txn).await.unwrap();

    let splits = store
        .insert_splits(vec![
            Split::new(txn.id, payer, dec!(50), Money::from_minor_units(4_500)),
            Split::new(txn.id, owner, dec!(50), Money::from_minor_units(4_500)),
        ])
        .await
        .unwrap();

    let sync = MirrorSync::new(store.clone());
    let mirrors = sync.create_mirrors(&txn, &splits).await.unwrap();

    // The payer's split gets no mirror even when the payer is not the owner.
    assert_eq!(mirrors.len(), 1);
    assert_eq!(mirrors[0].owner_id, owner);
    assert_eq!(mirrors[0].payer_id, Some(payer));
}

#[tokio::test]
async fn test_no_mirror_of_mirror() {
    let store = Arc::new(MemoryStore::new());
    let owner = UserId::new();
    let other = UserId::new();
    let (txn, splits) = seed_shared(&store, owner, other).await;

    let sync = MirrorSync::new(store.clone());
    let mirrors = sync.create_mirrors(&txn, &splits).await.unwrap();

    let err = sync.create_mirrors(&mirrors[0], &splits).await.unwrap_err();
    assert!(matches!(err, MirrorError::MirrorOfMirror(id) if id == mirrors[0].id));

    let err = sync.sync_mirrors(&mirrors[0], &splits).await.unwrap_err();
    assert!(matches!(err, MirrorError::MirrorOfMirror(_)));
}

#[tokio::test]
async fn test_mirrors_are_read_only() {
    let store = Arc::new(MemoryStore::new());
    let owner = UserId::new();
    let other = UserId::new();
    let (txn, splits) = seed_shared(&store, owner, other).await;

    let sync = MirrorSync::new(store.clone());
    let mirrors = sync.create_mirrors(&txn, &splits).await.unwrap();

    assert!(sync.ensure_editable(&txn).is_ok());
    let err = sync.ensure_editable(&mirrors[0]).unwrap_err();
    assert!(matches!(err, MirrorError::MirrorReadOnly(id) if id == mirrors[0].id));
    assert_eq!(err.error_code(), "MIRROR_READ_ONLY");

    // Deleting through the cascade path is also refused for a mirror id.
    let err = sync.delete_source(mirrors[0].id).await.unwrap_err();
    assert!(matches!(err, MirrorError::MirrorReadOnly(_)));
}

#[tokio::test]
async fn test_sync_patches_mirrors_in_lockstep() {
    let store = Arc::new(MemoryStore::new());
    let owner = UserId::new();
    let other = UserId::new();
    let (mut txn, _) = seed_shared(&store, owner, other).await;
    let splits = store.splits_for_transaction(txn.id).await.unwrap();

    let sync = MirrorSync::new(store.clone());
    sync.create_mirrors(&txn, &splits).await.unwrap();

    // The source amount changes from 90.00 to 120.00, splits recomputed.
    txn.amount = Money::from_minor_units(12_000);
    txn.description = "Mercado e padaria".to_string();
    store.update_transaction(txn.clone()).await.unwrap();
    let mut updated_splits = splits.clone();
    for split in &mut updated_splits {
        split.amount = Money::from_minor_units(6_000);
    }

    sync.sync_mirrors(&txn, &updated_splits).await.unwrap();

    let mirrors = store.transactions_by_source(txn.id).await.unwrap();
    assert_eq!(mirrors.len(), 1);
    assert_eq!(mirrors[0].amount, Money::from_minor_units(6_000));
    assert_eq!(mirrors[0].description, "Mercado e padaria");
}

#[tokio::test]
async fn test_sync_creates_missing_and_deletes_stale_mirrors() {
    let store = Arc::new(MemoryStore::new());
    let owner = UserId::new();
    let leaving = UserId::new();
    let joining = UserId::new();
    let (txn, _) = seed_shared(&store, owner, leaving).await;
    let splits = store.splits_for_transaction(txn.id).await.unwrap();

    let sync = MirrorSync::new(store.clone());
    sync.create_mirrors(&txn, &splits).await.unwrap();

    // Membership changes: `leaving` drops out, `joining` takes the share.
    let new_splits = vec![
        Split::new(txn.id, owner, dec!(50), Money::from_minor_units(4_500)),
        Split::new(txn.id, joining, dec!(50), Money::from_minor_units(4_500)),
    ];
    sync.sync_mirrors(&txn, &new_splits).await.unwrap();

    let mirrors = store.transactions_by_source(txn.id).await.unwrap();
    assert_eq!(mirrors.len(), 1);
    assert_eq!(mirrors[0].owner_id, joining);
}

#[tokio::test]
async fn test_delete_source_cascades_splits_and_mirrors() {
    let store = Arc::new(MemoryStore::new());
    let owner = UserId::new();
    let other = UserId::new();
    let (txn, splits) = seed_shared(&store, owner, other).await;

    let sync = MirrorSync::new(store.clone());
    let mirrors = sync.create_mirrors(&txn, &splits).await.unwrap();

    sync.delete_source(txn.id).await.unwrap();

    assert_eq!(store.transaction(txn.id).await, Err(StoreError::NotFound));
    assert_eq!(
        store.transaction(mirrors[0].id).await,
        Err(StoreError::NotFound)
    );
    assert!(store.splits_for_transaction(txn.id).await.unwrap().is_empty());
    assert!(store.all_splits().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_source() {
    let store = Arc::new(MemoryStore::new());
    let sync = MirrorSync::new(store);

    let missing = TransactionId::new();
    let err = sync.delete_source(missing).await.unwrap_err();
    assert!(matches!(err, MirrorError::SourceNotFound(id) if id == missing));
}
