//! PostgreSQL store tests. They need a reachable `DATABASE_URL`, so they are
//! ignored by default: `cargo test -p shelfwise-db -- --ignored`.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use shelfwise_db::{Entity, LibraryStore, PgLibraryStore, StoreError};
use shelfwise_models::{
    Book, BookFilterParams, Transaction, TransactionFilterParams, TransactionStatus, User,
};
use sqlx::PgPool;

async fn seeded(pool: PgPool, copies: i32) -> PgLibraryStore {
    let store = PgLibraryStore::new(pool);
    store
        .insert_book(&Book::new("B1", "Dune", "Frank Herbert", "SciFi", "C4", copies, copies).unwrap())
        .await
        .unwrap();
    store
        .insert_user(&User::new("U1", "Asha Rao", "asha@example.com", "98765", "MBA", "2").unwrap())
        .await
        .unwrap();
    store
}

#[sqlx::test]
#[ignore]
async fn test_issue_and_close_round_trip(pool: PgPool) {
    let store = seeded(pool, 2).await;
    let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();

    store
        .issue(&Transaction::issue("T1", "B1", "U1", issued_at, 7))
        .await
        .unwrap();
    assert_eq!(store.get_book("B1").await.unwrap().unwrap().available_copies, 1);

    let closed = store
        .close("T1", issued_at + Duration::days(10), Decimal::new(400, 2))
        .await
        .unwrap();
    assert_eq!(closed.status, TransactionStatus::Returned);
    assert_eq!(closed.fine_amount, Decimal::new(400, 2));
    assert_eq!(store.get_book("B1").await.unwrap().unwrap().available_copies, 2);
}

#[sqlx::test]
#[ignore]
async fn test_duplicate_book_is_conflict(pool: PgPool) {
    let store = seeded(pool, 1).await;
    let again = Book::new("B1", "Other", "Someone", "Poetry", "A1", 1, 1).unwrap();

    assert!(matches!(
        store.insert_book(&again).await,
        Err(StoreError::Duplicate(Entity::Book, _))
    ));
}

#[sqlx::test]
#[ignore]
async fn test_unknown_user_rolls_back_decrement(pool: PgPool) {
    let store = seeded(pool, 1).await;

    let result = store
        .issue(&Transaction::issue("T1", "B1", "U404", Utc::now(), 7))
        .await;
    assert!(matches!(result, Err(StoreError::NotFound(Entity::User, _))));
    assert_eq!(store.get_book("B1").await.unwrap().unwrap().available_copies, 1);
    assert_eq!(store.count_transactions().await.unwrap(), 0);
}

#[sqlx::test]
#[ignore]
async fn test_concurrent_issue_of_last_copy(pool: PgPool) {
    let store = Arc::new(seeded(pool, 1).await);

    let handles: Vec<_> = (0..2)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .issue(&Transaction::issue(format!("T{i}"), "B1", "U1", Utc::now(), 7))
                    .await
            })
        })
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(StoreError::Unavailable(_))))
            .count(),
        1
    );
}

#[sqlx::test]
#[ignore]
async fn test_double_close_is_rejected(pool: PgPool) {
    let store = seeded(pool, 1).await;
    store
        .issue(&Transaction::issue("T1", "B1", "U1", Utc::now(), 7))
        .await
        .unwrap();
    store.close("T1", Utc::now(), Decimal::ZERO).await.unwrap();

    let again = store.close("T1", Utc::now(), Decimal::from(50)).await;
    assert!(matches!(again, Err(StoreError::AlreadyReturned(_))));

    let missing = store.close("T404", Utc::now(), Decimal::ZERO).await;
    assert!(matches!(
        missing,
        Err(StoreError::NotFound(Entity::Transaction, _))
    ));
}

#[sqlx::test]
#[ignore]
async fn test_search_and_filters(pool: PgPool) {
    let store = seeded(pool, 1).await;
    store
        .import_books(&[Book::new("B2", "Emma", "Jane Austen", "Classic", "A1", 1, 1).unwrap()])
        .await
        .unwrap();

    let found = store
        .list_books(&BookFilterParams {
            genre: None,
            search: Some("AUSTEN".into()),
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].book_id, "B2");

    store
        .issue(&Transaction::issue("T1", "B1", "U1", Utc::now(), 7))
        .await
        .unwrap();
    let open = store
        .list_transactions(&TransactionFilterParams {
            status: Some(TransactionStatus::Issued),
            user_id: Some("U1".into()),
        })
        .await
        .unwrap();
    assert_eq!(open.len(), 1);
}
