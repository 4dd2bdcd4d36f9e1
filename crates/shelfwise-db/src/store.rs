use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shelfwise_models::{
    Book, BookFilterParams, Transaction, TransactionFilterParams, UpdateBookDto, User,
    UserFilterParams,
};

use crate::errors::StoreError;

/// Key-indexed access to the three library collections.
///
/// Listing order is stable: books by title, patrons by name, loans newest
/// issue first. Ties fall back to the identifier.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn list_books(&self, filter: &BookFilterParams) -> Result<Vec<Book>, StoreError>;

    async fn get_book(&self, book_id: &str) -> Result<Option<Book>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when `book_id` is taken.
    async fn insert_book(&self, book: &Book) -> Result<(), StoreError>;

    /// Rewrites the catalog fields of a book; copy counters are untouched.
    async fn update_book(&self, book_id: &str, update: UpdateBookDto) -> Result<Book, StoreError>;

    /// Distinct genres, sorted.
    async fn genres(&self) -> Result<Vec<String>, StoreError>;

    async fn count_books(&self) -> Result<u64, StoreError>;

    async fn list_users(&self, filter: &UserFilterParams) -> Result<Vec<User>, StoreError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    /// Distinct departments, sorted.
    async fn departments(&self) -> Result<Vec<String>, StoreError>;

    async fn count_users(&self) -> Result<u64, StoreError>;

    async fn list_transactions(
        &self,
        filter: &TransactionFilterParams,
    ) -> Result<Vec<Transaction>, StoreError>;

    async fn get_transaction(&self, transaction_id: &str)
    -> Result<Option<Transaction>, StoreError>;

    async fn count_transactions(&self) -> Result<u64, StoreError>;

    /// Bulk inserts used by seeding. Rows whose key already exists are
    /// skipped; the return value is the number of rows actually written.
    async fn import_books(&self, books: &[Book]) -> Result<u64, StoreError>;

    async fn import_users(&self, users: &[User]) -> Result<u64, StoreError>;

    async fn import_transactions(&self, transactions: &[Transaction]) -> Result<u64, StoreError>;

    /// Records a new loan and takes one copy of the book off the shelf, as
    /// one atomic step.
    ///
    /// Checks run in order: the book exists ([`StoreError::NotFound`]), a
    /// copy is available ([`StoreError::Unavailable`]), the patron exists
    /// ([`StoreError::NotFound`]). On any failure nothing is written.
    async fn issue(&self, transaction: &Transaction) -> Result<(), StoreError>;

    /// Marks a loan returned with the given fine and puts the copy back, as
    /// one atomic step.
    ///
    /// Fails with [`StoreError::NotFound`] or [`StoreError::AlreadyReturned`]
    /// without writing anything. The counter never rises above
    /// `total_copies`; a missing book does not fail the return.
    async fn close(
        &self,
        transaction_id: &str,
        returned_at: DateTime<Utc>,
        fine_amount: Decimal,
    ) -> Result<Transaction, StoreError>;

    /// Deletes every row in all three collections.
    async fn clear(&self) -> Result<(), StoreError>;
}
