//! In-process [`LibraryStore`].
//!
//! All three collections live behind one mutex, so every operation, issue and
//! return included, checks and mutates under a single lock acquisition. The
//! lock is never held across an `.await`.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shelfwise_models::{
    Book, BookFilterParams, Transaction, TransactionFilterParams, TransactionStatus,
    UpdateBookDto, User, UserFilterParams,
};
use tracing::warn;

use crate::errors::{Entity, StoreError};
use crate::store::LibraryStore;

#[derive(Debug, Default)]
struct Collections {
    books: BTreeMap<String, Book>,
    users: BTreeMap<String, User>,
    transactions: BTreeMap<String, Transaction>,
}

#[derive(Debug, Default)]
pub struct InMemoryLibraryStore {
    inner: Mutex<Collections>,
}

impl InMemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn import<T: Clone>(
    target: &mut BTreeMap<String, T>,
    rows: &[T],
    key: impl Fn(&T) -> &str,
) -> u64 {
    let mut written = 0;
    for row in rows {
        let id = key(row);
        if !target.contains_key(id) {
            target.insert(id.to_string(), row.clone());
            written += 1;
        }
    }
    written
}

#[async_trait]
impl LibraryStore for InMemoryLibraryStore {
    async fn list_books(&self, filter: &BookFilterParams) -> Result<Vec<Book>, StoreError> {
        let inner = self.inner.lock();
        let mut books: Vec<Book> = inner
            .books
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.book_id.cmp(&b.book_id)));
        Ok(books)
    }

    async fn get_book(&self, book_id: &str) -> Result<Option<Book>, StoreError> {
        Ok(self.inner.lock().books.get(book_id).cloned())
    }

    async fn insert_book(&self, book: &Book) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.books.contains_key(&book.book_id) {
            return Err(StoreError::Duplicate(Entity::Book, book.book_id.clone()));
        }
        inner.books.insert(book.book_id.clone(), book.clone());
        Ok(())
    }

    async fn update_book(&self, book_id: &str, update: UpdateBookDto) -> Result<Book, StoreError> {
        let mut inner = self.inner.lock();
        let book = inner
            .books
            .get_mut(book_id)
            .ok_or_else(|| StoreError::NotFound(Entity::Book, book_id.to_string()))?;
        update.apply_to(book);
        Ok(book.clone())
    }

    async fn genres(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.lock();
        let genres: BTreeSet<&String> = inner.books.values().map(|b| &b.genre).collect();
        Ok(genres.into_iter().cloned().collect())
    }

    async fn count_books(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().books.len() as u64)
    }

    async fn list_users(&self, filter: &UserFilterParams) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock();
        let mut users: Vec<User> = inner
            .users
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.user_id.cmp(&b.user_id)));
        Ok(users)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().users.get(user_id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.users.contains_key(&user.user_id) {
            return Err(StoreError::Duplicate(Entity::User, user.user_id.clone()));
        }
        inner.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn departments(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.lock();
        let departments: BTreeSet<&String> =
            inner.users.values().map(|u| &u.department).collect();
        Ok(departments.into_iter().cloned().collect())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().users.len() as u64)
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilterParams,
    ) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.inner.lock();
        let mut transactions: Vec<Transaction> = inner
            .transactions
            .values()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            b.issue_date
                .cmp(&a.issue_date)
                .then_with(|| a.transaction_id.cmp(&b.transaction_id))
        });
        Ok(transactions)
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self.inner.lock().transactions.get(transaction_id).cloned())
    }

    async fn count_transactions(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().transactions.len() as u64)
    }

    async fn import_books(&self, books: &[Book]) -> Result<u64, StoreError> {
        Ok(import(&mut self.inner.lock().books, books, |b| b.book_id.as_str()))
    }

    async fn import_users(&self, users: &[User]) -> Result<u64, StoreError> {
        Ok(import(&mut self.inner.lock().users, users, |u| u.user_id.as_str()))
    }

    async fn import_transactions(&self, transactions: &[Transaction]) -> Result<u64, StoreError> {
        Ok(import(
            &mut self.inner.lock().transactions,
            transactions,
            |t| t.transaction_id.as_str(),
        ))
    }

    async fn issue(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let Collections {
            books,
            users,
            transactions,
        } = &mut *inner;

        let book = books
            .get_mut(&transaction.book_id)
            .ok_or_else(|| StoreError::NotFound(Entity::Book, transaction.book_id.clone()))?;
        if !book.is_available() {
            return Err(StoreError::Unavailable(transaction.book_id.clone()));
        }
        if !users.contains_key(&transaction.user_id) {
            return Err(StoreError::NotFound(Entity::User, transaction.user_id.clone()));
        }
        if transactions.contains_key(&transaction.transaction_id) {
            return Err(StoreError::Duplicate(
                Entity::Transaction,
                transaction.transaction_id.clone(),
            ));
        }

        book.available_copies -= 1;
        transactions.insert(transaction.transaction_id.clone(), transaction.clone());
        Ok(())
    }

    async fn close(
        &self,
        transaction_id: &str,
        returned_at: DateTime<Utc>,
        fine_amount: Decimal,
    ) -> Result<Transaction, StoreError> {
        let mut inner = self.inner.lock();
        let Collections {
            books,
            transactions,
            ..
        } = &mut *inner;

        let transaction = transactions
            .get_mut(transaction_id)
            .ok_or_else(|| StoreError::NotFound(Entity::Transaction, transaction_id.to_string()))?;
        if transaction.status == TransactionStatus::Returned {
            return Err(StoreError::AlreadyReturned(transaction_id.to_string()));
        }

        transaction.status = TransactionStatus::Returned;
        transaction.return_date = Some(returned_at);
        transaction.fine_amount = fine_amount;

        match books.get_mut(&transaction.book_id) {
            Some(book) if book.on_loan() > 0 => {
                book.available_copies += 1;
            }
            Some(book) => {
                warn!(book.id = %book.book_id, "Returned book already has every copy on the shelf");
            }
            None => {
                warn!(book.id = %transaction.book_id, "Returned loan references an unknown book");
            }
        }

        Ok(transaction.clone())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.inner.lock() = Collections::default();
        Ok(())
    }
}
