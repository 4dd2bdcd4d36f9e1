//! PostgreSQL [`LibraryStore`].
//!
//! Issue and return each run inside one SQL transaction. The availability
//! check and the decrement are a single conditional `UPDATE`, so two issues
//! racing for the last copy cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shelfwise_models::{
    Book, BookFilterParams, ModelError, Transaction, TransactionFilterParams, TransactionStatus,
    UpdateBookDto, User, UserFilterParams,
};
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, instrument, warn};

use crate::errors::{Entity, StoreError};
use crate::store::LibraryStore;

const BOOK_COLUMNS: &str =
    "book_id, title, author, genre, shelf_location, total_copies, available_copies";
const USER_COLUMNS: &str = "user_id, name, email, phone, department, semester";
const TRANSACTION_COLUMNS: &str =
    "transaction_id, book_id, user_id, issue_date, due_date, return_date, status, fine_amount";

#[derive(Debug, FromRow)]
struct TransactionRow {
    transaction_id: String,
    book_id: String,
    user_id: String,
    issue_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    return_date: Option<DateTime<Utc>>,
    status: String,
    fine_amount: Decimal,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = ModelError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<TransactionStatus>()?;
        Transaction::from_parts(
            row.transaction_id,
            row.book_id,
            row.user_id,
            row.issue_date,
            row.due_date,
            row.return_date,
            status,
            row.fine_amount,
        )
    }
}

fn into_transactions(rows: Vec<TransactionRow>) -> Result<Vec<Transaction>, StoreError> {
    rows.into_iter()
        .map(|row| Transaction::try_from(row).map_err(StoreError::from))
        .collect()
}

fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[derive(Debug, Clone)]
pub struct PgLibraryStore {
    pool: PgPool,
}

impl PgLibraryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn count(&self, table: &'static str) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl LibraryStore for PgLibraryStore {
    #[instrument(skip(self, filter), fields(db.operation = "SELECT", db.table = "books"))]
    async fn list_books(&self, filter: &BookFilterParams) -> Result<Vec<Book>, StoreError> {
        let mut sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE 1=1");
        let mut params = Vec::new();

        if let Some(genre) = &filter.genre {
            params.push(genre.clone());
            sql.push_str(&format!(" AND genre = ${}", params.len()));
        }
        if let Some(search) = &filter.search {
            params.push(like_pattern(search));
            let n = params.len();
            sql.push_str(&format!(" AND (title ILIKE ${n} OR author ILIKE ${n})"));
        }
        sql.push_str(" ORDER BY title, book_id");

        let mut query = sqlx::query_as::<_, Book>(&sql);
        for param in params {
            query = query.bind(param);
        }
        let books = query.fetch_all(&self.pool).await.map_err(|e| {
            error!(error = %e, "Database error listing books");
            StoreError::from(e)
        })?;

        debug!(returned = books.len(), "Books fetched");
        Ok(books)
    }

    async fn get_book(&self, book_id: &str) -> Result<Option<Book>, StoreError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE book_id = $1");
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    #[instrument(skip(self, book), fields(book.id = %book.book_id, db.operation = "INSERT", db.table = "books"))]
    async fn insert_book(&self, book: &Book) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO books (book_id, title, author, genre, shelf_location, total_copies, available_copies)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&book.book_id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(&book.shelf_location)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::on_insert(e, Entity::Book, &book.book_id))?;
        Ok(())
    }

    #[instrument(skip(self, update), fields(db.operation = "UPDATE", db.table = "books"))]
    async fn update_book(&self, book_id: &str, update: UpdateBookDto) -> Result<Book, StoreError> {
        let sql = format!(
            "UPDATE books SET title = $2, author = $3, genre = $4, shelf_location = $5
             WHERE book_id = $1
             RETURNING {BOOK_COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&sql)
            .bind(book_id)
            .bind(&update.title)
            .bind(&update.author)
            .bind(&update.genre)
            .bind(&update.shelf_location)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(Entity::Book, book_id.to_string()))
    }

    async fn genres(&self) -> Result<Vec<String>, StoreError> {
        Ok(
            sqlx::query_scalar("SELECT DISTINCT genre FROM books ORDER BY genre")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn count_books(&self) -> Result<u64, StoreError> {
        self.count("books").await
    }

    #[instrument(skip(self, filter), fields(db.operation = "SELECT", db.table = "users"))]
    async fn list_users(&self, filter: &UserFilterParams) -> Result<Vec<User>, StoreError> {
        let mut sql = format!("SELECT {USER_COLUMNS} FROM users WHERE 1=1");
        let mut params = Vec::new();

        if let Some(department) = &filter.department {
            params.push(department.clone());
            sql.push_str(&format!(" AND department = ${}", params.len()));
        }
        if let Some(search) = &filter.search {
            params.push(like_pattern(search));
            let n = params.len();
            sql.push_str(&format!(" AND (name ILIKE ${n} OR email ILIKE ${n})"));
        }
        sql.push_str(" ORDER BY name, user_id");

        let mut query = sqlx::query_as::<_, User>(&sql);
        for param in params {
            query = query.bind(param);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    #[instrument(skip(self, user), fields(user.id = %user.user_id, db.operation = "INSERT", db.table = "users"))]
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (user_id, name, email, phone, department, semester)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.department)
        .bind(&user.semester)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::on_insert(e, Entity::User, &user.user_id))?;
        Ok(())
    }

    async fn departments(&self) -> Result<Vec<String>, StoreError> {
        Ok(
            sqlx::query_scalar("SELECT DISTINCT department FROM users ORDER BY department")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        self.count("users").await
    }

    #[instrument(skip(self, filter), fields(db.operation = "SELECT", db.table = "transactions"))]
    async fn list_transactions(
        &self,
        filter: &TransactionFilterParams,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE 1=1");
        let mut params = Vec::new();

        if let Some(status) = filter.status {
            params.push(status.as_str().to_string());
            sql.push_str(&format!(" AND status = ${}", params.len()));
        }
        if let Some(user_id) = &filter.user_id {
            params.push(user_id.clone());
            sql.push_str(&format!(" AND user_id = ${}", params.len()));
        }
        sql.push_str(" ORDER BY issue_date DESC, transaction_id");

        let mut query = sqlx::query_as::<_, TransactionRow>(&sql);
        for param in params {
            query = query.bind(param);
        }
        into_transactions(query.fetch_all(&self.pool).await?)
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE transaction_id = $1");
        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Transaction::try_from).transpose()?)
    }

    async fn count_transactions(&self) -> Result<u64, StoreError> {
        self.count("transactions").await
    }

    #[instrument(skip(self, books), fields(rows = books.len(), db.table = "books"))]
    async fn import_books(&self, books: &[Book]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for book in books {
            written += sqlx::query(
                "INSERT INTO books (book_id, title, author, genre, shelf_location, total_copies, available_copies)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (book_id) DO NOTHING",
            )
            .bind(&book.book_id)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.genre)
            .bind(&book.shelf_location)
            .bind(book.total_copies)
            .bind(book.available_copies)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    #[instrument(skip(self, users), fields(rows = users.len(), db.table = "users"))]
    async fn import_users(&self, users: &[User]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for user in users {
            written += sqlx::query(
                "INSERT INTO users (user_id, name, email, phone, department, semester)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (user_id) DO NOTHING",
            )
            .bind(&user.user_id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.department)
            .bind(&user.semester)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    #[instrument(skip(self, transactions), fields(rows = transactions.len(), db.table = "transactions"))]
    async fn import_transactions(&self, transactions: &[Transaction]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for loan in transactions {
            written += sqlx::query(
                "INSERT INTO transactions
                    (transaction_id, book_id, user_id, issue_date, due_date, return_date, status, fine_amount)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT (transaction_id) DO NOTHING",
            )
            .bind(&loan.transaction_id)
            .bind(&loan.book_id)
            .bind(&loan.user_id)
            .bind(loan.issue_date)
            .bind(loan.due_date)
            .bind(loan.return_date)
            .bind(loan.status.as_str())
            .bind(loan.fine_amount)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    #[instrument(
        skip(self, transaction),
        fields(
            transaction.id = %transaction.transaction_id,
            book.id = %transaction.book_id,
            user.id = %transaction.user_id,
            db.operation = "ISSUE"
        )
    )]
    async fn issue(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let decremented = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1
             WHERE book_id = $1 AND available_copies > 0",
        )
        .bind(&transaction.book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if decremented == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE book_id = $1)")
                    .bind(&transaction.book_id)
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return Err(if exists {
                StoreError::Unavailable(transaction.book_id.clone())
            } else {
                StoreError::NotFound(Entity::Book, transaction.book_id.clone())
            });
        }

        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                .bind(&transaction.user_id)
                .fetch_one(&mut *tx)
                .await?;
        if !user_exists {
            tx.rollback().await?;
            return Err(StoreError::NotFound(
                Entity::User,
                transaction.user_id.clone(),
            ));
        }

        sqlx::query(
            "INSERT INTO transactions
                (transaction_id, book_id, user_id, issue_date, due_date, return_date, status, fine_amount)
             VALUES ($1, $2, $3, $4, $5, NULL, $6, $7)",
        )
        .bind(&transaction.transaction_id)
        .bind(&transaction.book_id)
        .bind(&transaction.user_id)
        .bind(transaction.issue_date)
        .bind(transaction.due_date)
        .bind(transaction.status.as_str())
        .bind(transaction.fine_amount)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::on_insert(e, Entity::Transaction, &transaction.transaction_id))?;

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self), fields(db.operation = "RETURN"))]
    async fn close(
        &self,
        transaction_id: &str,
        returned_at: DateTime<Utc>,
        fine_amount: Decimal,
    ) -> Result<Transaction, StoreError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE transactions
             SET status = 'returned', return_date = $2, fine_amount = $3
             WHERE transaction_id = $1 AND status = 'issued'
             RETURNING {TRANSACTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(transaction_id)
            .bind(returned_at)
            .bind(fine_amount)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM transactions WHERE transaction_id = $1)",
            )
            .bind(transaction_id)
            .fetch_one(&mut *tx)
            .await?;
            tx.rollback().await?;

            return Err(if exists {
                StoreError::AlreadyReturned(transaction_id.to_string())
            } else {
                StoreError::NotFound(Entity::Transaction, transaction_id.to_string())
            });
        };

        let transaction = Transaction::try_from(row)?;

        let restocked = sqlx::query(
            "UPDATE books SET available_copies = available_copies + 1
             WHERE book_id = $1 AND available_copies < total_copies",
        )
        .bind(&transaction.book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if restocked == 0 {
            warn!(
                book.id = %transaction.book_id,
                "Returned loan did not restock a copy (unknown book or shelf already full)"
            );
        }

        tx.commit().await?;
        Ok(transaction)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("TRUNCATE transactions, users, books")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
