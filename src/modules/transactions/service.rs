//! Loan lifecycle: issue and return.
//!
//! ```text
//!            issue                      return
//!   (none) --------> issued ---------------------> returned
//!            copies - 1          fine fixed, copies + 1
//! ```
//!
//! Both transitions are a single [`LibraryStore`] call, so the loan record
//! and the book's availability counter change together or not at all.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shelfwise_core::{AppError, Clock};
use shelfwise_db::{LibraryStore, StoreError};
use shelfwise_fines::FinePolicy;
use shelfwise_models::{Transaction, TransactionFilterParams, generate_transaction_id};
use tracing::{info, instrument, warn};

use crate::metrics;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedLoan {
    pub transaction_id: String,
    pub due_date: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn LibraryStore>,
    clock: Arc<dyn Clock>,
    policy: Arc<FinePolicy>,
}

fn rejection_reason(err: &StoreError) -> Option<&'static str> {
    match err {
        StoreError::Unavailable(_) => Some("unavailable"),
        StoreError::NotFound(..) => Some("not_found"),
        StoreError::AlreadyReturned(_) => Some("already_returned"),
        _ => None,
    }
}

impl TransactionService {
    pub fn new(store: Arc<dyn LibraryStore>, clock: Arc<dyn Clock>, policy: Arc<FinePolicy>) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    /// Lends one copy of `book_id` to `user_id` for `borrow_days` days.
    #[instrument(skip(self))]
    pub async fn issue(
        &self,
        book_id: &str,
        user_id: &str,
        borrow_days: u32,
    ) -> Result<IssuedLoan, AppError> {
        let now = self.clock.now();
        let loan = Transaction::issue(
            generate_transaction_id(now),
            book_id,
            user_id,
            now,
            borrow_days,
        );

        if let Err(e) = self.store.issue(&loan).await {
            if let Some(reason) = rejection_reason(&e) {
                warn!(book.id = %book_id, user.id = %user_id, reason, "Issue rejected");
                metrics::track_loan_rejected(reason);
            }
            return Err(e.into());
        }

        metrics::track_loan_issued();
        info!(
            transaction.id = %loan.transaction_id,
            book.id = %book_id,
            user.id = %user_id,
            due_date = %loan.due_date,
            "Book issued"
        );

        Ok(IssuedLoan {
            transaction_id: loan.transaction_id,
            due_date: loan.due_date,
        })
    }

    /// Closes a loan as of now and returns the fine it was charged.
    #[instrument(skip(self))]
    pub async fn return_book(&self, transaction_id: &str) -> Result<Decimal, AppError> {
        let loan = self
            .store
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| {
                metrics::track_loan_rejected("not_found");
                AppError::from(StoreError::NotFound(
                    shelfwise_db::Entity::Transaction,
                    transaction_id.to_string(),
                ))
            })?;

        let returned_at = self.clock.now();
        let fine = self.policy.fine_between(loan.due_date, returned_at);

        // The store re-checks the status atomically, so a concurrent return
        // between the read above and this call still fails with a conflict.
        let closed = match self.store.close(transaction_id, returned_at, fine).await {
            Ok(closed) => closed,
            Err(e) => {
                if let Some(reason) = rejection_reason(&e) {
                    warn!(transaction.id = %transaction_id, reason, "Return rejected");
                    metrics::track_loan_rejected(reason);
                }
                return Err(e.into());
            }
        };

        metrics::track_loan_returned(closed.fine_amount);
        info!(
            transaction.id = %transaction_id,
            book.id = %closed.book_id,
            fine = %closed.fine_amount,
            "Book returned"
        );

        Ok(closed.fine_amount)
    }

    /// Loans matching the filters. Open loans carry the fine accrued so far
    /// instead of the stored placeholder.
    #[instrument(skip(self, filters), fields(filter.status = ?filters.status, filter.user_id = ?filters.user_id))]
    pub async fn list(&self, filters: TransactionFilterParams) -> Result<Vec<Transaction>, AppError> {
        let mut loans = self.store.list_transactions(&filters).await?;
        let now = self.clock.now();

        for loan in loans.iter_mut().filter(|loan| loan.is_open()) {
            loan.fine_amount = self.policy.fine_between(loan.due_date, now);
        }

        Ok(loans)
    }
}
