//! Loan records and lifecycle DTOs.
//!
//! A [`Transaction`] is born `issued` and may move to `returned` exactly once.
//! While a loan is `issued` its `fine_amount` is not authoritative; read
//! paths replace it with the fine accrued so far.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelfwise_core::serde::deserialize_optional_string;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ModelError, require};

pub const DEFAULT_BORROW_DAYS: u32 = 7;

fn default_borrow_days() -> u32 {
    DEFAULT_BORROW_DAYS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Issued,
    Returned,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Issued => "issued",
            TransactionStatus::Returned => "returned",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "issued" => Ok(TransactionStatus::Issued),
            "returned" => Ok(TransactionStatus::Returned),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub transaction_id: String,
    pub book_id: String,
    pub user_id: String,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
    #[schema(value_type = f64)]
    pub fine_amount: Decimal,
}

/// `T<unix millis>-<8 hex chars>`; unique even for loans issued in the same
/// millisecond.
pub fn generate_transaction_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("T{}-{}", now.timestamp_millis(), &suffix[..8])
}

impl Transaction {
    /// A fresh loan, due `borrow_days` after `issued_at`.
    pub fn issue(
        transaction_id: impl Into<String>,
        book_id: impl Into<String>,
        user_id: impl Into<String>,
        issued_at: DateTime<Utc>,
        borrow_days: u32,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            book_id: book_id.into(),
            user_id: user_id.into(),
            issue_date: issued_at,
            due_date: issued_at + Duration::days(i64::from(borrow_days)),
            return_date: None,
            status: TransactionStatus::Issued,
            fine_amount: Decimal::ZERO,
        }
    }

    /// Rebuilds a stored or imported record, checking that status, return
    /// date and fine agree with each other.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        transaction_id: String,
        book_id: String,
        user_id: String,
        issue_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
        return_date: Option<DateTime<Utc>>,
        status: TransactionStatus,
        fine_amount: Decimal,
    ) -> Result<Self, ModelError> {
        require(&transaction_id, "transaction_id")?;
        require(&book_id, "book_id")?;
        require(&user_id, "user_id")?;

        match (status, return_date) {
            (TransactionStatus::Returned, None) => {
                return Err(ModelError::MissingReturnDate(transaction_id));
            }
            (TransactionStatus::Issued, Some(_)) => {
                return Err(ModelError::UnexpectedReturnDate(transaction_id));
            }
            _ => {}
        }

        if fine_amount.is_sign_negative() {
            return Err(ModelError::NegativeFine(transaction_id));
        }

        Ok(Self {
            transaction_id,
            book_id,
            user_id,
            issue_date,
            due_date,
            return_date,
            status,
            fine_amount,
        })
    }

    pub fn is_open(&self) -> bool {
        self.status == TransactionStatus::Issued
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && now > self.due_date
    }

    /// Whole days the loan lasted, for returned loans.
    pub fn borrow_duration_days(&self) -> Option<i64> {
        self.return_date
            .map(|returned| (returned - self.issue_date).num_days())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct IssueBookDto {
    #[validate(length(min = 1))]
    pub book_id: String,
    #[validate(length(min = 1))]
    pub user_id: String,
    #[serde(default = "default_borrow_days")]
    #[validate(range(min = 1, max = 365))]
    pub borrow_days: u32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReturnBookDto {
    #[validate(length(min = 1))]
    pub transaction_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IssueResponse {
    pub message: String,
    pub transaction_id: String,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnResponse {
    pub message: String,
    #[schema(value_type = f64)]
    pub fine_amount: Decimal,
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct TransactionFilterParams {
    pub status: Option<TransactionStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub user_id: Option<String>,
}

impl TransactionFilterParams {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.status.is_none_or(|status| transaction.status == status)
            && self
                .user_id
                .as_ref()
                .is_none_or(|user_id| &transaction.user_id == user_id)
    }
}
