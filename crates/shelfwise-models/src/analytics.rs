use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelfwise_core::serde::deserialize_optional_usize;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_ANALYTICS_LIMIT: usize = 10;

/// Placeholder used when an overdue loan references a book or patron that
/// no longer resolves.
pub const MISSING_REFERENCE: &str = "N/A";

#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct LimitParams {
    /// Maximum number of rows (default 10)
    #[serde(default, deserialize_with = "deserialize_optional_usize")]
    pub limit: Option<usize>,
}

impl LimitParams {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_ANALYTICS_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_books: u64,
    pub total_users: u64,
    pub total_transactions: u64,
    pub active_loans: u64,
    pub overdue_books: u64,
    /// Sum of fines fixed on returned loans
    #[schema(value_type = f64)]
    pub total_fines: Decimal,
    /// Mean whole-day length of returned loans, one decimal place
    pub avg_borrow_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopBorrower {
    pub user_id: String,
    pub loan_count: u64,
    #[schema(value_type = f64)]
    pub total_fines: Decimal,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopBook {
    pub book_id: String,
    pub borrow_count: u64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenreCount {
    pub genre: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OverdueEntry {
    pub transaction_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub book_id: String,
    pub book_title: String,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub overdue_days: i64,
    /// Fine accrued as of the query instant
    #[schema(value_type = f64)]
    pub fine_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_to_ten() {
        assert_eq!(LimitParams::default().limit(), 10);
        assert_eq!(LimitParams { limit: Some(3) }.limit(), 3);
    }
}
