//! CSV rows to library records.
//!
//! Rows that cannot become a valid record are skipped with a warning; one
//! bad row never fails a whole dataset. A document that is not CSV at all
//! does.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shelfwise_fines::{FinePolicy, parse_timestamp};
use shelfwise_models::books::DEFAULT_SHELF_LOCATION;
use shelfwise_models::users::DEFAULT_DEPARTMENT;
use shelfwise_models::{Book, Transaction, TransactionStatus, User};
use tracing::warn;

use super::errors::SeedError;
use super::source::Collection;

const SEMESTERS: u32 = 8;

#[derive(Debug, Deserialize)]
struct BookRow {
    book_id: String,
    title: String,
    author: String,
    genre: String,
    total_copies: i32,
    available_copies: i32,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    user_id: String,
    name: String,
    email: String,
    phone: String,
}

#[derive(Debug, Deserialize)]
struct TransactionRow {
    transaction_id: String,
    book_id: String,
    user_id: String,
    issue_date: String,
    due_date: String,
    #[serde(default)]
    return_date: Option<String>,
}

fn read_rows<T: DeserializeOwned>(collection: Collection, csv: &str) -> Result<Vec<T>, SeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv.as_bytes());

    // Fail on a header we cannot read at all, skip rows we cannot read.
    reader
        .headers()
        .map_err(|source| SeedError::Csv { collection, source })?;

    Ok(reader
        .deserialize::<T>()
        .enumerate()
        .filter_map(|(line, row)| match row {
            Ok(row) => Some(row),
            Err(e) => {
                warn!(%collection, row = line + 1, error = %e, "Skipping unreadable row");
                None
            }
        })
        .collect())
}

pub fn parse_books(csv: &str) -> Result<Vec<Book>, SeedError> {
    let rows: Vec<BookRow> = read_rows(Collection::Books, csv)?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            Book::new(
                row.book_id,
                row.title,
                row.author,
                row.genre,
                DEFAULT_SHELF_LOCATION,
                row.total_copies,
                row.available_copies,
            )
            .inspect_err(|e| warn!(error = %e, "Skipping invalid book row"))
            .ok()
        })
        .collect())
}

/// Patrons get a department drawn from `departments` and a semester from 1
/// to 8, both at random.
pub fn parse_users(csv: &str, departments: &[String]) -> Result<Vec<User>, SeedError> {
    let rows: Vec<UserRow> = read_rows(Collection::Users, csv)?;
    let mut rng = rand::thread_rng();

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let department = departments
                .choose(&mut rng)
                .map_or(DEFAULT_DEPARTMENT, String::as_str);
            let semester = rng.gen_range(1..=SEMESTERS).to_string();

            User::new(row.user_id, row.name, row.email, row.phone, department, semester)
                .inspect_err(|e| warn!(error = %e, "Skipping invalid user row"))
                .ok()
        })
        .collect())
}

fn parse_loan(row: TransactionRow, policy: &FinePolicy) -> Result<Transaction, String> {
    let issue_date = parse_timestamp(&row.issue_date).map_err(|e| e.to_string())?;
    let due_date = parse_timestamp(&row.due_date).map_err(|e| e.to_string())?;
    let return_date: Option<DateTime<Utc>> = match row.return_date.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Some(parse_timestamp(value).map_err(|e| e.to_string())?),
        _ => None,
    };

    let (status, fine_amount) = match return_date {
        Some(returned) => (TransactionStatus::Returned, policy.fine_between(due_date, returned)),
        None => (TransactionStatus::Issued, rust_decimal::Decimal::ZERO),
    };

    Transaction::from_parts(
        row.transaction_id,
        row.book_id,
        row.user_id,
        issue_date,
        due_date,
        return_date,
        status,
        fine_amount,
    )
    .map_err(|e| e.to_string())
}

/// A loan with a return date is imported as returned with its fine fixed
/// by `policy`; one without is imported as open.
pub fn parse_transactions(csv: &str, policy: &FinePolicy) -> Result<Vec<Transaction>, SeedError> {
    let rows: Vec<TransactionRow> = read_rows(Collection::Transactions, csv)?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let id = row.transaction_id.clone();
            parse_loan(row, policy)
                .inspect_err(|e| warn!(transaction.id = %id, error = %e, "Skipping invalid transaction row"))
                .ok()
        })
        .collect())
}
