//! Grouping and summation over a point-in-time copy of the library.
//!
//! Apart from [`Snapshot::load`] everything here is pure. A response is
//! computed from one snapshot, so its figures always agree with each other.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shelfwise_db::{LibraryStore, StoreError};
use shelfwise_models::analytics::MISSING_REFERENCE;
use shelfwise_models::{
    Book, BookFilterParams, DashboardStats, GenreCount, TopBook, TopBorrower, Transaction,
    TransactionFilterParams, User, UserFilterParams,
};

pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    books: HashMap<String, Book>,
    users: HashMap<String, User>,
}

impl Snapshot {
    pub fn new(books: Vec<Book>, users: Vec<User>, transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            books: books.into_iter().map(|b| (b.book_id.clone(), b)).collect(),
            users: users.into_iter().map(|u| (u.user_id.clone(), u)).collect(),
        }
    }

    /// Reads the whole catalog and patron registry plus the loans matching
    /// `filter`.
    pub async fn load(
        store: &dyn LibraryStore,
        filter: &TransactionFilterParams,
    ) -> Result<Self, StoreError> {
        let transactions = store.list_transactions(filter).await?;
        let books = store.list_books(&BookFilterParams::default()).await?;
        let users = store.list_users(&UserFilterParams::default()).await?;
        Ok(Self::new(books, users, transactions))
    }

    pub fn book(&self, book_id: &str) -> Option<&Book> {
        self.books.get(book_id)
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    pub fn book_count(&self) -> u64 {
        self.books.len() as u64
    }

    pub fn user_count(&self) -> u64 {
        self.users.len() as u64
    }
}

/// Fines summed under one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FineGroup {
    pub label: String,
    pub total_fines: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FineSummary {
    pub total_fines: Decimal,
    pub total_transactions: u64,
    pub average_fine: Decimal,
    pub by_department: Vec<FineGroup>,
    pub by_genre: Vec<FineGroup>,
}

fn stored_fines<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    transactions
        .into_iter()
        .map(|t| t.fine_amount)
        .sum::<Decimal>()
        .round_dp(2)
}

pub fn dashboard_stats(snapshot: &Snapshot, now: DateTime<Utc>) -> DashboardStats {
    let transactions = &snapshot.transactions;

    let active_loans = transactions.iter().filter(|t| t.is_open()).count() as u64;
    let overdue_books = transactions.iter().filter(|t| t.is_overdue_at(now)).count() as u64;

    let durations: Vec<i64> = transactions
        .iter()
        .filter_map(Transaction::borrow_duration_days)
        .collect();
    let avg_borrow_duration = if durations.is_empty() {
        0.0
    } else {
        let mean = durations.iter().sum::<i64>() as f64 / durations.len() as f64;
        (mean * 10.0).round() / 10.0
    };

    DashboardStats {
        total_books: snapshot.book_count(),
        total_users: snapshot.user_count(),
        total_transactions: transactions.len() as u64,
        active_loans,
        overdue_books,
        total_fines: stored_fines(transactions),
        avg_borrow_duration,
    }
}

/// Patrons by number of loans, most first. Ties go to the smaller user id.
pub fn top_borrowers(snapshot: &Snapshot, limit: usize) -> Vec<TopBorrower> {
    let mut grouped: BTreeMap<&str, (u64, Decimal)> = BTreeMap::new();
    for t in &snapshot.transactions {
        let entry = grouped.entry(t.user_id.as_str()).or_default();
        entry.0 += 1;
        entry.1 += t.fine_amount;
    }

    let mut rows: Vec<_> = grouped.into_iter().collect();
    // Stable sort keeps the BTreeMap's id order among equal counts.
    rows.sort_by_key(|(_, (count, _))| Reverse(*count));

    rows.into_iter()
        .take(limit)
        .map(|(user_id, (loan_count, fines))| {
            let user = snapshot.user(user_id);
            TopBorrower {
                user_id: user_id.to_string(),
                loan_count,
                total_fines: fines.round_dp(2),
                name: user.map(|u| u.name.clone()),
                email: user.map(|u| u.email.clone()),
                department: user.map(|u| u.department.clone()),
            }
        })
        .collect()
}

/// Books by number of loans, most first. Ties go to the smaller book id.
pub fn top_books(snapshot: &Snapshot, limit: usize) -> Vec<TopBook> {
    let mut grouped: BTreeMap<&str, u64> = BTreeMap::new();
    for t in &snapshot.transactions {
        *grouped.entry(t.book_id.as_str()).or_default() += 1;
    }

    let mut rows: Vec<_> = grouped.into_iter().collect();
    rows.sort_by_key(|(_, count)| Reverse(*count));

    rows.into_iter()
        .take(limit)
        .map(|(book_id, borrow_count)| {
            let book = snapshot.book(book_id);
            TopBook {
                book_id: book_id.to_string(),
                borrow_count,
                title: book.map(|b| b.title.clone()),
                author: book.map(|b| b.author.clone()),
                genre: book.map(|b| b.genre.clone()),
            }
        })
        .collect()
}

/// Loans per genre, most first. Loans whose book is gone are not counted.
pub fn genre_distribution(snapshot: &Snapshot) -> Vec<GenreCount> {
    let mut grouped: BTreeMap<&str, u64> = BTreeMap::new();
    for t in &snapshot.transactions {
        if let Some(book) = snapshot.book(&t.book_id) {
            *grouped.entry(book.genre.as_str()).or_default() += 1;
        }
    }

    let mut rows: Vec<GenreCount> = grouped
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect();
    rows.sort_by_key(|row| Reverse(row.count));
    rows
}

fn group_fines<'a>(
    transactions: &'a [Transaction],
    label: impl Fn(&'a Transaction) -> Option<&'a str>,
) -> Vec<FineGroup> {
    let mut grouped: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in transactions {
        let key = label(t).unwrap_or(MISSING_REFERENCE);
        *grouped.entry(key).or_default() += t.fine_amount;
    }

    grouped
        .into_iter()
        .map(|(label, total)| FineGroup {
            label: label.to_string(),
            total_fines: total.round_dp(2),
        })
        .collect()
}

/// Stored fines in total, per patron department and per book genre.
/// Groups are ordered by label.
pub fn fine_summary(snapshot: &Snapshot) -> FineSummary {
    let transactions = &snapshot.transactions;
    let total_fines = stored_fines(transactions);
    let total_transactions = transactions.len() as u64;
    let average_fine = if total_transactions == 0 {
        Decimal::ZERO
    } else {
        (total_fines / Decimal::from(total_transactions)).round_dp(2)
    };

    FineSummary {
        total_fines,
        total_transactions,
        average_fine,
        by_department: group_fines(transactions, |t| {
            snapshot.user(&t.user_id).map(|u| u.department.as_str())
        }),
        by_genre: group_fines(transactions, |t| {
            snapshot.book(&t.book_id).map(|b| b.genre.as_str())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shelfwise_models::TransactionStatus;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
    }

    fn returned(id: &str, book: &str, user: &str, issued: u32, back: u32, fine: i64) -> Transaction {
        Transaction::from_parts(
            id.into(),
            book.into(),
            user.into(),
            day(issued),
            day(issued) + Duration::days(7),
            Some(day(back)),
            TransactionStatus::Returned,
            Decimal::from(fine),
        )
        .unwrap()
    }

    fn open(id: &str, book: &str, user: &str, issued: u32) -> Transaction {
        Transaction::issue(id, book, user, day(issued), 7)
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![
                Book::new("B1", "Dune", "Herbert", "SciFi", "A1", 2, 1).unwrap(),
                Book::new("B2", "Emma", "Austen", "Classic", "A2", 1, 1).unwrap(),
            ],
            vec![
                User::new("U1", "Asha", "asha@example.com", "1", "MBA", "2").unwrap(),
                User::new("U2", "Ben", "ben@example.com", "2", "Civil", "4").unwrap(),
            ],
            vec![
                returned("T1", "B1", "U1", 1, 5, 0),
                returned("T2", "B2", "U1", 1, 20, 8),
                returned("T3", "B1", "U2", 2, 4, 0),
                open("T4", "B1", "U1", 10),
                returned("T5", "B9", "U9", 1, 22, 14),
            ],
        )
    }

    #[test]
    fn test_dashboard_counts_and_stored_fines() {
        let stats = dashboard_stats(&snapshot(), day(25));

        assert_eq!(stats.total_books, 2);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_transactions, 5);
        assert_eq!(stats.active_loans, 1);
        assert_eq!(stats.overdue_books, 1);
        assert_eq!(stats.total_fines, Decimal::from(22));
        // (4 + 19 + 2 + 21) / 4
        assert_eq!(stats.avg_borrow_duration, 11.5);
    }

    #[test]
    fn test_dashboard_on_empty_library() {
        let stats = dashboard_stats(&Snapshot::new(vec![], vec![], vec![]), day(1));
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.total_fines, Decimal::ZERO);
        assert_eq!(stats.avg_borrow_duration, 0.0);
    }

    #[test]
    fn test_open_loan_is_not_overdue_before_due_date() {
        let stats = dashboard_stats(&snapshot(), day(17));
        assert_eq!(stats.active_loans, 1);
        assert_eq!(stats.overdue_books, 0);
    }

    #[test]
    fn test_top_borrowers_ranked_and_joined() {
        let rows = top_borrowers(&snapshot(), 10);

        assert_eq!(rows[0].user_id, "U1");
        assert_eq!(rows[0].loan_count, 3);
        assert_eq!(rows[0].total_fines, Decimal::from(8));
        assert_eq!(rows[0].department.as_deref(), Some("MBA"));

        // U2 and U9 tie at one loan; ids break the tie
        assert_eq!(rows[1].user_id, "U2");
        assert_eq!(rows[2].user_id, "U9");
        assert_eq!(rows[2].name, None);

        assert_eq!(top_borrowers(&snapshot(), 1).len(), 1);
    }

    #[test]
    fn test_top_books_ranked() {
        let rows = top_books(&snapshot(), 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].book_id, "B1");
        assert_eq!(rows[0].borrow_count, 3);
        assert_eq!(rows[0].title.as_deref(), Some("Dune"));
        assert_eq!(rows[1].book_id, "B2");
    }

    #[test]
    fn test_genre_distribution_skips_missing_books() {
        let rows = genre_distribution(&snapshot());
        assert_eq!(
            rows,
            vec![
                GenreCount {
                    genre: "SciFi".into(),
                    count: 3
                },
                GenreCount {
                    genre: "Classic".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_fine_summary_groups_missing_references() {
        let summary = fine_summary(&snapshot());

        assert_eq!(summary.total_fines, Decimal::from(22));
        assert_eq!(summary.total_transactions, 5);
        assert_eq!(summary.average_fine, Decimal::new(440, 2));

        let labels: Vec<_> = summary.by_department.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["Civil", "MBA", "N/A"]);
        assert_eq!(summary.by_department[2].total_fines, Decimal::from(14));

        let genre: Vec<_> = summary
            .by_genre
            .iter()
            .map(|g| (g.label.as_str(), g.total_fines))
            .collect();
        assert_eq!(
            genre,
            [
                ("Classic", Decimal::from(8)),
                ("N/A", Decimal::from(14)),
                ("SciFi", Decimal::ZERO)
            ]
        );
    }
}
