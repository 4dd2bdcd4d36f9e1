//! Fake catalog and patron data for local development.
//!
//! Rows are generated in parallel with rayon, then imported through the
//! [`LibraryStore`] the same way the dataset import does.

use std::time::Instant;

use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use shelfwise_db::{LibraryStore, StoreError};
use shelfwise_models::users::DEFAULT_DEPARTMENT;
use shelfwise_models::{Book, ImportSummary, User};

pub const GENRES: [&str; 8] = [
    "Fiction",
    "Science Fiction",
    "Mystery",
    "Biography",
    "History",
    "Technology",
    "Poetry",
    "Self-Help",
];

const SHELF_ROWS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

#[derive(Debug, Clone, Copy)]
pub struct FakeCounts {
    pub books: usize,
    pub users: usize,
}

impl Default for FakeCounts {
    fn default() -> Self {
        Self {
            books: 50,
            users: 100,
        }
    }
}

fn title_case(words: Vec<String>) -> String {
    words
        .into_iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn generate_books(count: usize) -> Vec<Book> {
    (0..count)
        .into_par_iter()
        .filter_map(|i| {
            let title = title_case(Words(2..5).fake());
            let author: String = Name().fake();
            let genre = GENRES[(0..GENRES.len()).fake::<usize>()];
            let shelf = format!(
                "{}{}",
                SHELF_ROWS[(0..SHELF_ROWS.len()).fake::<usize>()],
                (1..10).fake::<u8>()
            );
            let total: i32 = (1..6).fake();

            Book::new(format!("FB{:04}", i + 1), title, author, genre, shelf, total, total).ok()
        })
        .collect()
}

/// Patrons spread over `departments`, or the default department when none
/// are given.
pub fn generate_users(count: usize, departments: &[String]) -> Vec<User> {
    (0..count)
        .into_par_iter()
        .filter_map(|i| {
            let name: String = Name().fake();
            let email: String = SafeEmail().fake();
            let phone: String = PhoneNumber().fake();
            let department = if departments.is_empty() {
                DEFAULT_DEPARTMENT
            } else {
                departments[(0..departments.len()).fake::<usize>()].as_str()
            };
            let semester = (1..9).fake::<u8>().to_string();

            User::new(format!("FU{:04}", i + 1), name, email, phone, department, semester).ok()
        })
        .collect()
}

/// Fills empty collections with generated rows. A collection that already
/// holds data is left alone.
pub async fn seed_fake(
    store: &dyn LibraryStore,
    counts: FakeCounts,
    departments: &[String],
) -> Result<ImportSummary, StoreError> {
    let start = Instant::now();
    let mut summary = ImportSummary::default();

    if store.count_books().await? == 0 {
        let books = generate_books(counts.books);
        summary.books = store.import_books(&books).await?;
    }

    if store.count_users().await? == 0 {
        let users = generate_users(counts.users, departments);
        summary.users = store.import_users(&users).await?;
    }

    tracing::info!(
        books = summary.books,
        users = summary.users,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Fake data seeded"
    );
    Ok(summary)
}
