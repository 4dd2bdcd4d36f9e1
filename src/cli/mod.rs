pub mod generator;

pub use generator::{FakeCounts, generate_books, generate_users, seed_fake};
