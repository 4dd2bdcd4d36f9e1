pub mod analytics;
pub mod books;
pub mod fines;
pub mod reports;
pub mod root;
pub mod seed;
pub mod transactions;
pub mod users;
