//! # Shelfwise Models
//!
//! Domain records and DTOs for the Shelfwise API.
//!
//! Records ([`Book`], [`User`], [`Transaction`]) are fixed-shape and validated
//! when constructed, so a value of one of these types always satisfies the
//! catalog invariants (for example `0 <= available_copies <= total_copies`).
//!
//! # Modules
//!
//! - [`books`]: Catalog records and catalog DTOs
//! - [`users`]: Patron records and patron DTOs
//! - [`transactions`]: Loan records, the loan status and lifecycle DTOs
//! - [`analytics`]: Dashboard and analytics response shapes
//! - [`fines`]: Ad-hoc fine assessment query and response
//! - [`reports`]: Spreadsheet report response
//! - [`seed`]: Dataset import summary

pub mod analytics;
pub mod books;
pub mod errors;
pub mod fines;
pub mod reports;
pub mod seed;
pub mod transactions;
pub mod users;

pub use analytics::{
    DashboardStats, GenreCount, LimitParams, OverdueEntry, TopBook, TopBorrower,
};
pub use books::{Book, BookFilterParams, CreateBookDto, GenresResponse, UpdateBookDto};
pub use errors::ModelError;
pub use fines::{FineAssessment, FineAssessmentParams};
pub use reports::ReportResponse;
pub use seed::{ImportSummary, InitDataResponse};
pub use transactions::{
    IssueBookDto, IssueResponse, ReturnBookDto, ReturnResponse, Transaction,
    TransactionFilterParams, TransactionStatus, generate_transaction_id,
};
pub use users::{CreateUserDto, DepartmentsResponse, User, UserFilterParams};

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
