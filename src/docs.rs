use utoipa::OpenApi;

use shelfwise_core::errors::{ErrorKind, ErrorResponse};
use shelfwise_fines::{FinePolicy, FineTier};
use shelfwise_models::{
    Book, BookFilterParams, CreateBookDto, CreateUserDto, DashboardStats, DepartmentsResponse,
    FineAssessment, FineAssessmentParams, GenreCount, GenresResponse, ImportSummary,
    InitDataResponse, IssueBookDto, IssueResponse, LimitParams, MessageResponse, OverdueEntry,
    ReportResponse, ReturnBookDto, ReturnResponse, TopBook, TopBorrower, Transaction,
    TransactionFilterParams, TransactionStatus, UpdateBookDto, User, UserFilterParams,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::root::root,
        crate::modules::books::controller::get_books,
        crate::modules::books::controller::create_book,
        crate::modules::books::controller::update_book,
        crate::modules::books::controller::get_genres,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_departments,
        crate::modules::transactions::controller::get_transactions,
        crate::modules::transactions::controller::issue_book,
        crate::modules::transactions::controller::return_book,
        crate::modules::analytics::controller::get_dashboard_stats,
        crate::modules::analytics::controller::get_top_borrowers,
        crate::modules::analytics::controller::get_top_books,
        crate::modules::analytics::controller::get_genre_distribution,
        crate::modules::analytics::controller::get_overdue_list,
        crate::modules::fines::controller::get_fine_policy,
        crate::modules::fines::controller::assess_fine,
        crate::modules::reports::controller::generate_report,
        crate::modules::seed::controller::init_data,
    ),
    components(
        schemas(
            Book,
            CreateBookDto,
            UpdateBookDto,
            BookFilterParams,
            GenresResponse,
            User,
            CreateUserDto,
            UserFilterParams,
            DepartmentsResponse,
            Transaction,
            TransactionStatus,
            TransactionFilterParams,
            IssueBookDto,
            IssueResponse,
            ReturnBookDto,
            ReturnResponse,
            DashboardStats,
            TopBorrower,
            TopBook,
            GenreCount,
            OverdueEntry,
            LimitParams,
            FinePolicy,
            FineTier,
            FineAssessment,
            FineAssessmentParams,
            ReportResponse,
            ImportSummary,
            InitDataResponse,
            MessageResponse,
            ErrorResponse,
            ErrorKind,
        )
    ),
    tags(
        (name = "Root", description = "Service banner"),
        (name = "Books", description = "Catalog management"),
        (name = "Users", description = "Patron registry"),
        (name = "Transactions", description = "Issuing and returning books"),
        (name = "Analytics", description = "Dashboard figures, rankings and the overdue list"),
        (name = "Fines", description = "Late fee policy and assessment"),
        (name = "Reports", description = "Spreadsheet export"),
        (name = "Seed", description = "Dataset import")
    ),
    info(
        title = "Shelfwise API",
        version = "0.1.0",
        description = "Library circulation tracking built with Rust, Axum, and PostgreSQL: catalog, patrons, loans, tiered late fees and reporting.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/books",
            "/api/books/{id}",
            "/api/transactions/issue",
            "/api/transactions/return",
            "/api/analytics/overdue-list",
            "/api/reports/generate",
            "/api/init-data",
            "/api/fines/policy",
            "/api/fines/assess",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
