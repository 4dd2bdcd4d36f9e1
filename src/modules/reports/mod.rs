pub mod controller;
pub mod router;
pub mod service;
pub mod workbook;

pub use router::init_reports_router;
pub use service::ReportService;
