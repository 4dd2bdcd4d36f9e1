pub mod aggregate;
pub mod controller;
pub mod overdue;
pub mod router;
pub mod service;

pub use overdue::OverdueQuery;
pub use router::{init_analytics_router, init_dashboard_router};
pub use service::AnalyticsService;
