pub mod controller;
pub mod router;
pub mod service;

pub use router::init_books_router;
pub use service::BookService;
