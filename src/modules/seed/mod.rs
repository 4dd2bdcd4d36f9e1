pub mod controller;
pub mod errors;
pub mod parser;
pub mod router;
pub mod service;
pub mod source;

pub use errors::SeedError;
pub use router::init_seed_router;
pub use service::Seeder;
pub use source::{Collection, DatasetSource, HttpDatasetSource, StaticDatasetSource};
