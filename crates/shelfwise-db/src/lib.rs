//! # Shelfwise DB
//!
//! Database pool, migrations and library stores for the Shelfwise API.
//!
//! Handlers never talk to PostgreSQL directly. They go through the
//! [`LibraryStore`] trait, which has two implementations:
//!
//! - [`PgLibraryStore`]: PostgreSQL through SQLx, used in production
//! - [`InMemoryLibraryStore`]: a mutex-guarded in-process store, used by tests
//!   and by `STORAGE=memory`
//!
//! Issue and return are single store calls so that each one can apply the
//! transaction write and the availability counter change atomically.
//!
//! # Example
//!
//! ```ignore
//! use shelfwise_db::{PgLibraryStore, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url).await?;
//! run_migrations(&pool).await?;
//! let store = PgLibraryStore::new(pool);
//! ```

pub mod errors;
pub mod memory;
pub mod postgres;
pub mod store;

pub use errors::{Entity, StoreError};
pub use memory::InMemoryLibraryStore;
pub use postgres::PgLibraryStore;
pub use store::LibraryStore;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a PostgreSQL pool.
///
/// Called once during startup; the pool is cheaply cloneable.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
