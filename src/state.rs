use std::sync::Arc;

use anyhow::Context;
use shelfwise_config::{CorsConfig, FineConfig, ReportConfig, SeedConfig, ServerConfig, StorageBackend};
use shelfwise_core::{Clock, SystemClock};
use shelfwise_db::{InMemoryLibraryStore, LibraryStore, PgLibraryStore, init_db_pool, run_migrations};
use shelfwise_fines::FinePolicy;
use tracing::info;

use crate::modules::analytics::OverdueQuery;
use crate::modules::seed::{DatasetSource, HttpDatasetSource};
use crate::modules::transactions::TransactionService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LibraryStore>,
    pub clock: Arc<dyn Clock>,
    pub fine_policy: Arc<FinePolicy>,
    pub dataset: Arc<dyn DatasetSource>,
    pub cors_config: CorsConfig,
    pub seed_config: SeedConfig,
    pub report_config: ReportConfig,
}

impl AppState {
    /// State with default configuration around the given collaborators.
    pub fn new(
        store: Arc<dyn LibraryStore>,
        clock: Arc<dyn Clock>,
        fine_policy: FinePolicy,
        dataset: Arc<dyn DatasetSource>,
    ) -> Self {
        Self {
            store,
            clock,
            fine_policy: Arc::new(fine_policy),
            dataset,
            cors_config: CorsConfig {
                allowed_origins: Vec::new(),
            },
            seed_config: SeedConfig::default(),
            report_config: ReportConfig::default(),
        }
    }

    pub fn transactions(&self) -> TransactionService {
        TransactionService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            Arc::clone(&self.fine_policy),
        )
    }

    pub fn overdue(&self) -> OverdueQuery {
        OverdueQuery::new(
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            Arc::clone(&self.fine_policy),
        )
    }
}

/// Opens the configured store, running migrations for PostgreSQL.
pub async fn init_store(server: &ServerConfig) -> anyhow::Result<Arc<dyn LibraryStore>> {
    match server.storage {
        StorageBackend::Memory => {
            info!("Using in-memory library store");
            Ok(Arc::new(InMemoryLibraryStore::new()))
        }
        StorageBackend::Postgres => {
            let database_url =
                std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
            let pool = init_db_pool(&database_url)
                .await
                .context("Failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Connected to PostgreSQL and applied migrations");
            Ok(Arc::new(PgLibraryStore::new(pool)))
        }
    }
}

pub async fn init_app_state(server: &ServerConfig) -> anyhow::Result<AppState> {
    let fine_policy = FineConfig::from_env()?.into_policy()?;
    let seed_config = SeedConfig::from_env();

    Ok(AppState {
        store: init_store(server).await?,
        clock: Arc::new(SystemClock),
        fine_policy: Arc::new(fine_policy),
        dataset: Arc::new(HttpDatasetSource::new(seed_config.clone())),
        cors_config: CorsConfig::from_env(),
        seed_config,
        report_config: ReportConfig::from_env(),
    })
}
