use shelfwise_core::{AppError, Clock};
use shelfwise_db::LibraryStore;
use shelfwise_models::{
    DashboardStats, GenreCount, TopBook, TopBorrower, TransactionFilterParams,
};
use tracing::instrument;

use super::aggregate::{self, Snapshot};

pub struct AnalyticsService;

impl AnalyticsService {
    async fn snapshot(store: &dyn LibraryStore) -> Result<Snapshot, AppError> {
        Ok(Snapshot::load(store, &TransactionFilterParams::default()).await?)
    }

    #[instrument(skip(store, clock))]
    pub async fn dashboard_stats(
        store: &dyn LibraryStore,
        clock: &dyn Clock,
    ) -> Result<DashboardStats, AppError> {
        let snapshot = Self::snapshot(store).await?;
        Ok(aggregate::dashboard_stats(&snapshot, clock.now()))
    }

    #[instrument(skip(store))]
    pub async fn top_borrowers(
        store: &dyn LibraryStore,
        limit: usize,
    ) -> Result<Vec<TopBorrower>, AppError> {
        let snapshot = Self::snapshot(store).await?;
        Ok(aggregate::top_borrowers(&snapshot, limit))
    }

    #[instrument(skip(store))]
    pub async fn top_books(store: &dyn LibraryStore, limit: usize) -> Result<Vec<TopBook>, AppError> {
        let snapshot = Self::snapshot(store).await?;
        Ok(aggregate::top_books(&snapshot, limit))
    }

    pub async fn genre_distribution(store: &dyn LibraryStore) -> Result<Vec<GenreCount>, AppError> {
        let snapshot = Self::snapshot(store).await?;
        Ok(aggregate::genre_distribution(&snapshot))
    }
}
