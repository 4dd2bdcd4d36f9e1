use std::sync::Arc;

use shelfwise_db::{LibraryStore, StoreError};
use shelfwise_fines::FinePolicy;
use shelfwise_models::{Book, ImportSummary, Transaction, User};
use tracing::{info, instrument, warn};

use super::errors::SeedError;
use super::parser::{parse_books, parse_transactions, parse_users};
use super::source::{Collection, DatasetSource};
use crate::metrics;
use crate::state::AppState;

/// One-shot dataset import.
///
/// Each collection is imported only while it is empty, so running the seeder
/// again, or after data was entered by hand, writes nothing. A dataset that
/// cannot be fetched or read leaves its collection as it was and the other
/// collections still import.
pub struct Seeder {
    store: Arc<dyn LibraryStore>,
    source: Arc<dyn DatasetSource>,
    policy: Arc<FinePolicy>,
    departments: Vec<String>,
}

impl Seeder {
    pub fn new(
        store: Arc<dyn LibraryStore>,
        source: Arc<dyn DatasetSource>,
        policy: Arc<FinePolicy>,
        departments: Vec<String>,
    ) -> Self {
        Self {
            store,
            source,
            policy,
            departments,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.store),
            Arc::clone(&state.dataset),
            Arc::clone(&state.fine_policy),
            state.seed_config.departments.clone(),
        )
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<ImportSummary, StoreError> {
        let books = self.import(Collection::Books).await?;
        let users = self.import(Collection::Users).await?;
        let transactions = self.import(Collection::Transactions).await?;

        let summary = ImportSummary {
            books,
            users,
            transactions,
        };
        info!(
            books = summary.books,
            users = summary.users,
            transactions = summary.transactions,
            "Dataset import finished"
        );
        Ok(summary)
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        match collection {
            Collection::Books => self.store.count_books().await,
            Collection::Users => self.store.count_users().await,
            Collection::Transactions => self.store.count_transactions().await,
        }
    }

    async fn import(&self, collection: Collection) -> Result<u64, StoreError> {
        let existing = self.count(collection).await?;
        if existing > 0 {
            info!(%collection, existing, "Collection already populated, skipping import");
            return Ok(0);
        }

        let written = match self.load(collection).await {
            Ok(Rows::Books(rows)) => self.store.import_books(&rows).await?,
            Ok(Rows::Users(rows)) => self.store.import_users(&rows).await?,
            Ok(Rows::Transactions(rows)) => self.store.import_transactions(&rows).await?,
            Err(e) => {
                warn!(%collection, error = %e, "Dataset import skipped");
                return Ok(0);
            }
        };

        metrics::track_seed_rows(collection.as_str(), written);
        info!(%collection, written, "Collection imported");
        Ok(written)
    }

    async fn load(&self, collection: Collection) -> Result<Rows, SeedError> {
        let csv = self.source.fetch(collection).await?;

        Ok(match collection {
            Collection::Books => Rows::Books(parse_books(&csv)?),
            Collection::Users => Rows::Users(parse_users(&csv, &self.departments)?),
            Collection::Transactions => {
                Rows::Transactions(parse_transactions(&csv, &self.policy)?)
            }
        })
    }
}

enum Rows {
    Books(Vec<Book>),
    Users(Vec<User>),
    Transactions(Vec<Transaction>),
}
