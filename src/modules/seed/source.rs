use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use shelfwise_config::SeedConfig;
use tracing::{debug, instrument};

use super::errors::SeedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Books,
    Users,
    Transactions,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Users => "users",
            Collection::Transactions => "transactions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where seed datasets come from. Each collection is one CSV document.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, collection: Collection) -> Result<String, SeedError>;
}

/// Downloads the datasets from the URLs in [`SeedConfig`].
pub struct HttpDatasetSource {
    client: reqwest::Client,
    config: SeedConfig,
}

impl HttpDatasetSource {
    pub fn new(config: SeedConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, collection: Collection) -> &str {
        match collection {
            Collection::Books => &self.config.books_url,
            Collection::Users => &self.config.users_url,
            Collection::Transactions => &self.config.transactions_url,
        }
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    #[instrument(skip(self))]
    async fn fetch(&self, collection: Collection) -> Result<String, SeedError> {
        let url = self.url(collection);
        let fetch_err = |source| SeedError::Fetch { collection, source };

        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_err)?
            .text()
            .await
            .map_err(fetch_err)?;

        debug!(%url, bytes = body.len(), "Dataset downloaded");
        Ok(body)
    }
}

/// Fixed in-process datasets. A collection without one reports
/// [`SeedError::Missing`].
#[derive(Debug, Default, Clone)]
pub struct StaticDatasetSource {
    datasets: HashMap<Collection, String>,
}

impl StaticDatasetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collection: Collection, csv: impl Into<String>) -> Self {
        self.datasets.insert(collection, csv.into());
        self
    }
}

#[async_trait]
impl DatasetSource for StaticDatasetSource {
    async fn fetch(&self, collection: Collection) -> Result<String, SeedError> {
        self.datasets
            .get(&collection)
            .cloned()
            .ok_or(SeedError::Missing(collection))
    }
}
