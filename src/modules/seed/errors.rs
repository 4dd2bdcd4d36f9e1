use thiserror::Error;

use super::source::Collection;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to fetch {collection} dataset: {source}")]
    Fetch {
        collection: Collection,
        #[source]
        source: reqwest::Error,
    },

    #[error("no {0} dataset available")]
    Missing(Collection),

    #[error("malformed {collection} dataset: {source}")]
    Csv {
        collection: Collection,
        #[source]
        source: csv::Error,
    },
}
