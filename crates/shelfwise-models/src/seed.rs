use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rows imported per collection. A collection that already held data, or
/// whose dataset could not be fetched, reports zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    pub books: u64,
    pub users: u64,
    pub transactions: u64,
}

impl ImportSummary {
    pub fn total(&self) -> u64 {
        self.books + self.users + self.transactions
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InitDataResponse {
    pub message: String,
    pub imported: ImportSummary,
}
