use std::fmt;

use anyhow::anyhow;
use shelfwise_core::AppError;
use shelfwise_models::ModelError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Book,
    User,
    Transaction,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Book => "Book",
            Entity::User => "User",
            Entity::Transaction => "Transaction",
        })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found: {1}")]
    NotFound(Entity, String),

    #[error("{0} ID already exists: {1}")]
    Duplicate(Entity, String),

    #[error("Book not available: {0}")]
    Unavailable(String),

    #[error("Book already returned: {0}")]
    AlreadyReturned(String),

    #[error("Stored record is invalid: {0}")]
    Invalid(#[from] ModelError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps a unique-key violation on insert to [`StoreError::Duplicate`].
    pub(crate) fn on_insert(err: sqlx::Error, entity: Entity, id: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return StoreError::Duplicate(entity, id.to_string());
        }
        StoreError::Database(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity, _) => AppError::not_found(anyhow!("{entity} not found")),
            StoreError::Duplicate(entity, _) => {
                AppError::conflict(anyhow!("{entity} ID already exists"))
            }
            StoreError::Unavailable(_) => AppError::unavailable(anyhow!("Book not available")),
            StoreError::AlreadyReturned(_) => AppError::conflict(anyhow!("Book already returned")),
            StoreError::Invalid(e) => AppError::internal(e),
            StoreError::Database(e) => AppError::internal(e),
        }
    }
}
