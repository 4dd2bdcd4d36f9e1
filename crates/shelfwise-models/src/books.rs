//! Catalog records and DTOs.

use serde::{Deserialize, Serialize};
use shelfwise_core::serde::deserialize_optional_string;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::errors::{ModelError, require};

pub const DEFAULT_SHELF_LOCATION: &str = "A1";

fn default_shelf_location() -> String {
    DEFAULT_SHELF_LOCATION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub shelf_location: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl Book {
    pub fn new(
        book_id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        shelf_location: impl Into<String>,
        total_copies: i32,
        available_copies: i32,
    ) -> Result<Self, ModelError> {
        let book = Self {
            book_id: book_id.into(),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            shelf_location: shelf_location.into(),
            total_copies,
            available_copies,
        };

        require(&book.book_id, "book_id")?;
        require(&book.title, "title")?;
        if total_copies < 0 || available_copies < 0 || available_copies > total_copies {
            return Err(ModelError::InvalidCopies {
                available: available_copies,
                total: total_copies,
            });
        }

        Ok(book)
    }

    /// Copies currently out on loan.
    pub fn on_loan(&self) -> i32 {
        self.total_copies - self.available_copies
    }

    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.author.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_copy_counts"))]
pub struct CreateBookDto {
    #[validate(length(min = 1, max = 64))]
    pub book_id: String,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub author: String,
    #[validate(length(min = 1, max = 100))]
    pub genre: String,
    #[serde(default = "default_shelf_location")]
    #[validate(length(min = 1, max = 32))]
    pub shelf_location: String,
    #[validate(range(min = 0))]
    pub total_copies: i32,
    #[validate(range(min = 0))]
    pub available_copies: i32,
}

fn validate_copy_counts(dto: &CreateBookDto) -> Result<(), ValidationError> {
    if dto.available_copies > dto.total_copies {
        let mut error = ValidationError::new("copies");
        error.message = Some("available_copies cannot exceed total_copies".into());
        return Err(error);
    }
    Ok(())
}

impl TryFrom<CreateBookDto> for Book {
    type Error = ModelError;

    fn try_from(dto: CreateBookDto) -> Result<Self, Self::Error> {
        Book::new(
            dto.book_id.trim(),
            dto.title,
            dto.author,
            dto.genre,
            dto.shelf_location,
            dto.total_copies,
            dto.available_copies,
        )
    }
}

/// Catalog fields that may change after a book is created. Copy counters are
/// owned by the loan lifecycle and cannot be edited directly.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateBookDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub author: String,
    #[validate(length(min = 1, max = 100))]
    pub genre: String,
    #[serde(default = "default_shelf_location")]
    #[validate(length(min = 1, max = 32))]
    pub shelf_location: String,
}

impl UpdateBookDto {
    pub fn apply_to(self, book: &mut Book) {
        book.title = self.title;
        book.author = self.author;
        book.genre = self.genre;
        book.shelf_location = self.shelf_location;
    }
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct BookFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub genre: Option<String>,
    /// Case-insensitive match on title or author
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
}

impl BookFilterParams {
    pub fn matches(&self, book: &Book) -> bool {
        self.genre.as_ref().is_none_or(|genre| &book.genre == genre)
            && self
                .search
                .as_ref()
                .is_none_or(|needle| book.matches_search(needle))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenresResponse {
    pub genres: Vec<String>,
}
