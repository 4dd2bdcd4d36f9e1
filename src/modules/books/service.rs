use anyhow::anyhow;
use shelfwise_core::AppError;
use shelfwise_db::LibraryStore;
use shelfwise_models::{Book, BookFilterParams, CreateBookDto, UpdateBookDto};
use tracing::{debug, info, instrument, warn};

pub struct BookService;

impl BookService {
    #[instrument(skip(store, filters), fields(filter.genre = ?filters.genre, filter.search = ?filters.search))]
    pub async fn list_books(
        store: &dyn LibraryStore,
        filters: BookFilterParams,
    ) -> Result<Vec<Book>, AppError> {
        let books = store.list_books(&filters).await?;
        debug!(returned = books.len(), "Books fetched");
        Ok(books)
    }

    #[instrument(skip(store, dto), fields(book.id = %dto.book_id))]
    pub async fn create_book(store: &dyn LibraryStore, dto: CreateBookDto) -> Result<Book, AppError> {
        let book = Book::try_from(dto).map_err(AppError::unprocessable)?;

        store.insert_book(&book).await.map_err(|e| {
            warn!(book.id = %book.book_id, error = %e, "Book creation rejected");
            AppError::from(e)
        })?;

        info!(book.id = %book.book_id, book.title = %book.title, "Book created");
        Ok(book)
    }

    #[instrument(skip(store, dto))]
    pub async fn update_book(
        store: &dyn LibraryStore,
        book_id: &str,
        dto: UpdateBookDto,
    ) -> Result<Book, AppError> {
        if book_id.trim().is_empty() {
            return Err(AppError::bad_request(anyhow!("Book ID is required")));
        }

        let book = store.update_book(book_id, dto).await?;
        info!(book.id = %book.book_id, "Book updated");
        Ok(book)
    }

    pub async fn genres(store: &dyn LibraryStore) -> Result<Vec<String>, AppError> {
        Ok(store.genres().await?)
    }
}
