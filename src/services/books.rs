//! Book management service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery},
        page::Pagination,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new book. The ISBN must not already be in the catalog; the
    /// existence check is the fast path, the UNIQUE constraint is the
    /// guarantee under concurrency.
    pub async fn create(&self, title: &str, author: &str, isbn: &str) -> AppResult<Book> {
        if self.repository.books.exists_by_isbn(isbn).await? {
            return Err(AppError::BusinessRule("Isbn já cadastrado.".to_string()));
        }
        self.repository.books.create(title, author, isbn).await
    }

    /// Book by id; absence is `None`, the caller decides the failure.
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        self.repository.books.get_by_id(id).await
    }

    /// Book by ISBN; absence is `None`.
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        self.repository.books.get_by_isbn(isbn).await
    }

    /// Filtered, paginated book listing.
    pub async fn find(
        &self,
        query: &BookQuery,
        page: &Pagination,
    ) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query, page).await
    }

    /// Persist title/author of an already stored book. The ISBN is not
    /// changed by this path.
    pub async fn update(&self, book: &Book) -> AppResult<Book> {
        let id = require_id(book)?;
        self.repository
            .books
            .update(id, &book.title, &book.author)
            .await
    }

    /// Remove a persisted book.
    pub async fn delete(&self, book: &Book) -> AppResult<()> {
        let id = require_id(book)?;
        self.repository.books.delete(id).await
    }
}

/// Mutations require a persisted book; the store is never reached when the
/// id is absent.
fn require_id(book: &Book) -> AppResult<i32> {
    book.id
        .ok_or_else(|| AppError::InvalidArgument("Id do livro não pode ser nulo.".to_string()))
}
