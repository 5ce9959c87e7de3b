//! Books repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery},
        page::Pagination,
    },
};

use super::is_constraint_violation;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new book and return it with its assigned id.
    ///
    /// The UNIQUE constraint on isbn closes the check-then-insert race: a
    /// concurrent duplicate surfaces here as the same business error the
    /// service-level fast path produces.
    pub async fn create(&self, title: &str, author: &str, isbn: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_constraint_violation(&e, "23505") {
                AppError::BusinessRule("Isbn já cadastrado.".to_string())
            } else {
                AppError::from(e)
            }
        })
    }

    /// Get book by ID, `None` when absent.
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    /// Get book by ISBN, `None` when absent.
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn FROM books WHERE isbn = $1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    pub async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Search books with pagination. Present filter fields match as
    /// case-insensitive substrings.
    pub async fn search(
        &self,
        query: &BookQuery,
        page: &Pagination,
    ) -> AppResult<(Vec<Book>, i64)> {
        let push_filters = |qb: &mut QueryBuilder<Postgres>| {
            if let Some(ref title) = query.title {
                qb.push(" AND title ILIKE ")
                    .push_bind(format!("%{}%", title));
            }
            if let Some(ref author) = query.author {
                qb.push(" AND author ILIKE ")
                    .push_bind(format!("%{}%", author));
            }
            if let Some(ref isbn) = query.isbn {
                qb.push(" AND isbn ILIKE ").push_bind(format!("%{}%", isbn));
            }
        };

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM books WHERE 1=1");
        push_filters(&mut count_qb);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select_qb =
            QueryBuilder::new("SELECT id, title, author, isbn FROM books WHERE 1=1");
        push_filters(&mut select_qb);
        select_qb
            .push(" ORDER BY id LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let books = select_qb
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Update title and author of a persisted book.
    pub async fn update(&self, id: i32, title: &str, author: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author = $2
            WHERE id = $3
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book. The loans foreign key is ON DELETE RESTRICT, so a book
    /// with loan history cannot be removed.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_constraint_violation(&e, "23503") {
                    AppError::BusinessRule("Livro possui empréstimos registrados.".to_string())
                } else {
                    AppError::from(e)
                }
            })?;
        Ok(())
    }
}
