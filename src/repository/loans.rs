//! Loans repository for database operations

use chrono::NaiveDate;
use sqlx::{postgres::PgRow, Pool, Postgres, QueryBuilder, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{Loan, LoanDetails, LoanQuery},
        page::Pagination,
    },
};

use super::is_constraint_violation;

/// Columns selected whenever a loan is returned with its book embedded.
const LOAN_WITH_BOOK: &str = r#"
    SELECT l.id, l.customer, l.customer_email, l.loan_date, l.returned,
           b.id as book_id, b.title as book_title,
           b.author as book_author, b.isbn as book_isbn
    FROM loans l
    JOIN books b ON b.id = l.book_id
"#;

fn details_from_row(row: &PgRow) -> LoanDetails {
    LoanDetails {
        id: row.get("id"),
        customer: row.get("customer"),
        customer_email: row.get("customer_email"),
        loan_date: row.get("loan_date"),
        returned: row.get("returned"),
        book: Book {
            id: row.get("book_id"),
            title: row.get("book_title"),
            author: row.get("book_author"),
            isbn: row.get("book_isbn"),
        },
    }
}

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new loan.
    ///
    /// The partial unique index on (book_id) WHERE returned IS NOT TRUE keeps
    /// the at-most-one-active-loan invariant under concurrent creates; a
    /// violation surfaces as the same business error as the fast-path check.
    pub async fn create(
        &self,
        book_id: i32,
        customer: &str,
        customer_email: Option<&str>,
        loan_date: NaiveDate,
    ) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, customer, customer_email, loan_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, customer, customer_email, loan_date, returned
            "#,
        )
        .bind(book_id)
        .bind(customer)
        .bind(customer_email)
        .bind(loan_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_constraint_violation(&e, "23505") {
                AppError::BusinessRule("Livro já emprestado.".to_string())
            } else {
                AppError::from(e)
            }
        })
    }

    /// Get loan by ID, `None` when absent.
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT id, book_id, customer, customer_email, loan_date, returned FROM loans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(loan)
    }

    /// True when an unreturned loan exists for the book.
    pub async fn exists_active_by_book(&self, book_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = $1 AND returned IS NOT TRUE)",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Persist the full loan record as given.
    ///
    /// Reactivating a returned loan (returned back to false) re-enters the
    /// partial unique index; when the book has been loaned again in the
    /// meantime the violation surfaces as the already-loaned business error.
    pub async fn update(&self, loan: &Loan) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET customer = $1, customer_email = $2, loan_date = $3, returned = $4
            WHERE id = $5
            RETURNING id, book_id, customer, customer_email, loan_date, returned
            "#,
        )
        .bind(&loan.customer)
        .bind(&loan.customer_email)
        .bind(loan.loan_date)
        .bind(loan.returned)
        .bind(loan.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_constraint_violation(&e, "23505") {
                AppError::BusinessRule("Livro já emprestado.".to_string())
            } else {
                AppError::from(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan.id)))
    }

    /// Search loans by book ISBN or customer (logical OR), paginated.
    pub async fn search(
        &self,
        query: &LoanQuery,
        page: &Pagination,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        let push_filters = |qb: &mut QueryBuilder<Postgres>| match (&query.isbn, &query.customer)
        {
            (Some(isbn), Some(customer)) => {
                qb.push(" WHERE (b.isbn = ")
                    .push_bind(isbn.clone())
                    .push(" OR l.customer = ")
                    .push_bind(customer.clone())
                    .push(")");
            }
            (Some(isbn), None) => {
                qb.push(" WHERE b.isbn = ").push_bind(isbn.clone());
            }
            (None, Some(customer)) => {
                qb.push(" WHERE l.customer = ").push_bind(customer.clone());
            }
            (None, None) => {}
        };

        let mut count_qb = QueryBuilder::new(
            "SELECT COUNT(*) FROM loans l JOIN books b ON b.id = l.book_id",
        );
        push_filters(&mut count_qb);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select_qb = QueryBuilder::new(LOAN_WITH_BOOK);
        push_filters(&mut select_qb);
        select_qb
            .push(" ORDER BY l.id LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select_qb.build().fetch_all(&self.pool).await?;

        Ok((rows.iter().map(details_from_row).collect(), total))
    }

    /// All loans (any status) for a book, paginated.
    pub async fn by_book(
        &self,
        book_id: i32,
        page: &Pagination,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!(
            "{} WHERE l.book_id = $1 ORDER BY l.id LIMIT $2 OFFSET $3",
            LOAN_WITH_BOOK
        ))
        .bind(book_id)
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.iter().map(details_from_row).collect(), total))
    }

    /// All unreturned loans with a loan date strictly before the cutoff.
    pub async fn late(&self, cutoff: NaiveDate) -> AppResult<Vec<LoanDetails>> {
        let rows = sqlx::query(&format!(
            "{} WHERE l.returned IS NOT TRUE AND l.loan_date < $1 ORDER BY l.loan_date",
            LOAN_WITH_BOOK
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }
}
