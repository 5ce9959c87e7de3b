//! Loan management service

use chrono::{Duration, NaiveDate, Utc};

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{Loan, LoanDetails, LoanQuery},
        page::Pagination,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    grace_days: i64,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self {
            repository,
            grace_days: config.grace_days,
        }
    }

    /// Lend a book to a customer. A book with an active (unreturned) loan
    /// cannot be lent again; the existence check is the fast path, the
    /// partial unique index is the guarantee under concurrency. The loan
    /// date is chosen by the caller, not here.
    pub async fn create(
        &self,
        book: &Book,
        customer: &str,
        customer_email: Option<&str>,
        loan_date: NaiveDate,
    ) -> AppResult<Loan> {
        let book_id = book
            .id
            .ok_or_else(|| AppError::InvalidArgument("Id do livro não pode ser nulo.".to_string()))?;

        if self.repository.loans.exists_active_by_book(book_id).await? {
            return Err(AppError::BusinessRule("Livro já emprestado.".to_string()));
        }

        self.repository
            .loans
            .create(book_id, customer, customer_email, loan_date)
            .await
    }

    /// Loan by id; absence is `None`.
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Loan>> {
        self.repository.loans.get_by_id(id).await
    }

    /// Persist the loan as given. No invariant re-check: marking a loan
    /// returned is the resolution of the active-loan rule, not a violation.
    pub async fn update(&self, loan: &Loan) -> AppResult<Loan> {
        self.repository.loans.update(loan).await
    }

    /// Loans matching the ISBN or customer filter (logical OR), paginated.
    pub async fn find(
        &self,
        query: &LoanQuery,
        page: &Pagination,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        self.repository.loans.search(query, page).await
    }

    /// All loans, any status, for a book.
    pub async fn loans_by_book(
        &self,
        book: &Book,
        page: &Pagination,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        let book_id = book
            .id
            .ok_or_else(|| AppError::InvalidArgument("Id do livro não pode ser nulo.".to_string()))?;
        self.repository.loans.by_book(book_id, page).await
    }

    /// All unreturned loans older than the grace period. Unpaginated.
    pub async fn late_loans(&self) -> AppResult<Vec<LoanDetails>> {
        let cutoff = late_cutoff(Utc::now().date_naive(), self.grace_days);
        self.repository.loans.late(cutoff).await
    }
}

/// A loan dated strictly before this cutoff is late; one dated exactly at
/// the cutoff is not.
fn late_cutoff(today: NaiveDate, grace_days: i64) -> NaiveDate {
    today - Duration::days(grace_days)
}
