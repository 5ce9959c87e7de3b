//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::book::Book;

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub customer: String,
    pub customer_email: Option<String>,
    pub loan_date: NaiveDate,
    /// Tri-state: `None` and `Some(false)` are both "active"; only
    /// `Some(true)` means the book came back.
    pub returned: Option<bool>,
}

impl Loan {
    /// A loan is active while the book has not been returned.
    pub fn is_active(&self) -> bool {
        self.returned != Some(true)
    }

    /// A loan is late when it is active and its loan date is strictly more
    /// than `grace_days` before `today`.
    pub fn is_late(&self, today: NaiveDate, grace_days: i64) -> bool {
        self.is_active() && self.loan_date < today - chrono::Duration::days(grace_days)
    }
}

/// Loan with its book embedded, as returned by list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub customer: String,
    pub customer_email: Option<String>,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
    pub book: Book,
}

/// Loan filter parameters. `isbn` and `customer` combine with OR: a loan
/// matches when either field matches; absent fields act as wildcards.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    pub isbn: Option<String>,
    pub customer: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(loan_date: NaiveDate, returned: Option<bool>) -> Loan {
        Loan {
            id: 1,
            book_id: 1,
            customer: "Fulano".to_string(),
            customer_email: None,
            loan_date,
            returned,
        }
    }

    #[test]
    fn active_unless_returned_true() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(loan(date, None).is_active());
        assert!(loan(date, Some(false)).is_active());
        assert!(!loan(date, Some(true)).is_active());
    }

    #[test]
    fn late_only_beyond_grace_period() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let grace = 4;

        // Exactly at the boundary: not late (strict inequality).
        let boundary = today - chrono::Duration::days(4);
        assert!(!loan(boundary, None).is_late(today, grace));

        let one_past = today - chrono::Duration::days(5);
        assert!(loan(one_past, None).is_late(today, grace));
    }

    #[test]
    fn returned_loan_is_never_late() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let old = today - chrono::Duration::days(30);
        assert!(!loan(old, Some(true)).is_late(today, 4));
        assert!(loan(old, Some(false)).is_late(today, 4));
    }
}
