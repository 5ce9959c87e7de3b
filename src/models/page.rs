//! Pagination window shared by list endpoints

/// Sanitized pagination window. Raw query-string values are clamped here
/// once, so repositories and response metadata always agree on the
/// effective page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number, 1-based.
    pub page: i64,
    /// Records per page.
    pub per_page: i64,
}

impl Pagination {
    pub const DEFAULT_PER_PAGE: i64 = 20;
    pub const MAX_PER_PAGE: i64 = 100;

    pub fn clamp(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// Row offset of the window. Saturates instead of overflowing for
    /// out-of-range page numbers; the database then returns an empty page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let p = Pagination::clamp(None, None);
        assert_eq!(p, Pagination { page: 1, per_page: 20 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn per_page_is_capped_and_echoed_capped() {
        let p = Pagination::clamp(Some(1), Some(1000));
        assert_eq!(p.per_page, Pagination::MAX_PER_PAGE);
    }

    #[test]
    fn zero_and_negative_pages_become_first_page() {
        assert_eq!(Pagination::clamp(Some(0), None).page, 1);
        assert_eq!(Pagination::clamp(Some(-7), None).page, 1);
        assert_eq!(Pagination::clamp(Some(0), None).offset(), 0);
    }

    #[test]
    fn huge_page_number_saturates_instead_of_overflowing() {
        let p = Pagination::clamp(Some(i64::MAX), Some(100));
        assert_eq!(p.offset(), i64::MAX);

        let p = Pagination::clamp(Some(i64::MAX), None);
        assert!(p.offset() > 0);
    }
}
