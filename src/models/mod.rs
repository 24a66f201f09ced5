//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod renewal;
pub mod user;

use serde::Deserialize;
use utoipa::IntoParams;

// Re-export commonly used types
pub use author::{Author, AuthorDetails};
pub use book::{Book, BookDetails, BookQuery, BookShort};
pub use book_instance::{BookInstance, BookInstanceDetails, LoanStatus};
pub use genre::Genre;
pub use renewal::{RenewBookForm, RenewalForm};
pub use user::{User, UserClaims};

/// Fixed page size of every paginated listing
pub const PAGE_SIZE: i64 = 10;

/// `?page=N` query parameter (1-based)
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn new(page: Option<i64>) -> Self {
        Self { page }
    }

    /// Requested page, pages below 1 are read as the first one
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Row offset of the page, clamped at `i64::MAX` for absurd page numbers
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offsets() {
        assert_eq!(PageQuery::default().offset(), 0);
        assert_eq!(PageQuery::new(Some(3)).offset(), 20);
        assert_eq!(PageQuery::new(Some(0)).page(), 1);
        assert_eq!(PageQuery::new(Some(-4)).offset(), 0);
    }

    #[test]
    fn huge_page_offset_saturates() {
        let page = PageQuery::new(Some(i64::MAX));
        assert_eq!(page.page(), i64::MAX);
        assert_eq!(page.offset(), i64::MAX);
        assert!(PageQuery::new(Some(i64::MAX / PAGE_SIZE + 2)).offset() > 0);
    }
}
