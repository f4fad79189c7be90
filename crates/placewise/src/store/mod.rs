//! Shared persistence vocabulary. Every component defines its own repository
//! trait over its own entities; the error type, pagination window, and result
//! page are common to all of them. [`memory`] provides the in-process store
//! used by the API binary and the test suite.

use axum::http::StatusCode;
use thiserror::Error;

pub mod memory;

/// Error enumeration for repository failures. Uniqueness constraints are
/// enforced inside the store, behind its own synchronization, so concurrent
/// check-then-write races cannot mint duplicates.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn status(&self) -> StatusCode {
        match self {
            RepositoryError::Conflict => StatusCode::CONFLICT,
            RepositoryError::NotFound => StatusCode::NOT_FOUND,
            RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// One page of a listing. `page` is 1-based; `limit` is clamped to keep a
/// single response bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(10).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> usize {
        ((self.page - 1) * self.limit) as usize
    }

    pub fn cap(&self) -> usize {
        self.limit as usize
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        let limit = u64::from(self.limit);
        (total + limit - 1) / limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A slice of matching records plus the total match count before paging.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let page = Pagination::new(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);

        let page = Pagination::new(Some(0), Some(500));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn pagination_offsets_and_total_pages() {
        let page = Pagination::new(Some(3), Some(10));
        assert_eq!(page.offset(), 20);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(21), 3);
        assert_eq!(page.total_pages(30), 3);
        assert_eq!(page.total_pages(31), 4);
    }
}
