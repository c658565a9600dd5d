//! Pagination types shared by the list queries.

use serde::{Deserialize, Serialize};

/// Upper bound on the number of items a single page may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page window.
///
/// Construction does not validate bounds; callers enforce the
/// `number ≥ 1`, `size ∈ [1, MAX_PAGE_SIZE]` contract before reaching
/// the store (see [`PageRequest::is_valid`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub number: u32,
    /// Items per page.
    pub size: u32,
}

impl PageRequest {
    /// Creates a page request.
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    /// Returns true if the window satisfies the pagination contract.
    pub fn is_valid(&self) -> bool {
        self.number >= 1 && (1..=MAX_PAGE_SIZE).contains(&self.size)
    }

    /// Number of items to skip before this window.
    pub fn offset(&self) -> u64 {
        u64::from(self.number.saturating_sub(1)) * u64::from(self.size)
    }

    /// Number of items in this window.
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// One page of results plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items inside the requested window, already sorted.
    pub items: Vec<T>,
    /// Total matching records, independent of the window.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Creates a page from a window of items and the filtered total.
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    /// Derives the total number of pages for a given page size.
    pub fn total_pages(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(page_size))
    }
}
