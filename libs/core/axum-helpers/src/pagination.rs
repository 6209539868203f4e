//! Page-number pagination for list endpoints.
//!
//! Query parameters follow the `?page=2&page_size=20` convention; responses
//! are wrapped in a [`Page`] envelope carrying the total count and
//! next/previous page indicators.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound for the `page_size` query parameter
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination query parameters.
///
/// `page` is 1-based. `page_size` is clamped to [`MAX_PAGE_SIZE`], so a
/// client asking for 10000 items per page silently gets 100.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct Pagination {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default 20, max 100)
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl Pagination {
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        // page can be an arbitrary client-supplied number
        self.page()
            .saturating_sub(1)
            .saturating_mul(self.page_size())
    }

    pub fn limit(&self) -> u64 {
        self.page_size()
    }
}

/// Paginated response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T> {
    /// Total number of matching items across all pages
    pub count: u64,
    /// Current page number (1-based)
    pub page: u64,
    /// Items per page
    pub page_size: u64,
    /// Total number of pages
    pub total_pages: u64,
    /// Next page number, if any
    pub next: Option<u64>,
    /// Previous page number, if any
    pub previous: Option<u64>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page envelope from one page of results and the total count.
    pub fn new(results: Vec<T>, count: u64, pagination: &Pagination) -> Self {
        let page = pagination.page();
        let page_size = pagination.page_size();
        let total_pages = count.div_ceil(page_size);

        Self {
            count,
            page,
            page_size,
            total_pages,
            next: (page < total_pages).then_some(page + 1),
            previous: (page > 1 && count > 0).then_some((page - 1).min(total_pages)),
            results,
        }
    }

    /// Map the results to another type, keeping the envelope intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_clamped() {
        let pagination = Pagination {
            page: 1,
            page_size: 10_000,
        };
        assert_eq!(pagination.page_size(), MAX_PAGE_SIZE);

        let pagination = Pagination {
            page: 1,
            page_size: 0,
        };
        assert_eq!(pagination.page_size(), 1);
    }

    #[test]
    fn test_offset_is_zero_based() {
        let pagination = Pagination {
            page: 3,
            page_size: 10,
        };
        assert_eq!(pagination.offset(), 20);
        assert_eq!(pagination.limit(), 10);
    }

    #[test]
    fn test_offset_saturates_on_huge_page_number() {
        let pagination = Pagination {
            page: u64::MAX,
            page_size: 100,
        };
        assert_eq!(pagination.offset(), u64::MAX);
    }

    #[test]
    fn test_envelope_25_items_page_size_10() {
        let p1 = Pagination {
            page: 1,
            page_size: 10,
        };
        let page = Page::new(vec![0u8; 10], 25, &p1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.next, Some(2));
        assert_eq!(page.previous, None);

        let p3 = Pagination {
            page: 3,
            page_size: 10,
        };
        let page = Page::new(vec![0u8; 5], 25, &p3);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, Some(2));
    }

    #[test]
    fn test_empty_result_set() {
        let pagination = Pagination::default();
        let page: Page<u8> = Page::new(vec![], 0, &pagination);
        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
    }

    #[test]
    fn test_map_keeps_envelope() {
        let pagination = Pagination::default();
        let page = Page::new(vec![1u32, 2, 3], 3, &pagination);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.count, 3);
        assert_eq!(mapped.results, vec!["1", "2", "3"]);
    }
}
