//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Largest accepted page size; larger requests are clamped.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * self.limit()
    }

    /// Returns the limit for database queries, clamped to [`Self::MAX_PER_PAGE`].
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.effective_per_page())
    }

    /// The page size actually served, clamped to [`Self::MAX_PER_PAGE`].
    ///
    /// Response metadata must use this value, not the raw `per_page`, so
    /// that `total_pages` agrees with the number of rows a page can hold.
    #[must_use]
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.clamp(1, Self::MAX_PER_PAGE)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page.max(1)))).unwrap_or(u32::MAX)
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Maps each item in the page, keeping the metadata.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResponse<U> {
        PageResponse {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 25, 50)]
    #[case(0, 10, 0)] // page 0 treated as first page
    fn offset_is_zero_based(#[case] page: u32, #[case] per_page: u32, #[case] expected: u64) {
        let req = PageRequest { page, per_page };
        assert_eq!(req.offset(), expected);
    }

    #[test]
    fn limit_is_clamped() {
        let req = PageRequest {
            page: 1,
            per_page: 10_000,
        };
        assert_eq!(req.limit(), u64::from(PageRequest::MAX_PER_PAGE));

        let req = PageRequest {
            page: 1,
            per_page: 0,
        };
        assert_eq!(req.limit(), 1);
    }

    #[rstest]
    #[case(10, 10)]
    #[case(10_000, PageRequest::MAX_PER_PAGE)]
    #[case(0, 1)]
    fn effective_per_page_matches_limit(#[case] per_page: u32, #[case] expected: u32) {
        let req = PageRequest { page: 1, per_page };
        assert_eq!(req.effective_per_page(), expected);
        assert_eq!(req.limit(), u64::from(expected));
    }

    #[rstest]
    #[case(0, 10, 1)] // empty result still reports one page
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(95, 10, 10)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] per_page: u32, #[case] expected: u32) {
        let page: PageResponse<u8> = PageResponse::new(Vec::new(), 1, per_page, total);
        assert_eq!(page.meta.total_pages, expected);
    }

    #[test]
    fn map_preserves_meta() {
        let page = PageResponse::new(vec![1, 2, 3], 2, 3, 7);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.data, vec!["1", "2", "3"]);
        assert_eq!(mapped.meta.page, 2);
        assert_eq!(mapped.meta.total, 7);
        assert_eq!(mapped.meta.total_pages, 3);
    }
}
