//! Page/limit arithmetic shared by every paginated listing.

use serde::{Deserialize, Serialize};

/// A normalized page request.
///
/// Pages are 1-based. Out-of-range input is clamped rather than rejected, so a
/// hand-edited `?page=0&limit=5000` still produces a sensible query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Build from optional query-string values.
    #[must_use]
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Self {
        Self::new(page.unwrap_or(1), limit.unwrap_or(Self::DEFAULT_LIMIT))
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn skip(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    /// `ceil(total / limit)`; an empty result has zero pages.
    #[must_use]
    pub fn total_pages(&self, total: i64) -> u32 {
        if total <= 0 {
            return 0;
        }
        let limit = i64::from(self.limit);
        u32::try_from((total + limit - 1) / limit).unwrap_or(u32::MAX)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_LIMIT)
    }
}

/// One page of results plus the totals needed to render a pager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            current_page: pagination.page(),
            total_pages: pagination.total_pages(total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_is_zero_on_first_page() {
        assert_eq!(Pagination::new(1, 10).skip(), 0);
        assert_eq!(Pagination::new(3, 10).skip(), 20);
        assert_eq!(Pagination::new(2, 25).skip(), 25);
    }

    #[test]
    fn clamps_out_of_range_input() {
        let p = Pagination::new(0, 0);
        assert_eq!((p.page(), p.limit()), (1, 1));
        assert_eq!(Pagination::new(4, 5000).limit(), Pagination::MAX_LIMIT);
        assert_eq!(Pagination::from_query(None, None), Pagination::new(1, 10));
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
        assert_eq!(p.total_pages(95), 10);
    }

    #[test]
    fn page_navigation_flags() {
        let page = Page::new(vec![1, 2], 25, Pagination::new(2, 10));
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev());
        assert!(page.has_next());

        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.current_page, 2);
    }

    #[test]
    fn empty_page_has_no_navigation() {
        let page: Page<u8> = Page::new(vec![], 0, Pagination::default());
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }
}
