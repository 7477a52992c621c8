//! Page-based pagination helpers for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Upper bound on page size to keep list queries cheap.
pub const MAX_PER_PAGE: u32 = 100;

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageQuery {
    /// Clamps page and per_page to sane bounds.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// SQL LIMIT for this page.
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// SQL OFFSET for this page. Computed in i64 so an absurd `?page=`
    /// value cannot overflow.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) as i64 - 1) * self.per_page as i64
    }
}

/// Pagination metadata returned alongside list data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: u32,
}

impl PageInfo {
    /// Builds pagination metadata from a clamped query and a total row count.
    pub fn new(query: PageQuery, total: i64) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            ((total as f64) / (query.per_page as f64)).ceil() as u32
        };
        Self {
            page: query.page,
            per_page: query.per_page,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_offset_first_page() {
        let q = PageQuery {
            page: 1,
            per_page: 20,
        };
        assert_eq!(q.offset(), 0);
        assert_eq!(q.limit(), 20);
    }

    #[test]
    fn test_offset_later_page() {
        let q = PageQuery {
            page: 3,
            per_page: 25,
        };
        assert_eq!(q.offset(), 50);
    }

    #[test]
    fn test_offset_huge_page_does_not_overflow() {
        let q = PageQuery {
            page: u32::MAX,
            per_page: 100,
        }
        .clamped();
        assert_eq!(q.offset(), (u32::MAX as i64 - 1) * 100);
    }

    #[test]
    fn test_clamp_zero_page() {
        let q = PageQuery {
            page: 0,
            per_page: 0,
        }
        .clamped();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, 1);
    }

    #[test]
    fn test_clamp_oversized_per_page() {
        let q = PageQuery {
            page: 1,
            per_page: 10_000,
        }
        .clamped();
        assert_eq!(q.per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_page_info_total_pages() {
        let q = PageQuery {
            page: 1,
            per_page: 20,
        };
        assert_eq!(PageInfo::new(q, 0).total_pages, 0);
        assert_eq!(PageInfo::new(q, 20).total_pages, 1);
        assert_eq!(PageInfo::new(q, 21).total_pages, 2);
    }
}
