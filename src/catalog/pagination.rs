use serde::Deserialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: i64 = 16;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits in an `i64` at any page size.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Raw `page` / `limit` query parameters.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct Pagination {
    /// 1-based page number, default 1
    pub page: Option<i64>,
    /// Page size, default 16, at most 100
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// A validated page descriptor. Page is within `1..=MAX_PAGE` and size within
/// `1..=MAX_PAGE_SIZE`, so the offset is never negative and never overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> u64 {
        self.size as u64
    }

    /// `ceil(total / size)`, never less than 1.
    pub fn total_pages(&self, total: i64) -> i64 {
        let total = total.max(0);
        (total.saturating_add(self.size - 1) / self.size).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_sixteen() {
        let page = Pagination::default().normalize();
        assert_eq!(page.page(), 1);
        assert_eq!(page.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn clamps_size_to_bounds() {
        assert_eq!(PageRequest::new(1, 0).size(), 1);
        assert_eq!(PageRequest::new(1, 500).size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow_the_offset() {
        let page = Pagination {
            page: Some(i64::MAX),
            limit: Some(16),
        }
        .normalize();
        assert_eq!(page.page(), MAX_PAGE);
        assert!(page.offset() > 0);
        assert_eq!(page.offset(), (MAX_PAGE - 1) * 16);

        let widest = PageRequest::new(i64::MAX, MAX_PAGE_SIZE);
        assert!(widest.offset() >= 0);
        assert!(u64::try_from(widest.offset()).is_ok());
        assert!(widest.total_pages(i64::MAX) >= MAX_PAGE);
    }
}
