pub mod director;
pub mod donation;
pub mod event;
pub mod gallery;
pub mod inquiry;
pub mod user;

pub use director::*;
pub use donation::*;
pub use event::*;
pub use gallery::*;
pub use inquiry::*;
pub use user::*;

use serde::Deserialize;

/// Pagination query parameters, 1-indexed
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub const DEFAULT_LIMIT: u32 = 20;

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page() as i64 - 1) * self.limit() as i64
    }

    /// Total page count for a result set of `total` rows
    pub fn pages(&self, total: i64) -> u32 {
        if total <= 0 {
            0
        } else {
            ((total + self.limit() as i64 - 1) / self.limit() as i64) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults() {
        let q = PageQuery {
            page: None,
            limit: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), PageQuery::DEFAULT_LIMIT);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn page_math() {
        let q = PageQuery {
            page: Some(2),
            limit: Some(12),
        };
        assert_eq!(q.offset(), 12);
        assert_eq!(q.pages(25), 3);
        assert_eq!(q.pages(24), 2);
        assert_eq!(q.pages(0), 0);
    }
}
