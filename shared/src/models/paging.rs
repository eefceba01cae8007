//! Pagination envelope for list endpoints

use serde::{Deserialize, Serialize};

/// A page of results plus the bookkeeping the frontend needs for paging
/// controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
    /// Total matching rows across all pages
    pub total_items: i64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total_items: i64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            ((total_items as u64).div_ceil(per_page as u64)) as u32
        };
        Self {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 1, 10, 21);
        assert_eq!(page.total_pages, 3);
        let exact = Page::new(vec![1], 1, 10, 20);
        assert_eq!(exact.total_pages, 2);
    }
}
