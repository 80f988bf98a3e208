//! Fixed-size pages over the filtered set, plus the page-number window.

use serde::Serialize;

use crate::models::Book;

/// Everything a sink needs to draw one page of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView<'a> {
    pub items: &'a [Book],
    pub current_page: usize,
    pub total_pages: usize,
    /// Size of the whole filtered set, not of this page.
    pub total_count: usize,
    /// Page numbers to offer as direct jumps.
    pub window: Vec<usize>,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub page_size: usize,
    pub window_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: 6,
            window_size: 5,
        }
    }
}

impl Paginator {
    pub fn new(page_size: usize, window_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            window_size: window_size.max(1),
        }
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    pub fn page<'a>(&self, filtered: &'a [Book], current_page: usize) -> PageView<'a> {
        let total_pages = self.total_pages(filtered.len());
        let start = (current_page.max(1) - 1)
            .saturating_mul(self.page_size)
            .min(filtered.len());
        let end = start.saturating_add(self.page_size).min(filtered.len());

        PageView {
            items: &filtered[start..end],
            current_page,
            total_pages,
            total_count: filtered.len(),
            window: page_window(current_page, total_pages, self.window_size),
            has_prev: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

/// Up to `max` consecutive page numbers centred on `current`, shifted to stay
/// inside `[1, total]`.
pub fn page_window(current: usize, total: usize, max: usize) -> Vec<usize> {
    if total == 0 || max == 0 {
        return Vec::new();
    }
    let (current, total, max) = (current as i64, total as i64, max as i64);

    let mut start = (current - max / 2).max(1);
    let end = (start + max - 1).min(total);
    if end - start < max - 1 {
        start = (end - max + 1).max(1);
    }

    (start..=end).map(|p| p as usize).collect()
}
