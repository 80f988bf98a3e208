//! Range filters and stable sorting over a fetched result set.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::{Book, FilterState, SortKey};

/// The last fetch and the subset currently on display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub all: Vec<Book>,
    pub filtered: Vec<Book>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn clear(&mut self) {
        self.all.clear();
        self.filtered.clear();
    }
}

/// Derive the filtered, sorted subset of `all`. `all` is left untouched.
pub fn recompute(all: &[Book], filters: &FilterState) -> Vec<Book> {
    let mut filtered: Vec<Book> = all.to_vec();

    if filters.has_year_range() {
        let from = filters.year_from.unwrap_or(0);
        let to = filters.year_to.unwrap_or(i32::MAX);
        filtered.retain(|book| (from..=to).contains(&book.year));
    }

    if filters.has_page_range() {
        let from = filters.page_from.unwrap_or(0);
        let to = filters.page_to.unwrap_or(u32::MAX);
        filtered.retain(|book| (from..=to).contains(&book.pages));
    }

    if let Some(key) = filters.sort {
        sort_books(&mut filtered, key);
    }

    filtered
}

/// Stable: books that compare equal keep their relative order.
pub fn sort_books(books: &mut [Book], key: SortKey) {
    match key {
        SortKey::Newest => books.sort_by(|a, b| b.year.cmp(&a.year)),
        SortKey::Oldest => books.sort_by(|a, b| a.year.cmp(&b.year)),
        SortKey::TitleAz => books.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortKey::TitleZa => books.sort_by(|a, b| compare_titles(&b.title, &a.title)),
        SortKey::RatingHighLow => books.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::RatingLowHigh => books.sort_by(|a, b| a.rating.total_cmp(&b.rating)),
    }
}

/// Dictionary order: accents and case only break ties, unaccented and
/// lowercase first.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let (a_lower, b_lower) = (a.to_lowercase(), b.to_lowercase());
    base_letters(&a_lower)
        .cmp(&base_letters(&b_lower))
        .then_with(|| a_lower.cmp(&b_lower))
        .then_with(|| swap_case(a).cmp(&swap_case(b)))
}

fn base_letters(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Code-point order puts uppercase first; swapping case reverses that.
fn swap_case(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                c.to_uppercase().collect::<Vec<_>>()
            }
        })
        .collect()
}
