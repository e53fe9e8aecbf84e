use serde::{Deserialize, Serialize};

use crate::envelope::ListEnvelope;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 25;
pub const MAX_ITEMS_PER_PAGE: usize = 200;

/// `page`/`page_size` query parameters forwarded to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Clamps user-provided values to a valid request.
    pub fn new(page: Option<usize>, page_size: Option<usize>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            page_size: page_size
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
                .min(MAX_ITEMS_PER_PAGE),
        }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }
}

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One page of items plus the page links to render (`None` is an ellipsis).
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            total: items.len(),
            items,
            pages,
            page: current_page,
        }
    }

    /// Builds the page from a normalized envelope and the request that produced it.
    pub fn from_envelope(envelope: ListEnvelope<T>, request: PageRequest) -> Self {
        let total_pages = envelope.count.div_ceil(request.page_size.max(1));
        let mut paginated = Self::new(envelope.results, request.page, total_pages);
        paginated.total = envelope.count;
        paginated
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pages: self.pages,
            page: self.page,
            total: self.total,
        }
    }
}
