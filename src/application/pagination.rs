//! Page-size-bounded view over the filter-visible items.

use std::{num::NonZeroUsize, ops::Range};

use serde::Serialize;
use tracing::warn;

use crate::domain::posts::PostItem;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// What the pagination controls should look like for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageControls {
    pub indicator: String,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    /// The whole control surface is hidden when there is at most one page.
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    /// Positions of filter-visible items, in document order.
    eligible: Vec<usize>,
    page_size: NonZeroUsize,
    current_page: usize,
}

impl Paginator {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            eligible: Vec::new(),
            page_size,
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn eligible(&self) -> &[usize] {
        &self.eligible
    }

    /// `max(1, ceil(eligible / page_size))`.
    pub fn total_pages(&self) -> usize {
        self.eligible.len().div_ceil(self.page_size.get()).max(1)
    }

    /// Recompute the eligible set from the items' filter flags and clamp the
    /// current page into the new range.
    pub fn rebuild(&mut self, items: &[PostItem]) {
        self.eligible = items
            .iter()
            .filter(|item| item.is_filter_visible())
            .map(PostItem::position)
            .collect();
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    /// Slice of `eligible` shown on `page`.
    pub fn page_window(&self, page: usize) -> Range<usize> {
        let size = self.page_size.get();
        let start = page.saturating_sub(1).saturating_mul(size);
        start..start.saturating_add(size)
    }

    /// Show `page`. Callers pass pages already within `[1, total_pages]`; the
    /// value is not clamped here. Items outside the eligible set are always
    /// hidden.
    pub fn show_page(&mut self, page: usize, items: &mut [PostItem]) {
        if page == 0 || page > self.total_pages() {
            warn!(
                target = "application::pagination",
                page,
                total_pages = self.total_pages(),
                "showing a page outside the valid range"
            );
        }

        self.current_page = page;
        let window = self.page_window(page);

        for item in items.iter_mut() {
            item.set_page_visible(false);
        }
        for (index, &position) in self.eligible.iter().enumerate() {
            if window.contains(&index)
                && let Some(item) = items.get_mut(position)
            {
                item.set_page_visible(true);
            }
        }
    }

    /// Step back one page. Returns false at the first page.
    pub fn previous(&mut self, items: &mut [PostItem]) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.show_page(self.current_page - 1, items);
        true
    }

    /// Step forward one page. Returns false at the last page.
    pub fn next(&mut self, items: &mut [PostItem]) -> bool {
        if self.current_page >= self.total_pages() {
            return false;
        }
        self.show_page(self.current_page + 1, items);
        true
    }

    pub fn indicator(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages())
    }

    pub fn controls(&self) -> PageControls {
        let total_pages = self.total_pages();
        PageControls {
            indicator: self.indicator(),
            previous_disabled: self.current_page == 1,
            next_disabled: self.current_page == total_pages,
            hidden: total_pages <= 1,
        }
    }
}
