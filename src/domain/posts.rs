//! In-memory model of the post list: one record per list entry.
//!
//! The record is the source of truth for visibility. Each flag has exactly
//! one writer: the year filter owns `filter_visible`, the paginator owns
//! `page_visible`. Rendering only reads them.

use serde::Serialize;

use super::year::Year;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostItem {
    position: usize,
    year: Option<Year>,
    filter_visible: bool,
    page_visible: bool,
}

impl PostItem {
    /// Create a record for the entry at `position` in document order. Both
    /// flags start out true.
    pub fn new(position: usize, year: Option<Year>) -> Self {
        Self {
            position,
            year,
            filter_visible: true,
            page_visible: true,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn year(&self) -> Option<Year> {
        self.year
    }

    pub fn is_filter_visible(&self) -> bool {
        self.filter_visible
    }

    pub fn is_page_visible(&self) -> bool {
        self.page_visible
    }

    /// Final visibility: the item passes the filter and sits on the current page.
    pub fn is_visible(&self) -> bool {
        self.filter_visible && self.page_visible
    }

    pub(crate) fn set_filter_visible(&mut self, visible: bool) {
        self.filter_visible = visible;
    }

    pub(crate) fn set_page_visible(&mut self, visible: bool) {
        self.page_visible = visible;
    }
}
