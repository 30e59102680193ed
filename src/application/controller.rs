//! The filter + pagination state machine for one post list.
//!
//! A controller owns the item records, the optional year filter, the
//! paginator and the location holding the page marker. Every mutation goes
//! through one of its handlers, which run to completion synchronously; the
//! filter notifies pagination through the event returned by the filter, and
//! external listeners see the same event afterwards.

use std::{num::NonZeroUsize, str::FromStr};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{
    extract::{ItemMarkup, extract_year},
    posts::PostItem,
    year::{YearCatalog, YearChoice},
};

use super::{
    events::{FilterApplied, FilterBus},
    filter::{FilterOption, YearFilter},
    location::{Location, PageMarker},
    pagination::{PageControls, Paginator},
};

/// A discrete user interaction with the rendered controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Selector change to a raw value (`all` or a year label).
    SelectYear(String),
    Clear,
    Previous,
    Next,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action `{0}` (expected `year:<value>`, `clear`, `prev` or `next`)")]
pub struct ParseActionError(String);

impl FromStr for UserAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(value) = trimmed.strip_prefix("year:") {
            return Ok(UserAction::SelectYear(value.to_string()));
        }
        match trimmed {
            "clear" => Ok(UserAction::Clear),
            "prev" | "previous" => Ok(UserAction::Previous),
            "next" => Ok(UserAction::Next),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterView {
    pub options: Vec<FilterOption>,
    pub badge: String,
    pub empty_state_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub filter: Option<FilterView>,
    pub pagination: PageControls,
    pub current_page: usize,
    pub total_pages: usize,
    pub items: Vec<PostItem>,
}

pub struct ListController<L> {
    items: Vec<PostItem>,
    filter: Option<YearFilter>,
    pager: Paginator,
    location: L,
    bus: FilterBus,
    revision: u64,
}

impl<L: Location> ListController<L> {
    /// Extract a year per item and build the filter when at least one item
    /// yielded a year.
    pub fn new(markups: &[ItemMarkup], page_size: NonZeroUsize, location: L) -> Self {
        let items: Vec<PostItem> = markups
            .iter()
            .enumerate()
            .map(|(position, markup)| {
                let year = extract_year(markup);
                if year.is_none() {
                    debug!(
                        target = "application::controller",
                        position,
                        text = markup.text.trim(),
                        "could not extract year"
                    );
                }
                PostItem::new(position, year)
            })
            .collect();

        let missing = items.iter().filter(|item| item.year().is_none()).count();
        if missing > 0 {
            warn!(
                target = "application::controller",
                missing,
                total = items.len(),
                "some posts have no extractable year"
            );
        }

        let catalog: YearCatalog = items.iter().filter_map(PostItem::year).collect();
        let filter = YearFilter::new(catalog, items.len());

        Self {
            items,
            filter,
            pager: Paginator::new(page_size),
            location,
            bus: FilterBus::default(),
            revision: 0,
        }
    }

    /// First paint: force the filter to every year, rebuild the eligible set,
    /// then show the page requested by the location, clamped into range. The
    /// location is not written here.
    pub fn initialize(&mut self) {
        if let Some(filter) = self.filter.as_mut()
            && let Some(event) = filter.select(YearChoice::All, &mut self.items)
        {
            self.revision += 1;
            self.bus.publish(&event);
        }

        self.pager.rebuild(&self.items);
        let requested = PageMarker::requested(&self.location);
        let page = requested.clamp(1, self.pager.total_pages());
        self.pager.show_page(page, &mut self.items);
        self.revision += 1;

        info!(
            target = "application::controller",
            requested,
            page,
            total_pages = self.pager.total_pages(),
            items = self.items.len(),
            "post list initialized"
        );
    }

    /// Register an external "filter applied" listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&FilterApplied) + 'static) {
        self.bus.subscribe(listener);
    }

    /// Dispatch a user action. Returns whether anything changed.
    pub fn handle(&mut self, action: &UserAction) -> bool {
        match action {
            UserAction::SelectYear(value) => self.select_value(value),
            UserAction::Clear => self.clear_filter(),
            UserAction::Previous => self.previous_page(),
            UserAction::Next => self.next_page(),
        }
    }

    pub fn select(&mut self, choice: YearChoice) -> bool {
        let event = match self.filter.as_mut() {
            Some(filter) => filter.select(choice, &mut self.items),
            None => None,
        };
        self.after_filter(event)
    }

    pub fn select_value(&mut self, value: &str) -> bool {
        let event = match self.filter.as_mut() {
            Some(filter) => filter.select_value(value, &mut self.items),
            None => None,
        };
        self.after_filter(event)
    }

    /// Reset to every year; a no-op when already there.
    pub fn clear_filter(&mut self) -> bool {
        let event = match self.filter.as_mut() {
            Some(filter) => filter.clear(&mut self.items),
            None => None,
        };
        self.after_filter(event)
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.pager.previous(&mut self.items) {
            return false;
        }
        self.after_navigation();
        true
    }

    pub fn next_page(&mut self) -> bool {
        if !self.pager.next(&mut self.items) {
            return false;
        }
        self.after_navigation();
        true
    }

    fn after_filter(&mut self, event: Option<FilterApplied>) -> bool {
        let Some(event) = event else {
            return false;
        };
        self.revision += 1;

        // A filter change invalidates whatever the old page number meant.
        self.pager.rebuild(&self.items);
        self.pager.show_page(1, &mut self.items);
        self.write_marker();

        self.bus.publish(&event);
        true
    }

    fn after_navigation(&mut self) {
        self.revision += 1;
        self.write_marker();
        info!(
            target = "application::controller",
            page = self.pager.current_page(),
            total_pages = self.pager.total_pages(),
            "page changed"
        );
    }

    fn write_marker(&mut self) {
        let marker = PageMarker::new(self.pager.current_page());
        self.location.replace_fragment(&marker.to_string());
    }

    pub fn items(&self) -> &[PostItem] {
        &self.items
    }

    pub fn filter(&self) -> Option<&YearFilter> {
        self.filter.as_ref()
    }

    pub fn current_page(&self) -> usize {
        self.pager.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages()
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.pager.page_size()
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Count of model mutations since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn view(&self) -> ListView {
        ListView {
            filter: self.filter.as_ref().map(|filter| FilterView {
                options: filter.options(),
                badge: filter.badge(),
                empty_state_visible: filter.shows_empty_state(),
            }),
            pagination: self.pager.controls(),
            current_page: self.pager.current_page(),
            total_pages: self.pager.total_pages(),
            items: self.items.clone(),
        }
    }
}

impl<L: std::fmt::Debug> std::fmt::Debug for ListController<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("items", &self.items.len())
            .field("filter", &self.filter)
            .field("pager", &self.pager)
            .field("location", &self.location)
            .field("bus", &self.bus)
            .field("revision", &self.revision)
            .finish()
    }
}
