//! Year filter: selector state, item filter-visibility, count badge and the
//! empty-state message.

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    posts::PostItem,
    year::{ALL_YEARS_LABEL, YearCatalog, YearChoice},
};

use super::events::FilterApplied;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct YearFilter {
    catalog: YearCatalog,
    choice: YearChoice,
    visible: usize,
    total: usize,
    applied: bool,
}

impl YearFilter {
    /// Build the filter for a catalog. An empty catalog yields no filter at
    /// all; pagination then runs over every item.
    pub fn new(catalog: YearCatalog, total: usize) -> Option<Self> {
        if catalog.is_empty() {
            return None;
        }
        Some(Self {
            catalog,
            choice: YearChoice::All,
            visible: total,
            total,
            applied: false,
        })
    }

    pub fn catalog(&self) -> &YearCatalog {
        &self.catalog
    }

    /// Current choice, which is also the selector's displayed value.
    pub fn choice(&self) -> YearChoice {
        self.choice
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Apply `choice` to every item. Years outside the catalog leave the
    /// state untouched and produce no notification.
    pub fn select(&mut self, choice: YearChoice, items: &mut [PostItem]) -> Option<FilterApplied> {
        if let YearChoice::Year(year) = choice
            && !self.catalog.contains(year)
        {
            debug!(
                target = "application::filter",
                year = %year,
                "ignoring year outside the catalog"
            );
            return None;
        }

        self.choice = choice;
        Some(self.apply(items))
    }

    /// Selector change with a raw value (`all` or a year label).
    pub fn select_value(&mut self, value: &str, items: &mut [PostItem]) -> Option<FilterApplied> {
        match value.parse::<YearChoice>() {
            Ok(choice) => self.select(choice, items),
            Err(err) => {
                debug!(
                    target = "application::filter",
                    value,
                    error = %err,
                    "ignoring unparsable selector value"
                );
                None
            }
        }
    }

    /// Reset to every year. Already showing every year is a no-op.
    pub fn clear(&mut self, items: &mut [PostItem]) -> Option<FilterApplied> {
        if self.choice.is_all() {
            return None;
        }
        self.select(YearChoice::All, items)
    }

    fn apply(&mut self, items: &mut [PostItem]) -> FilterApplied {
        let mut visible = 0;
        for item in items.iter_mut() {
            let show = self.choice.admits(item.year());
            item.set_filter_visible(show);
            if show {
                visible += 1;
            }
        }

        self.visible = visible;
        self.total = items.len();
        self.applied = true;

        debug!(
            target = "application::filter",
            choice = %self.choice,
            visible,
            total = self.total,
            "year filter applied"
        );

        FilterApplied {
            choice: self.choice,
            visible,
            total: self.total,
        }
    }

    /// Count badge text.
    pub fn badge(&self) -> String {
        if self.applied {
            format!("{} of {} posts", self.visible, self.total)
        } else {
            format!("{} posts", self.total)
        }
    }

    pub fn shows_empty_state(&self) -> bool {
        self.applied && self.visible == 0
    }

    /// Selector options: every year first, then the catalog newest first.
    pub fn options(&self) -> Vec<FilterOption> {
        let mut options = Vec::with_capacity(self.catalog.len() + 1);
        options.push(FilterOption {
            value: YearChoice::All.value(),
            label: ALL_YEARS_LABEL.to_string(),
            selected: self.choice.is_all(),
        });
        options.extend(self.catalog.descending().map(|year| FilterOption {
            value: year.label(),
            label: year.label(),
            selected: self.choice == YearChoice::Year(year),
        }));
        options
    }
}
