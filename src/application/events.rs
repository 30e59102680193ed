//! Single-topic synchronous event bus for "filter applied" notifications.

use serde::Serialize;

use crate::domain::year::YearChoice;

/// Name of the notification as observed by page integrations.
pub const FILTER_APPLIED_EVENT: &str = "yearfilter:applied";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterApplied {
    /// The resolved choice (`all` or a year label when serialized).
    #[serde(rename = "year")]
    pub choice: YearChoice,
    pub visible: usize,
    pub total: usize,
}

pub type FilterListener = Box<dyn FnMut(&FilterApplied)>;

/// Listeners run in registration order, synchronously, each to completion.
#[derive(Default)]
pub struct FilterBus {
    listeners: Vec<FilterListener>,
}

impl FilterBus {
    pub fn subscribe(&mut self, listener: impl FnMut(&FilterApplied) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&mut self, event: &FilterApplied) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for FilterBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
