//! One post list attached to one rendered page.

use std::num::NonZeroUsize;

use tracing::warn;

use crate::presentation::render::{RenderError, render_page};

use super::{
    controller::{ListController, ListView, UserAction},
    discovery::{DiscoveredList, DiscoveryError, discover},
    document::{Document, DocumentError},
    location::Location,
};

pub struct Session<L> {
    html: String,
    list: DiscoveredList,
    controller: ListController<L>,
}

impl<L: Location> Session<L> {
    /// Discover the post list in `html`, build the controller and run the
    /// initialization sequence.
    ///
    /// A page without a usable list, or one the parser cannot follow, is not
    /// an error: the feature stays inert and `Ok(None)` is returned after a
    /// warning. Only an invalid built-in selector surfaces as `Err`.
    pub fn attach(
        html: impl Into<String>,
        location: L,
        page_size: NonZeroUsize,
    ) -> Result<Option<Self>, DocumentError> {
        let html = html.into();
        let document = match Document::parse(&html) {
            Ok(document) => document,
            Err(err @ DocumentError::Parse { .. }) => {
                warn!(
                    target = "application::session",
                    error = %err,
                    "blog filter/pagination disabled"
                );
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let list = match discover(&document) {
            Ok(list) => list,
            Err(DiscoveryError::Document(err)) => return Err(err),
            Err(err) => {
                warn!(
                    target = "application::session",
                    error = %err,
                    "blog filter/pagination disabled"
                );
                return Ok(None);
            }
        };

        let markups: Vec<_> = list.items.iter().map(|item| item.markup.clone()).collect();
        let mut controller = ListController::new(&markups, page_size, location);
        controller.initialize();

        Ok(Some(Self {
            html,
            list,
            controller,
        }))
    }

    pub fn apply(&mut self, action: &UserAction) -> bool {
        self.controller.handle(action)
    }

    pub fn controller(&self) -> &ListController<L> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ListController<L> {
        &mut self.controller
    }

    pub fn list(&self) -> &DiscoveredList {
        &self.list
    }

    pub fn view(&self) -> ListView {
        self.controller.view()
    }

    /// The page as it looks for the current state.
    pub fn render(&self) -> Result<String, RenderError> {
        render_page(&self.html, &self.list, &self.controller.view())
    }
}
