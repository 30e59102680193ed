use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::application::{
    controller::FilterView, filter::FilterOption, pagination::PageControls,
};

#[derive(Debug, Error)]
#[error("{public_message} ({origin})")]
pub struct TemplateRenderError {
    pub(crate) origin: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(origin: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            origin,
            public_message,
            error,
        }
    }
}

/// Filter region inserted before the list: selector, clear control, count
/// badge and the empty-state message.
#[derive(Template)]
#[template(path = "year_filter.html")]
pub struct YearFilterTemplate<'a> {
    pub options: &'a [FilterOption],
    pub badge: &'a str,
    pub empty_state_visible: bool,
}

impl<'a> From<&'a FilterView> for YearFilterTemplate<'a> {
    fn from(view: &'a FilterView) -> Self {
        Self {
            options: &view.options,
            badge: &view.badge,
            empty_state_visible: view.empty_state_visible,
        }
    }
}

/// Pagination region inserted after the list.
#[derive(Template)]
#[template(path = "pagination.html")]
pub struct PaginationTemplate<'a> {
    pub controls: &'a PageControls,
}

pub fn render_template<T: Template>(
    template: T,
    origin: &'static str,
) -> Result<String, TemplateRenderError> {
    template
        .render()
        .map_err(|err| TemplateRenderError::new(origin, "Template rendering failed", err))
}
