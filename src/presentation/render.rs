//! Projects the list model back into page markup.
//!
//! The model is the source of truth; this pass only reflects it: item
//! classes and `data-year`, the filter region before the list and the
//! pagination region after it.

use std::collections::HashMap;

use lol_html::{
    RewriteStrSettings, element,
    html_content::{ContentType, Element},
    rewrite_str,
};
use thiserror::Error;
use tracing::trace;

use crate::{
    application::{
        controller::ListView,
        discovery::DiscoveredList,
        document::NodeId,
    },
    domain::year::Year,
};

use super::views::{PaginationTemplate, TemplateRenderError, YearFilterTemplate, render_template};

/// Class for items hidden by the year filter.
pub const FILTER_HIDDEN_CLASS: &str = "yf-hidden";
/// Class for items outside the current page.
pub const PAGE_HIDDEN_CLASS: &str = "pg-hidden";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] TemplateRenderError),
    #[error("failed to rewrite document: {message}")]
    Rewrite { message: String },
    #[error("view has {view} items but the page lists {page}")]
    ItemMismatch { view: usize, page: usize },
}

#[derive(Debug, Clone, Copy)]
struct ItemState {
    year: Option<Year>,
    filter_hidden: bool,
    page_hidden: bool,
}

/// Rewrite `html` (the same input `list` was discovered from) to reflect `view`.
pub fn render_page(html: &str, list: &DiscoveredList, view: &ListView) -> Result<String, RenderError> {
    if list.items.len() != view.items.len() {
        return Err(RenderError::ItemMismatch {
            view: view.items.len(),
            page: list.items.len(),
        });
    }

    let filter_html = view
        .filter
        .as_ref()
        .map(|filter| {
            render_template(
                YearFilterTemplate::from(filter),
                "presentation::render::year_filter",
            )
        })
        .transpose()?;
    let pagination_html = render_template(
        PaginationTemplate {
            controls: &view.pagination,
        },
        "presentation::render::pagination",
    )?;

    let states: HashMap<NodeId, ItemState> = list
        .items
        .iter()
        .zip(&view.items)
        .map(|(discovered, item)| {
            (
                discovered.node,
                ItemState {
                    year: item.year(),
                    filter_hidden: !item.is_filter_visible(),
                    page_hidden: !item.is_page_visible(),
                },
            )
        })
        .collect();
    let container = list.container;
    let mut ordinal: NodeId = 0;

    let rendered = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("*", move |el: &mut Element| {
                let current = ordinal;
                ordinal += 1;

                if current == container {
                    if let Some(filter_html) = filter_html.as_deref() {
                        el.before(filter_html, ContentType::Html);
                    }
                    el.after(&pagination_html, ContentType::Html);
                }

                if let Some(state) = states.get(&current) {
                    let classes = item_classes(el.get_attribute("class").as_deref(), state);
                    if classes.is_empty() {
                        el.remove_attribute("class");
                    } else {
                        el.set_attribute("class", &classes)?;
                    }
                    if let Some(year) = state.year {
                        el.set_attribute("data-year", &year.label())?;
                    }
                }
                Ok(())
            })],
            strict: false,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::Rewrite {
        message: err.to_string(),
    })?;

    trace!(
        target = "presentation::render",
        bytes = rendered.len(),
        "page rendered"
    );

    Ok(rendered)
}

fn item_classes(existing: Option<&str>, state: &ItemState) -> String {
    let mut classes: Vec<&str> = existing
        .unwrap_or_default()
        .split_ascii_whitespace()
        .filter(|class| *class != FILTER_HIDDEN_CLASS && *class != PAGE_HIDDEN_CLASS)
        .collect();
    if state.filter_hidden {
        classes.push(FILTER_HIDDEN_CLASS);
    }
    if state.page_hidden {
        classes.push(PAGE_HIDDEN_CLASS);
    }
    classes.join(" ")
}
