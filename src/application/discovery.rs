//! Locates the post list container and its items, and gathers the markup
//! year extraction needs.

use thiserror::Error;
use tracing::debug;

use crate::domain::extract::{DateCandidate, ItemMarkup};

use super::document::{Document, DocumentError, NodeId, Selector};

/// Container candidates, highest priority first.
pub const LIST_SELECTORS: [&str; 4] = [".blog-posts", "ul.blog-posts", ".posts", "ul.posts"];

/// Item elements inside the container.
pub const ITEM_SELECTOR: &str = "li";

/// Date-like elements inside an item, highest priority first.
pub const DATE_SELECTORS: [&str; 4] = ["time[datetime]", "time", "span", ".date"];

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("post list not found")]
    ContainerNotFound,
    #[error("post list `{selector}` has no <li> elements")]
    NoItems { selector: &'static str },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug, Clone)]
pub struct DiscoveredItem {
    pub node: NodeId,
    pub markup: ItemMarkup,
}

#[derive(Debug, Clone)]
pub struct DiscoveredList {
    /// The selector that located the container.
    pub selector: &'static str,
    pub container: NodeId,
    /// Items in document order.
    pub items: Vec<DiscoveredItem>,
}

/// Find the post list: the first candidate selector matching anything wins,
/// and its first match in document order is the container.
pub fn discover(document: &Document) -> Result<DiscoveredList, DiscoveryError> {
    let mut located = None;
    for source in LIST_SELECTORS {
        let selector = Selector::parse(source)?;
        if let Some(container) = document.select_first(None, &selector) {
            located = Some((source, container));
            break;
        }
    }
    let (selector, container) = located.ok_or(DiscoveryError::ContainerNotFound)?;

    let item_selector = Selector::parse(ITEM_SELECTOR)?;
    let date_selectors = DATE_SELECTORS
        .iter()
        .map(|source| Selector::parse(source))
        .collect::<Result<Vec<_>, _>>()?;

    let items: Vec<DiscoveredItem> = document
        .select_all(Some(container), &item_selector)
        .map(|node| DiscoveredItem {
            node,
            markup: item_markup(document, node, &date_selectors),
        })
        .collect();

    if items.is_empty() {
        return Err(DiscoveryError::NoItems { selector });
    }

    debug!(
        target = "application::discovery",
        selector,
        container,
        items = items.len(),
        "post list located"
    );

    Ok(DiscoveredList {
        selector,
        container,
        items,
    })
}

fn item_markup(document: &Document, item: NodeId, date_selectors: &[Selector]) -> ItemMarkup {
    let candidates = date_selectors
        .iter()
        .filter_map(|selector| document.select_first(Some(item), selector))
        .map(|node| DateCandidate {
            datetime: document
                .node(node)
                .and_then(|n| n.attribute("datetime"))
                .map(str::to_string),
            text: document.text_content(node),
        })
        .collect();

    ItemMarkup {
        candidates,
        text: document.text_content(item),
    }
}
