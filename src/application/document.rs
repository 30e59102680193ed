//! Element tree assembled from a rendered page.
//!
//! `lol_html` streams and never materializes a DOM, so the tree is built from
//! its callbacks: start tags open nodes, end-tag handlers close them, and
//! document text chunks land in whichever node is open. Node ids follow
//! start-tag order, the same order a later `lol_html` pass over the same input
//! visits elements in.

use std::{cell::RefCell, rc::Rc};

use lol_html::{
    RewriteStrSettings, doc_text, element, end_tag, html_content::Element, rewrite_str,
};
use thiserror::Error;

/// Index of an element in document (start-tag) order.
pub type NodeId = usize;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to parse document: {message}")]
    Parse { message: String },
    #[error("unsupported selector `{selector}`")]
    Selector { selector: String },
}

impl DocumentError {
    fn selector(selector: &str) -> Self {
        Self::Selector {
            selector: selector.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum Content {
    Text(String),
    Element(NodeId),
}

#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
    content: Vec<Content>,
}

impl Node {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }
}

/// A compound selector: optional tag, optional class, optional attribute
/// presence (`ul.posts`, `.date`, `time[datetime]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    class: Option<String>,
    attribute: Option<String>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let trimmed = source.trim();

        let (head, attribute) = match trimmed.split_once('[') {
            Some((head, rest)) => {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| DocumentError::selector(source))?;
                (head, Some(name))
            }
            None => (trimmed, None),
        };

        let (tag, class) = match head.split_once('.') {
            Some((tag, class)) => (tag, Some(class)),
            None => (head, None),
        };

        let valid = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };

        if !class.is_none_or(valid) || !attribute.is_none_or(valid) {
            return Err(DocumentError::selector(source));
        }
        if !tag.is_empty() && !valid(tag) {
            return Err(DocumentError::selector(source));
        }
        if tag.is_empty() && class.is_none() && attribute.is_none() {
            return Err(DocumentError::selector(source));
        }

        Ok(Self {
            tag: (!tag.is_empty()).then(|| tag.to_ascii_lowercase()),
            class: class.map(str::to_string),
            attribute: attribute.map(str::to_ascii_lowercase),
        })
    }

    pub fn matches(&self, node: &Node) -> bool {
        self.tag
            .as_deref()
            .is_none_or(|tag| node.tag.eq_ignore_ascii_case(tag))
            && self.class.as_deref().is_none_or(|class| node.has_class(class))
            && self
                .attribute
                .as_deref()
                .is_none_or(|name| node.attribute(name).is_some())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn parse(html: &str) -> Result<Self, DocumentError> {
        let builder = Rc::new(RefCell::new(TreeBuilder::default()));

        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("*", {
                    let builder = Rc::clone(&builder);
                    move |el: &mut Element| {
                        let attributes = el
                            .attributes()
                            .iter()
                            .map(|attr| (attr.name(), attr.value()))
                            .collect();
                        let id = builder
                            .borrow_mut()
                            .open_element(el.tag_name(), attributes);

                        if el.can_have_content() {
                            let builder = Rc::clone(&builder);
                            el.on_end_tag(end_tag!(move |_end| {
                                builder.borrow_mut().close_element(id);
                                Ok(())
                            }))?;
                        } else {
                            // Void and self-closing elements never get an end tag.
                            builder.borrow_mut().close_element(id);
                        }
                        Ok(())
                    }
                })],
                document_content_handlers: vec![doc_text!({
                    let builder = Rc::clone(&builder);
                    move |chunk| {
                        builder.borrow_mut().push_text(chunk.as_str());
                        Ok(())
                    }
                })],
                strict: false,
                ..RewriteStrSettings::default()
            },
        )
        .map_err(|err| DocumentError::Parse {
            message: err.to_string(),
        })?;

        let builder = Rc::try_unwrap(builder)
            .map(RefCell::into_inner)
            .unwrap_or_else(|rc| rc.borrow().clone());

        Ok(Self {
            nodes: builder.nodes,
        })
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.node(node).and_then(Node::parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(Node::parent);
        }
        false
    }

    /// Every element below `scope` (or the whole document), in document order.
    pub fn descendants(&self, scope: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        let start = scope.map_or(0, |id| id + 1);
        (start..self.nodes.len())
            .take_while(move |&id| scope.is_none_or(|ancestor| self.is_descendant(id, ancestor)))
    }

    pub fn select_all<'a>(
        &'a self,
        scope: Option<NodeId>,
        selector: &'a Selector,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(scope)
            .filter(move |&id| selector.matches(&self.nodes[id]))
    }

    pub fn select_first(&self, scope: Option<NodeId>, selector: &Selector) -> Option<NodeId> {
        self.select_all(scope, selector).next()
    }

    /// Concatenated text of the element and everything below it.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        for content in &node.content {
            match content {
                Content::Text(text) => out.push_str(text),
                Content::Element(child) => self.collect_text(*child, out),
            }
        }
    }
}

/// Elements whose text is never rendered as page content.
const RAW_TEXT_TAGS: [&str; 3] = ["script", "style", "template"];

/// Start tags that close an open `<p>`.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Open elements a start tag closes implicitly, and the ancestors that stop
/// the search (HTML optional end tags).
fn implied_end(tag: &str) -> Option<(&'static [&'static str], &'static [&'static str])> {
    const BUTTON_SCOPE: &[&str] = &["table", "td", "th", "button"];

    match tag {
        "li" => Some((&["li"], &["ul", "ol", "menu", "table", "td", "th"])),
        "dt" | "dd" => Some((&["dt", "dd"], &["dl", "table", "td", "th"])),
        "option" => Some((&["option"], &["select", "datalist", "optgroup"])),
        "optgroup" => Some((&["optgroup", "option"], &["select"])),
        "tr" => Some((&["tr", "td", "th"], &["table", "thead", "tbody", "tfoot"])),
        "td" | "th" => Some((&["td", "th"], &["tr", "table"])),
        "thead" | "tbody" | "tfoot" => Some((&["thead", "tbody", "tfoot"], &["table"])),
        tag if BLOCK_TAGS.contains(&tag) => Some((&["p"], BUTTON_SCOPE)),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
struct TreeBuilder {
    nodes: Vec<Node>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn open_element(&mut self, tag: String, attributes: Vec<(String, String)>) -> NodeId {
        let tag = tag.to_ascii_lowercase();
        self.close_implied(&tag);

        let id = self.nodes.len();
        let parent = self.open.last().copied();
        self.nodes.push(Node {
            tag,
            attributes,
            parent,
            content: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].content.push(Content::Element(id));
        }
        self.open.push(id);
        id
    }

    /// `<li>` after an unclosed `<li>` starts a sibling, not a child. The
    /// parser never reports those end tags, so close them here.
    fn close_implied(&mut self, tag: &str) {
        let Some((closes, scope)) = implied_end(tag) else {
            return;
        };
        for index in (0..self.open.len()).rev() {
            let open = self.nodes[self.open[index]].tag.as_str();
            if closes.contains(&open) {
                self.open.truncate(index);
                return;
            }
            if scope.contains(&open) {
                return;
            }
        }
    }

    /// Close `id` together with anything opened inside it that never saw its
    /// own end tag.
    fn close_element(&mut self, id: NodeId) {
        if let Some(index) = self.open.iter().rposition(|&open| open == id) {
            self.open.truncate(index);
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(&current) = self.open.last() else {
            return;
        };
        if self
            .open
            .iter()
            .any(|&id| RAW_TEXT_TAGS.contains(&self.nodes[id].tag.as_str()))
        {
            return;
        }
        let content = &mut self.nodes[current].content;
        match content.last_mut() {
            Some(Content::Text(existing)) => existing.push_str(text),
            _ => content.push(Content::Text(text.to_string())),
        }
    }
}
