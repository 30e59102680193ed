//! URL Page Marker: the `page=<n>` fragment that persists the current page.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static PAGE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"page=([0-9]+)").expect("page marker pattern compiles"));

/// Where the page marker lives. Writes replace the current entry; they never
/// reload the page or grow the history stack.
pub trait Location {
    /// Current fragment without the leading `#`.
    fn fragment(&self) -> Option<String>;

    /// Replace the whole fragment in place.
    fn replace_fragment(&mut self, fragment: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMarker(usize);

impl PageMarker {
    pub fn new(page: usize) -> Self {
        Self(page.max(1))
    }

    pub fn page(self) -> usize {
        self.0
    }

    /// Read the first `page=<digits>` run in `fragment`. Zero becomes one and
    /// values too large for `usize` saturate.
    pub fn parse(fragment: &str) -> Option<Self> {
        let digits = PAGE_MARKER.captures(fragment)?.get(1)?.as_str();
        let page = digits.parse::<usize>().unwrap_or(usize::MAX);
        Some(Self::new(page))
    }

    /// Requested page from a location, defaulting to the first page.
    pub fn requested(location: &impl Location) -> usize {
        location
            .fragment()
            .as_deref()
            .and_then(Self::parse)
            .map_or(1, Self::page)
    }
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page={}", self.0)
    }
}

/// In-memory location backed by a parsed URL.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    url: Url,
    replacements: usize,
}

impl MemoryLocation {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            replacements: 0,
        }
    }

    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self::new)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Number of fragment writes so far.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> Option<String> {
        self.url.fragment().map(str::to_string)
    }

    fn replace_fragment(&mut self, fragment: &str) {
        self.url.set_fragment(Some(fragment));
        self.replacements += 1;
    }
}
