#![allow(dead_code)]

use std::num::NonZeroUsize;

use postpager::application::{location::MemoryLocation, session::Session};

pub const BLOG_URL: &str = "https://blog.test/posts/";

/// A blog index with one `li` per entry; `Some(year)` entries carry a
/// `<time datetime>` stamp, `None` entries carry no date at all.
pub fn blog_page(years: &[Option<&str>]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<html><head><title>Blog</title></head><body>\n<main>\n<h1>Writing</h1>\n<ul class=\"blog-posts\">\n",
    );
    for (index, year) in years.iter().enumerate() {
        match year {
            Some(year) => html.push_str(&format!(
                "<li class=\"post\"><a href=\"/posts/entry-{index}\">Entry</a> <time datetime=\"{year}-06-01\">June 1, {year}</time></li>\n"
            )),
            None => html.push_str(&format!(
                "<li class=\"post\"><a href=\"/posts/entry-{index}\">Untitled entry</a></li>\n"
            )),
        }
    }
    html.push_str("</ul>\n<footer>Thanks for reading</footer>\n</main>\n</body></html>\n");
    html
}

pub fn repeat(year: Option<&'static str>, count: usize) -> Vec<Option<&'static str>> {
    vec![year; count]
}

pub fn attach(html: &str, url: &str, page_size: usize) -> Session<MemoryLocation> {
    let location = MemoryLocation::parse(url).expect("valid url");
    let page_size = NonZeroUsize::new(page_size).expect("non-zero page size");
    Session::attach(html, location, page_size)
        .expect("document parses")
        .expect("post list discovered")
}

pub fn fragment(session: &Session<MemoryLocation>) -> Option<String> {
    session
        .controller()
        .location()
        .url()
        .fragment()
        .map(str::to_string)
}

/// Positions of items that are both filter- and page-visible.
pub fn visible_positions(session: &Session<MemoryLocation>) -> Vec<usize> {
    session
        .controller()
        .items()
        .iter()
        .filter(|item| item.is_visible())
        .map(|item| item.position())
        .collect()
}
