//! Best-effort year extraction from post markup.
//!
//! This is a heuristic, not a date parser. Candidates are tried in priority
//! order and the first hit wins; malformed or missing structured dates simply
//! fall through to the next attempt.

use once_cell::sync::Lazy;
use regex::Regex;

use super::year::Year;

static LEADING_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})").expect("leading year pattern compiles"));
static TEXT_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:20|19)[0-9]{2}").expect("text year pattern compiles"));

/// A nested date-like element found inside an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateCandidate {
    /// Machine-readable `datetime` attribute, when present.
    pub datetime: Option<String>,
    /// Visible text content.
    pub text: String,
}

/// The parts of an item's markup that year extraction looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemMarkup {
    /// Date-like nested elements, highest priority first.
    pub candidates: Vec<DateCandidate>,
    /// The item's entire text content.
    pub text: String,
}

/// Derive the year label for one item.
///
/// For each candidate the `datetime` attribute's leading four digits are
/// tried before its trimmed text; the item's full text is the last resort.
pub fn extract_year(markup: &ItemMarkup) -> Option<Year> {
    markup
        .candidates
        .iter()
        .find_map(candidate_year)
        .or_else(|| text_year(&markup.text))
}

fn candidate_year(candidate: &DateCandidate) -> Option<Year> {
    candidate
        .datetime
        .as_deref()
        .and_then(datetime_year)
        .or_else(|| text_year(candidate.text.trim()))
}

fn datetime_year(datetime: &str) -> Option<Year> {
    LEADING_YEAR
        .captures(datetime)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Year::parse(m.as_str()).ok())
}

fn text_year(text: &str) -> Option<Year> {
    TEXT_YEAR
        .find(text)
        .and_then(|m| Year::parse(m.as_str()).ok())
}
