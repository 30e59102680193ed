//! Year labels, the catalog of years seen across a post list, and the filter
//! choice that selects among them.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Serialize, Serializer};

use super::error::DomainError;

/// Selector value representing "every year".
pub const ALL_YEARS_VALUE: &str = "all";
pub const ALL_YEARS_LABEL: &str = "All years";

/// A four-digit year label extracted from post markup.
///
/// Ordering is numeric, so sorting a set of years never falls back to
/// lexical comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(u16);

impl Year {
    /// Parse a label made of exactly four ASCII digits.
    pub fn parse(label: &str) -> Result<Self, DomainError> {
        if label.len() != 4 || !label.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "`{label}` is not a four-digit year"
            )));
        }

        label
            .parse::<u16>()
            .map(Self)
            .map_err(|err| DomainError::validation(format!("`{label}`: {err}")))
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for Year {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Year {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Current state of the year filter: every post, or a single year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearChoice {
    #[default]
    All,
    Year(Year),
}

impl YearChoice {
    /// Selector value for this choice (`all` or the year label).
    pub fn value(self) -> String {
        match self {
            YearChoice::All => ALL_YEARS_VALUE.to_string(),
            YearChoice::Year(year) => year.label(),
        }
    }

    pub fn is_all(self) -> bool {
        matches!(self, YearChoice::All)
    }

    /// Whether an item carrying `year` passes this choice.
    pub fn admits(self, year: Option<Year>) -> bool {
        match self {
            YearChoice::All => true,
            YearChoice::Year(wanted) => year == Some(wanted),
        }
    }
}

impl fmt::Display for YearChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearChoice::All => f.write_str(ALL_YEARS_VALUE),
            YearChoice::Year(year) => year.fmt(f),
        }
    }
}

impl FromStr for YearChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == ALL_YEARS_VALUE {
            return Ok(YearChoice::All);
        }
        Year::parse(trimmed).map(YearChoice::Year)
    }
}

impl Serialize for YearChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Distinct years observed across all items of a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearCatalog {
    years: BTreeSet<Year>,
}

impl YearCatalog {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn contains(&self, year: Year) -> bool {
        self.years.contains(&year)
    }

    /// Newest year first.
    pub fn descending(&self) -> impl Iterator<Item = Year> + '_ {
        self.years.iter().rev().copied()
    }
}

impl FromIterator<Year> for YearCatalog {
    fn from_iter<I: IntoIterator<Item = Year>>(iter: I) -> Self {
        Self {
            years: iter.into_iter().collect(),
        }
    }
}

impl Serialize for YearCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.descending())
    }
}
