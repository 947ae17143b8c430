//! Typed query inputs: which countries and which years.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid year range {0:?}: expected LOW..HIGH, LOW:HIGH or YEAR")]
    InvalidRange(String),
}

/// The set of selected country identifiers.
///
/// An empty selection matches nothing. A lone name converts into a
/// one-element selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySelection(BTreeSet<String>);

impl CountrySelection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, country: &str) -> bool {
        self.0.contains(country)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for CountrySelection {
    fn from(country: &str) -> Self {
        Self(BTreeSet::from([country.to_string()]))
    }
}

impl From<String> for CountrySelection {
    fn from(country: String) -> Self {
        Self(BTreeSet::from([country]))
    }
}

impl From<Vec<String>> for CountrySelection {
    fn from(countries: Vec<String>) -> Self {
        countries.into_iter().collect()
    }
}

impl From<&[&str]> for CountrySelection {
    fn from(countries: &[&str]) -> Self {
        countries.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for CountrySelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Inclusive year range. `low > high` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub low: i32,
    pub high: i32,
}

impl YearRange {
    pub fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    pub fn single(year: i32) -> Self {
        Self::new(year, year)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.low <= year && year <= self.high
    }

    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.low, self.high)
    }
}

impl FromStr for YearRange {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || QueryError::InvalidRange(s.to_string());
        let bound = |part: &str| part.trim().parse::<i32>().map_err(|_| invalid());

        let (low, high) = if let Some((low, high)) = text.split_once("..") {
            (bound(low)?, bound(high)?)
        } else if let Some((low, high)) = text.split_once(':') {
            (bound(low)?, bound(high)?)
        } else {
            let year = bound(text)?;
            (year, year)
        };

        Ok(Self::new(low, high))
    }
}
