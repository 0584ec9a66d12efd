//! Core data types for the vacancy statistics system.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar year used as the year bucket key.
pub type Year = i32;

/// Extract the year bucket from a published timestamp.
///
/// Only the first four characters are inspected; any format is accepted as
/// long as it starts with `YYYY`.
pub fn year_of(published_at: &str) -> Result<Year> {
    let prefix: String = published_at.chars().take(4).collect();
    if prefix.len() != 4 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed_timestamp(published_at));
    }
    prefix
        .parse()
        .map_err(|_| Error::malformed_timestamp(published_at))
}

/// Salary fork as published, in the vacancy's own currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    /// Lower bound.
    pub from: f64,
    /// Upper bound.
    pub to: f64,
    /// Currency code (e.g., "RUR", "USD").
    pub currency: String,
}

impl SalaryRange {
    pub fn new(from: f64, to: f64, currency: impl Into<String>) -> Self {
        Self {
            from,
            to,
            currency: currency.into(),
        }
    }

    /// Arithmetic mean of the bounds.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.from + self.to) / 2.0
    }

    /// Whether a value lies within the fork, bounds included.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.from <= value && value <= self.to
    }
}

/// A single vacancy as read from a CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacancyRecord {
    /// Profession name.
    pub name: String,
    /// Salary fork.
    pub salary: SalaryRange,
    /// City name.
    pub area_name: String,
    /// Published timestamp, kept as text.
    pub published_at: String,
}

impl VacancyRecord {
    /// Year bucket of this vacancy.
    pub fn year(&self) -> Result<Year> {
        year_of(&self.published_at)
    }

    /// Calendar date of publication, when the timestamp starts with `YYYY-MM-DD`.
    pub fn published_date(&self) -> Option<NaiveDate> {
        let date = self.published_at.get(..10)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

/// Case-sensitive substring filter on the profession name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfessionFilter(String);

impl ProfessionFilter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ordinary substring containment; an empty pattern matches everything.
    #[inline]
    pub fn matches(&self, profession: &str) -> bool {
        profession.contains(self.0.as_str())
    }
}

impl fmt::Display for ProfessionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized view of one vacancy, ready for aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VacancyPoint<'a> {
    /// Year bucket.
    pub year: Year,
    /// City bucket.
    pub city: &'a str,
    /// Salary in the reference currency.
    pub salary: f64,
    /// Whether the profession name matched the filter.
    pub matches_profession: bool,
}
