use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when a competence token cannot be read as a calendar month.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodParseError {
    /// The token does not have the expected `MM/YYYY` (or `YYYY-MM`) shape.
    #[error("malformed period '{0}'")]
    Malformed(String),

    /// The month component is outside 1..=12.
    #[error("month {month} out of range in period '{input}'")]
    MonthOutOfRange { input: String, month: u32 },
}

/// A calendar month, the unit every contribution is computed for.
///
/// Ordering is chronological: year first, then month.
///
/// ```
/// use inss_core::Period;
///
/// let period: Period = "03/2024".parse().unwrap();
/// assert_eq!(period, Period::new(2024, 3).unwrap());
/// assert_eq!(period.to_string(), "03/2024");
/// assert!(Period::new(2023, 12).unwrap() < period);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(
        year: i32,
        month: u32,
    ) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::MonthOutOfRange {
                input: format!("{month:02}/{year:04}"),
                month,
            });
        }
        Ok(Self { year, month })
    }

    /// Builds a period from a `const` context without range checks.
    /// Only used for literal table keys.
    pub(crate) const fn from_parts(
        year: i32,
        month: u32,
    ) -> Self {
        Self { year, month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First month of an analysis window reaching `years` back from `today`:
    /// the same calendar month, `years` years earlier.
    pub fn window_start(
        today: NaiveDate,
        years: u32,
    ) -> Self {
        let years = i32::try_from(years).unwrap_or(i32::MAX);
        Self {
            year: today.year().saturating_sub(years),
            month: today.month(),
        }
    }

    /// Parses the `YYYY-MM` form used for rate-table effective dates.
    pub fn parse_iso(s: &str) -> Result<Self, PeriodParseError> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| PeriodParseError::Malformed(trimmed.to_string()))?;
        Self::from_components(trimmed, year, month)
    }

    /// Formats as `YYYY-MM`.
    pub fn to_iso(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    fn from_components(
        input: &str,
        year: &str,
        month: &str,
    ) -> Result<Self, PeriodParseError> {
        let malformed = || PeriodParseError::Malformed(input.to_string());

        if year.len() != 4 || month.len() != 2 {
            return Err(malformed());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;

        Self::new(year, month).map_err(|_| PeriodParseError::MonthOutOfRange {
            input: input.to_string(),
            month,
        })
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    /// Parses the statement's `MM/YYYY` competence token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (month, year) = trimmed
            .split_once('/')
            .ok_or_else(|| PeriodParseError::Malformed(trimmed.to_string()))?;
        Self::from_components(trimmed, year, month)
    }
}

impl fmt::Display for Period {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
