//! Calendar month value object (`YYYY-MM`).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// A calendar month, rendered as `YYYY-MM`.
///
/// Targets are keyed by this value and month-level revenue breakdowns are
/// reported against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month, validating both components.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1000..=9999).contains(&year) {
            return Err(ValidationError::out_of_range("year", 1000, 9999, year));
        }
        if !(1..=12).contains(&month) {
            return Err(ValidationError::out_of_range("month", 1, 12, month as i32));
        }
        Ok(Self { year, month })
    }

    /// The month containing the given date.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month `n` months before this one, rolling over year boundaries.
    pub fn months_back(&self, n: u32) -> Self {
        let mut month = self.month as i64 - n as i64;
        let mut year = self.year;
        while month <= 0 {
            month += 12;
            year -= 1;
        }
        Self {
            year,
            month: month as u32,
        }
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month (leap-aware).
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ValidationError::invalid_format("month", "expected YYYY-MM"))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(ValidationError::invalid_format("month", "expected YYYY-MM"));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| ValidationError::invalid_format("month", "year is not numeric"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| ValidationError::invalid_format("month", "month is not numeric"))?;
        Self::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
