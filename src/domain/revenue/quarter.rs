//! Quarter resolution: turns a `(quarter, year)` pair into calendar windows.
//!
//! Quarter windows use fixed end days (`-03-31`, `-06-30`, `-09-30`,
//! `-12-31`); they are never computed from the calendar. Month windows, used
//! for monthly breakdowns, do use the true month length.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ValidationError, YearMonth};

/// Number of months in the revenue trend series.
pub const TRAILING_TREND_MONTHS: u32 = 6;

const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 9999;

/// A fiscal quarter label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// 1-based quarter number.
    pub fn number(&self) -> u32 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    /// First calendar month (1-12) of the quarter.
    pub fn first_month(&self) -> u32 {
        (self.number() - 1) * 3 + 1
    }

    /// Last calendar month (1-12) of the quarter.
    pub fn last_month(&self) -> u32 {
        self.number() * 3
    }

    fn fixed_end_day(&self) -> (u32, u32) {
        match self {
            Quarter::Q1 => (3, 31),
            Quarter::Q2 => (6, 30),
            Quarter::Q3 => (9, 30),
            Quarter::Q4 => (12, 31),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quarter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Q1" => Ok(Quarter::Q1),
            "Q2" => Ok(Quarter::Q2),
            "Q3" => Ok(Quarter::Q3),
            "Q4" => Ok(Quarter::Q4),
            "" => Err(ValidationError::empty_field("quarter")),
            other => Err(ValidationError::invalid_format(
                "quarter",
                format!("'{}' is not one of Q1, Q2, Q3, Q4", other),
            )),
        }
    }
}

/// An inclusive calendar-day range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Day range of one calendar month.
    pub fn of_month(month: YearMonth) -> Self {
        Self {
            start: month.first_day(),
            end: month.last_day(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A validated `(quarter, year)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FiscalQuarter {
    quarter: Quarter,
    year: i32,
}

impl FiscalQuarter {
    /// Creates a fiscal quarter, rejecting years outside four digits.
    pub fn new(quarter: Quarter, year: i32) -> Result<Self, ValidationError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ValidationError::out_of_range("year", MIN_YEAR, MAX_YEAR, year));
        }
        Ok(Self { quarter, year })
    }

    /// Parses raw request input such as `("Q3", "2025")`.
    ///
    /// Unknown labels and non-numeric years are rejected; nothing is
    /// defaulted.
    pub fn parse(quarter: &str, year: &str) -> Result<Self, ValidationError> {
        let quarter: Quarter = quarter.parse()?;
        let year = year.trim();
        if year.is_empty() {
            return Err(ValidationError::empty_field("year"));
        }
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "year",
                format!("'{}' is not a four-digit year", year),
            ));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| ValidationError::invalid_format("year", "not a number"))?;
        Self::new(quarter, year)
    }

    pub fn quarter(&self) -> Quarter {
        self.quarter
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Display label, e.g. `Q1 2025`.
    pub fn label(&self) -> String {
        format!("{} {}", self.quarter, self.year)
    }

    /// The immediately preceding quarter (`Q1` rolls back to `Q4` of the
    /// prior year).
    pub fn previous(&self) -> Self {
        match self.quarter {
            Quarter::Q1 => Self {
                quarter: Quarter::Q4,
                year: self.year - 1,
            },
            Quarter::Q2 => Self {
                quarter: Quarter::Q1,
                year: self.year,
            },
            Quarter::Q3 => Self {
                quarter: Quarter::Q2,
                year: self.year,
            },
            Quarter::Q4 => Self {
                quarter: Quarter::Q3,
                year: self.year,
            },
        }
    }

    /// The same quarter one year earlier.
    pub fn year_ago(&self) -> Self {
        Self {
            quarter: self.quarter,
            year: self.year - 1,
        }
    }

    /// Inclusive day range with fixed end days.
    pub fn range(&self) -> DateRange {
        let (end_month, end_day) = self.quarter.fixed_end_day();
        DateRange {
            start: ymd(self.year, self.quarter.first_month(), 1),
            end: ymd(self.year, end_month, end_day),
        }
    }

    /// The three months of the quarter in chronological order.
    pub fn months(&self) -> [YearMonth; 3] {
        let first = self.quarter.first_month();
        [
            self.month(first),
            self.month(first + 1),
            self.month(first + 2),
        ]
    }

    /// The last month of the quarter.
    pub fn end_month(&self) -> YearMonth {
        self.month(self.quarter.last_month())
    }

    /// `count` calendar months ending with the quarter's last month,
    /// oldest first.
    pub fn trailing_months(&self, count: u32) -> Vec<YearMonth> {
        let end = self.end_month();
        (0..count).rev().map(|back| end.months_back(back)).collect()
    }

    /// Resolves every window the views need in one pass.
    pub fn resolve(&self) -> QuarterWindows {
        QuarterWindows {
            period: *self,
            current: self.range(),
            previous: self.previous().range(),
            year_ago: self.year_ago().range(),
            months: self.months(),
            trailing_months: self.trailing_months(TRAILING_TREND_MONTHS),
        }
    }

    fn month(&self, month: u32) -> YearMonth {
        YearMonth::of(ymd(self.year, month, 1))
    }
}

impl fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quarter, self.year)
    }
}

/// All date windows derived from one requested quarter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterWindows {
    pub period: FiscalQuarter,
    pub current: DateRange,
    pub previous: DateRange,
    pub year_ago: DateRange,
    pub months: [YearMonth; 3],
    pub trailing_months: Vec<YearMonth>,
}

impl QuarterWindows {
    /// Reference date for point-in-time reconstruction (quarter end).
    pub fn reference_date(&self) -> NaiveDate {
        self.current.end
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use proptest::prelude::*;

    fn fq(quarter: Quarter, year: i32) -> FiscalQuarter {
        FiscalQuarter::new(quarter, year).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn quarter_ranges_use_fixed_end_days() {
        assert_eq!(fq(Quarter::Q1, 2024).range(), DateRange::new(date("2024-01-01"), date("2024-03-31")));
        assert_eq!(fq(Quarter::Q2, 2025).range(), DateRange::new(date("2025-04-01"), date("2025-06-30")));
        assert_eq!(fq(Quarter::Q3, 2025).range(), DateRange::new(date("2025-07-01"), date("2025-09-30")));
        assert_eq!(fq(Quarter::Q4, 2025).range(), DateRange::new(date("2025-10-01"), date("2025-12-31")));
    }

    #[test]
    fn months_are_chronological() {
        assert_eq!(
            fq(Quarter::Q4, 2025).months(),
            [ym("2025-10"), ym("2025-11"), ym("2025-12")]
        );
    }

    #[test]
    fn previous_of_q1_rolls_back_a_year() {
        assert_eq!(fq(Quarter::Q1, 2025).previous(), fq(Quarter::Q4, 2024));
        assert_eq!(fq(Quarter::Q3, 2025).previous(), fq(Quarter::Q2, 2025));
    }

    #[test]
    fn year_ago_keeps_quarter() {
        assert_eq!(fq(Quarter::Q2, 2025).year_ago(), fq(Quarter::Q2, 2024));
    }

    #[test]
    fn trailing_six_months_wrap_year() {
        let months = fq(Quarter::Q1, 2025).trailing_months(6);
        let rendered: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["2024-10", "2024-11", "2024-12", "2025-01", "2025-02", "2025-03"]
        );
    }

    #[test]
    fn resolve_collects_all_windows() {
        let windows = fq(Quarter::Q1, 2025).resolve();
        assert_eq!(windows.current.start, date("2025-01-01"));
        assert_eq!(windows.previous, DateRange::new(date("2024-10-01"), date("2024-12-31")));
        assert_eq!(windows.year_ago, DateRange::new(date("2024-01-01"), date("2024-03-31")));
        assert_eq!(windows.trailing_months.len(), 6);
        assert_eq!(windows.reference_date(), date("2025-03-31"));
    }

    #[test]
    fn label_formats_quarter_and_year() {
        assert_eq!(fq(Quarter::Q4, 2025).label(), "Q4 2025");
    }

    #[test]
    fn parse_rejects_unknown_quarter() {
        let err = FiscalQuarter::parse("Q5", "2025").unwrap_err();
        assert_eq!(err.field(), "quarter");
        assert!(FiscalQuarter::parse("q1", "2025").is_err());
        assert!(FiscalQuarter::parse("", "2025").is_err());
    }

    #[test]
    fn parse_rejects_bad_year() {
        assert_eq!(FiscalQuarter::parse("Q1", "25").unwrap_err().field(), "year");
        assert!(FiscalQuarter::parse("Q1", "20x5").is_err());
        assert!(FiscalQuarter::parse("Q1", "").is_err());
        assert!(FiscalQuarter::parse("Q1", "-202").is_err());
    }

    #[test]
    fn parse_accepts_valid_input() {
        assert_eq!(FiscalQuarter::parse("Q2", "2024").unwrap(), fq(Quarter::Q2, 2024));
        assert_eq!(FiscalQuarter::parse(" Q3 ", " 2025 ").unwrap(), fq(Quarter::Q3, 2025));
    }

    #[test]
    fn new_rejects_out_of_range_year() {
        assert!(FiscalQuarter::new(Quarter::Q1, 999).is_err());
        assert!(FiscalQuarter::new(Quarter::Q1, 10_000).is_err());
    }

    #[test]
    fn month_range_covers_whole_month() {
        let range = DateRange::of_month(ym("2024-02"));
        assert!(range.contains(date("2024-02-29")));
        assert!(!range.contains(date("2024-03-01")));
    }

    fn any_quarter() -> impl Strategy<Value = Quarter> {
        prop_oneof![
            Just(Quarter::Q1),
            Just(Quarter::Q2),
            Just(Quarter::Q3),
            Just(Quarter::Q4),
        ]
    }

    proptest! {
        #[test]
        fn range_spans_exactly_its_months(q in any_quarter(), year in 1001i32..9999) {
            let period = fq(q, year);
            let range = period.range();
            prop_assert!(range.start <= range.end);

            let months = period.months();
            prop_assert_eq!(YearMonth::of(range.start), months[0]);
            prop_assert_eq!(YearMonth::of(range.end), months[2]);
            for pair in months.windows(2) {
                prop_assert_eq!(pair[1].months_back(1), pair[0]);
            }
        }

        #[test]
        fn previous_quarter_steps_back_once(q in any_quarter(), year in 1001i32..9999) {
            let prev = fq(q, year).previous();
            if q == Quarter::Q1 {
                prop_assert_eq!(prev.quarter(), Quarter::Q4);
                prop_assert_eq!(prev.year(), year - 1);
            } else {
                prop_assert_eq!(prev.quarter().number(), q.number() - 1);
                prop_assert_eq!(prev.year(), year);
            }
        }

        #[test]
        fn trailing_months_are_six_consecutive(q in any_quarter(), year in 1001i32..9999) {
            let period = fq(q, year);
            let months = period.trailing_months(TRAILING_TREND_MONTHS);
            prop_assert_eq!(months.len(), 6);
            prop_assert_eq!(*months.last().unwrap(), period.end_month());
            for pair in months.windows(2) {
                prop_assert!(pair[0] < pair[1]);
                prop_assert_eq!(pair[1].months_back(1), pair[0]);
            }
            prop_assert_eq!(period.range().end.month(), period.end_month().month());
        }
    }
}
