//! Snapshot entities: accounts, reps, deals, activities and monthly targets.
//!
//! The engine only reads these. Deals carry no stored open/closed flag; the
//! state on any historical date is rebuilt from `created_at`/`closed_at`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    AccountId, ActivityId, DealId, RepId, ValidationError, YearMonth,
};

use super::quarter::DateRange;

/// Segment label that marks enterprise accounts.
pub const ENTERPRISE_SEGMENT: &str = "Enterprise";

/// Deal pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DealStage {
    Prospecting,
    Negotiation,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl DealStage {
    /// Stages of a deal that is still being worked.
    pub const OPEN: [DealStage; 2] = [DealStage::Prospecting, DealStage::Negotiation];

    /// Stages of a decided deal.
    pub const CLOSED: [DealStage; 2] = [DealStage::ClosedWon, DealStage::ClosedLost];

    pub fn is_open(&self) -> bool {
        matches!(self, DealStage::Prospecting | DealStage::Negotiation)
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Prospecting => "Prospecting",
            DealStage::Negotiation => "Negotiation",
            DealStage::ClosedWon => "Closed Won",
            DealStage::ClosedLost => "Closed Lost",
        }
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Prospecting" => Ok(DealStage::Prospecting),
            "Negotiation" => Ok(DealStage::Negotiation),
            "Closed Won" => Ok(DealStage::ClosedWon),
            "Closed Lost" => Ok(DealStage::ClosedLost),
            other => Err(ValidationError::invalid_format(
                "stage",
                format!("unknown deal stage '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub name: String,
    pub industry: String,
    pub segment: String,
}

impl Account {
    pub fn is_enterprise(&self) -> bool {
        self.segment == ENTERPRISE_SEGMENT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rep {
    pub rep_id: RepId,
    pub name: String,
}

/// How a deal's closing date is attributed to a period.
///
/// A won deal without a recorded close date is attributed by its creation
/// date. Keeping the two paths apart lets each rule decide whether it
/// accepts the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    /// Still open, no closing date applies.
    Open,
    /// Closed on the recorded `closed_at` date.
    ClosedByDate(NaiveDate),
    /// Closed stage but no `closed_at`; `created_at` stands in.
    ClosedByFallbackCreation(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub deal_id: DealId,
    pub account_id: AccountId,
    pub rep_id: RepId,
    pub stage: DealStage,
    /// `None` while the deal is not yet sized.
    pub amount: Option<f64>,
    pub created_at: NaiveDate,
    /// `None` while the deal is open.
    pub closed_at: Option<NaiveDate>,
}

impl Deal {
    /// Whether the deal's lifecycle `[created_at, closed_at)` contains `date`.
    ///
    /// Stage is not consulted: a deal with `closed_at <= date` is closed on
    /// that date whatever its stage says.
    pub fn is_open_as_of(&self, date: NaiveDate) -> bool {
        self.created_at <= date && self.closed_at.map_or(true, |closed| closed > date)
    }

    pub fn closure(&self) -> Closure {
        match (self.closed_at, self.stage.is_closed()) {
            (Some(closed), _) => Closure::ClosedByDate(closed),
            (None, true) => Closure::ClosedByFallbackCreation(self.created_at),
            (None, false) => Closure::Open,
        }
    }

    /// Whole days between creation and `reference`.
    pub fn age_days(&self, reference: NaiveDate) -> i64 {
        (reference - self.created_at).num_days()
    }

    /// Whole days from creation to the recorded close date.
    pub fn cycle_days(&self) -> Option<i64> {
        self.closed_at.map(|closed| (closed - self.created_at).num_days())
    }

    pub fn closed_by_date_within(&self, range: &DateRange) -> bool {
        matches!(self.closure(), Closure::ClosedByDate(d) if range.contains(d))
    }

    pub fn closed_within_with_fallback(&self, range: &DateRange) -> bool {
        match self.closure() {
            Closure::ClosedByDate(d) | Closure::ClosedByFallbackCreation(d) => range.contains(d),
            Closure::Open => false,
        }
    }
}

/// An engagement touchpoint on a deal. Only its date matters here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: ActivityId,
    pub deal_id: DealId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "timestamp")]
    pub occurred_on: NaiveDate,
}

/// Revenue goal for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTarget {
    pub month: YearMonth,
    pub target: f64,
}
