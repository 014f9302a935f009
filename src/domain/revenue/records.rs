//! Aggregated rows returned by revenue readers.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::foundation::{AccountId, RepId};

use super::entities::{Deal, DealStage};
use super::metrics;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageAggregate {
    pub stage: DealStage,
    pub value: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DealListing {
    pub deal: Deal,
    pub account_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepWinLoss {
    pub rep_id: RepId,
    pub rep_name: String,
    pub won: u64,
    pub lost: u64,
}

impl RepWinLoss {
    pub fn total(&self) -> u64 {
        self.won + self.lost
    }

    pub fn win_rate(&self) -> f64 {
        metrics::win_rate(self.won, self.total())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPerformance {
    pub segment: String,
    pub open_count: u64,
    pub open_value: f64,
    pub won: u64,
    pub decided: u64,
}

impl SegmentPerformance {
    /// `None` when the segment had no decisions in the period.
    pub fn win_rate(&self) -> Option<f64> {
        metrics::win_rate_or_none(self.won, self.decided)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountActivity {
    pub account_id: AccountId,
    pub account_name: String,
    pub segment: String,
    pub open_count: u64,
    pub open_value: f64,
    pub last_activity: Option<NaiveDate>,
}
