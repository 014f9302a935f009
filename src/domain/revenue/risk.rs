//! Risk factors: stale deals, underperforming reps and quiet accounts.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::foundation::{AccountId, DealId, RepId};

use super::entities::DealStage;
use super::filter::{ClosingRule, DealFilter};
use super::metrics::round_tenth;
use super::quarter::DateRange;
use super::records::{AccountActivity, DealListing, RepWinLoss};

/// Reported in place of a day gap when an account has no activity at all.
pub const NO_ACTIVITY_SENTINEL_DAYS: i64 = 999;

/// Cut-offs and list sizes for the risk view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskThresholds {
    /// A deal older than this many days at the reference date is stale.
    pub stale_after_days: i64,
    /// Accounts without activity inside this window are low-activity.
    pub activity_window_days: i64,
    /// Stale deals listed (and summed into `totalValue`).
    pub stale_top_n: usize,
    pub max_underperforming_reps: usize,
    pub max_low_activity_accounts: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            stale_after_days: 30,
            activity_window_days: 14,
            stale_top_n: 10,
            max_underperforming_reps: 5,
            max_low_activity_accounts: 15,
        }
    }
}

/// Sized deals open at `reference` and older than `days`.
pub fn stale_deal_filter(reference: NaiveDate, days: i64) -> DealFilter {
    DealFilter::new()
        .stages(&DealStage::OPEN)
        .with_amount()
        .open_as_of(reference)
        .older_than(reference, days)
}

/// Won deals with a recorded close date in `range`.
pub fn wins_recorded_in(range: DateRange) -> DealFilter {
    DealFilter::new()
        .stage(DealStage::ClosedWon)
        .closed_within(range, ClosingRule::RecordedDateOnly)
}

/// Decided deals with a recorded close date in `range`.
pub fn decisions_recorded_in(range: DateRange) -> DealFilter {
    DealFilter::new()
        .stages(&DealStage::CLOSED)
        .closed_within(range, ClosingRule::RecordedDateOnly)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleDeal {
    pub deal_id: DealId,
    pub account_name: String,
    pub amount: f64,
    pub days_stale: i64,
    pub stage: DealStage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleDeals {
    /// Every stale deal, not just the listed ones.
    pub count: u64,
    /// Sum over the listed deals only.
    pub total_value: f64,
    pub deals: Vec<StaleDeal>,
}

impl StaleDeals {
    /// Builds the section from the unbounded count and the largest deals.
    pub fn new(count: u64, listings: Vec<DealListing>, reference: NaiveDate, top_n: usize) -> Self {
        let deals: Vec<StaleDeal> = listings
            .into_iter()
            .take(top_n)
            .map(|listing| StaleDeal {
                days_stale: listing.deal.age_days(reference),
                amount: listing.deal.amount.unwrap_or(0.0),
                stage: listing.deal.stage,
                deal_id: listing.deal.deal_id,
                account_name: listing.account_name,
            })
            .collect();

        Self {
            count,
            total_value: deals.iter().map(|d| d.amount).sum(),
            deals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderperformingRep {
    pub rep_id: RepId,
    pub rep_name: String,
    #[serde(rename = "winRate")]
    pub win_rate: f64,
    #[serde(rename = "dealsWon")]
    pub deals_won: u64,
    #[serde(rename = "dealsLost")]
    pub deals_lost: u64,
    #[serde(rename = "avgWinRate")]
    pub avg_win_rate: f64,
}

/// Reps whose win rate is strictly below `cohort_rate`, worst first.
///
/// Comparison and ordering use unrounded rates; equal rates keep the input
/// order.
pub fn underperforming_reps(
    reps: &[RepWinLoss],
    cohort_rate: f64,
    limit: usize,
) -> Vec<UnderperformingRep> {
    let mut below: Vec<(f64, &RepWinLoss)> = reps
        .iter()
        .filter(|rep| rep.total() > 0)
        .map(|rep| (rep.win_rate(), rep))
        .filter(|(rate, _)| *rate < cohort_rate)
        .collect();
    below.sort_by(|a, b| a.0.total_cmp(&b.0));

    below
        .into_iter()
        .take(limit)
        .map(|(rate, rep)| UnderperformingRep {
            rep_id: rep.rep_id.clone(),
            rep_name: rep.rep_name.clone(),
            win_rate: round_tenth(rate),
            deals_won: rep.won,
            deals_lost: rep.lost,
            avg_win_rate: round_tenth(cohort_rate),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowActivityAccount {
    pub account_id: AccountId,
    pub account_name: String,
    pub segment: String,
    #[serde(rename = "openDeals")]
    pub open_deals: u64,
    #[serde(rename = "totalValue")]
    pub total_value: f64,
    #[serde(rename = "lastActivityDate")]
    pub last_activity_date: Option<NaiveDate>,
    #[serde(rename = "daysSinceActivity")]
    pub days_since_activity: i64,
}

impl LowActivityAccount {
    pub fn from_activity(account: AccountActivity, reference: NaiveDate) -> Self {
        let days_since_activity = account
            .last_activity
            .map_or(NO_ACTIVITY_SENTINEL_DAYS, |last| (reference - last).num_days());

        Self {
            account_id: account.account_id,
            account_name: account.account_name,
            segment: account.segment,
            open_deals: account.open_count,
            total_value: account.open_value,
            last_activity_date: account.last_activity,
            days_since_activity,
        }
    }
}

/// Largest `limit` accounts by open value; equal values by account id.
pub fn low_activity_accounts(
    mut accounts: Vec<AccountActivity>,
    reference: NaiveDate,
    limit: usize,
) -> Vec<LowActivityAccount> {
    accounts.sort_by(|a, b| {
        b.open_value
            .total_cmp(&a.open_value)
            .then_with(|| a.account_id.cmp(&b.account_id))
    });
    accounts
        .into_iter()
        .take(limit)
        .map(|account| LowActivityAccount::from_activity(account, reference))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub stale_deals_count: u64,
    pub underperforming_reps_count: usize,
    pub low_activity_accounts_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub stale_deals: StaleDeals,
    pub underperforming_reps: Vec<UnderperformingRep>,
    pub low_activity_accounts: Vec<LowActivityAccount>,
    pub summary: RiskSummary,
}

impl RiskFactors {
    pub fn assemble(
        stale_deals: StaleDeals,
        underperforming_reps: Vec<UnderperformingRep>,
        low_activity_accounts: Vec<LowActivityAccount>,
    ) -> Self {
        let summary = RiskSummary {
            stale_deals_count: stale_deals.count,
            underperforming_reps_count: underperforming_reps.len(),
            low_activity_accounts_count: low_activity_accounts.len(),
        };
        Self {
            stale_deals,
            underperforming_reps,
            low_activity_accounts,
            summary,
        }
    }
}
