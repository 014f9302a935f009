//! In-memory RevenueReader over an immutable snapshot.
//!
//! Every filtered query evaluates `DealFilter::matches`, so this reader and
//! the SQL reader share one definition of each clause.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::domain::foundation::{AccountId, DealId, RepId, YearMonth};
use crate::domain::revenue::{
    Account, AccountActivity, DateRange, Deal, DealFilter, DealListing, DealOrder, DealStage,
    RepWinLoss, SegmentPerformance, StageAggregate,
};
use crate::ports::{RevenueReadError, RevenueReader};

use super::RevenueSnapshot;

/// Read-only reader over a [`RevenueSnapshot`].
///
/// Cloning is cheap; clones share the same snapshot.
#[derive(Debug, Clone)]
pub struct InMemoryRevenueReader {
    snapshot: Arc<RevenueSnapshot>,
    accounts: Arc<HashMap<AccountId, usize>>,
}

impl InMemoryRevenueReader {
    pub fn new(snapshot: RevenueSnapshot) -> Self {
        let accounts = snapshot
            .accounts
            .iter()
            .enumerate()
            .map(|(i, account)| (account.account_id.clone(), i))
            .collect();
        Self {
            snapshot: Arc::new(snapshot),
            accounts: Arc::new(accounts),
        }
    }

    pub fn snapshot(&self) -> &RevenueSnapshot {
        &self.snapshot
    }

    fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id).map(|&i| &self.snapshot.accounts[i])
    }

    fn matching<'a>(&'a self, filter: &'a DealFilter) -> impl Iterator<Item = &'a Deal> + 'a {
        self.snapshot
            .deals
            .iter()
            .filter(move |deal| filter.matches(deal, self.account(&deal.account_id)))
    }

    /// Latest activity per account on or before `as_of`.
    fn last_activity_by_account(&self, as_of: NaiveDate) -> HashMap<&AccountId, NaiveDate> {
        let deal_accounts: HashMap<&DealId, &AccountId> = self
            .snapshot
            .deals
            .iter()
            .map(|deal| (&deal.deal_id, &deal.account_id))
            .collect();

        let mut latest: HashMap<&AccountId, NaiveDate> = HashMap::new();
        for activity in &self.snapshot.activities {
            if activity.occurred_on > as_of {
                continue;
            }
            if let Some(account_id) = deal_accounts.get(&activity.deal_id) {
                latest
                    .entry(*account_id)
                    .and_modify(|d| *d = (*d).max(activity.occurred_on))
                    .or_insert(activity.occurred_on);
            }
        }
        latest
    }
}

#[async_trait]
impl RevenueReader for InMemoryRevenueReader {
    async fn sum_deal_amount(&self, filter: &DealFilter) -> Result<f64, RevenueReadError> {
        Ok(self.matching(filter).filter_map(|deal| deal.amount).sum())
    }

    async fn count_deals(&self, filter: &DealFilter) -> Result<u64, RevenueReadError> {
        Ok(self.matching(filter).count() as u64)
    }

    async fn avg_deal_amount(&self, filter: &DealFilter) -> Result<Option<f64>, RevenueReadError> {
        Ok(mean(self.matching(filter).filter_map(|deal| deal.amount)))
    }

    async fn avg_deal_cycle_days(
        &self,
        filter: &DealFilter,
    ) -> Result<Option<f64>, RevenueReadError> {
        Ok(mean(
            self.matching(filter)
                .filter_map(|deal| deal.cycle_days())
                .map(|days| days as f64),
        ))
    }

    async fn group_deals_by_stage(
        &self,
        filter: &DealFilter,
    ) -> Result<Vec<StageAggregate>, RevenueReadError> {
        let mut groups: BTreeMap<DealStage, (f64, u64)> = BTreeMap::new();
        for deal in self.matching(filter) {
            let entry = groups.entry(deal.stage).or_default();
            entry.0 += deal.amount.unwrap_or(0.0);
            entry.1 += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(stage, (value, count))| StageAggregate {
                stage,
                value,
                count,
            })
            .collect())
    }

    async fn list_deals(
        &self,
        filter: &DealFilter,
        order: DealOrder,
        limit: usize,
    ) -> Result<Vec<DealListing>, RevenueReadError> {
        let mut rows: Vec<(&Deal, &Account)> = self
            .matching(filter)
            .filter_map(|deal| self.account(&deal.account_id).map(|acc| (deal, acc)))
            .collect();

        match order {
            DealOrder::AmountDesc => rows.sort_by(|(a, _), (b, _)| {
                b.amount
                    .unwrap_or(0.0)
                    .total_cmp(&a.amount.unwrap_or(0.0))
                    .then_with(|| a.deal_id.cmp(&b.deal_id))
            }),
            DealOrder::CreatedAsc => rows.sort_by(|(a, _), (b, _)| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.deal_id.cmp(&b.deal_id))
            }),
        }

        Ok(rows
            .into_iter()
            .take(limit)
            .map(|(deal, account)| DealListing {
                deal: deal.clone(),
                account_name: account.name.clone(),
            })
            .collect())
    }

    async fn rep_win_loss_counts(
        &self,
        range: &DateRange,
    ) -> Result<Vec<RepWinLoss>, RevenueReadError> {
        let names: HashMap<&RepId, &str> = self
            .snapshot
            .reps
            .iter()
            .map(|rep| (&rep.rep_id, rep.name.as_str()))
            .collect();

        let mut counts: BTreeMap<&RepId, (u64, u64)> = BTreeMap::new();
        for deal in &self.snapshot.deals {
            if !deal.stage.is_closed() || !deal.closed_by_date_within(range) {
                continue;
            }
            if !names.contains_key(&deal.rep_id) {
                continue;
            }
            let entry = counts.entry(&deal.rep_id).or_default();
            match deal.stage {
                DealStage::ClosedWon => entry.0 += 1,
                _ => entry.1 += 1,
            }
        }

        Ok(counts
            .into_iter()
            .map(|(rep_id, (won, lost))| RepWinLoss {
                rep_id: rep_id.clone(),
                rep_name: names.get(rep_id).copied().unwrap_or_default().to_string(),
                won,
                lost,
            })
            .collect())
    }

    async fn segment_pipeline_and_win_rate(
        &self,
        range: &DateRange,
    ) -> Result<Vec<SegmentPerformance>, RevenueReadError> {
        let mut segments: BTreeMap<&str, SegmentPerformance> = BTreeMap::new();
        for deal in &self.snapshot.deals {
            let Some(account) = self.account(&deal.account_id) else {
                continue;
            };
            let row = segments
                .entry(account.segment.as_str())
                .or_insert_with(|| SegmentPerformance {
                    segment: account.segment.clone(),
                    open_count: 0,
                    open_value: 0.0,
                    won: 0,
                    decided: 0,
                });

            if deal.stage.is_open() && deal.is_open_as_of(range.end) {
                row.open_count += 1;
                row.open_value += deal.amount.unwrap_or(0.0);
            }
            if deal.stage.is_closed() && deal.closed_by_date_within(range) {
                row.decided += 1;
                if deal.stage == DealStage::ClosedWon {
                    row.won += 1;
                }
            }
        }
        Ok(segments.into_values().collect())
    }

    async fn accounts_with_stale_activity(
        &self,
        open_as_of: NaiveDate,
        activity_window_days: i64,
    ) -> Result<Vec<AccountActivity>, RevenueReadError> {
        let mut open: BTreeMap<&AccountId, (u64, f64)> = BTreeMap::new();
        for deal in &self.snapshot.deals {
            if deal.stage.is_open() && deal.is_open_as_of(open_as_of) {
                let entry = open.entry(&deal.account_id).or_default();
                entry.0 += 1;
                entry.1 += deal.amount.unwrap_or(0.0);
            }
        }

        let latest = self.last_activity_by_account(open_as_of);
        let mut rows: Vec<AccountActivity> = open
            .into_iter()
            .filter_map(|(account_id, (open_count, open_value))| {
                let account = self.account(account_id)?;
                let last_activity = latest.get(account_id).copied();
                let quiet = last_activity
                    .map_or(true, |last| (open_as_of - last).num_days() > activity_window_days);
                quiet.then(|| AccountActivity {
                    account_id: account.account_id.clone(),
                    account_name: account.name.clone(),
                    segment: account.segment.clone(),
                    open_count,
                    open_value,
                    last_activity,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.open_value
                .total_cmp(&a.open_value)
                .then_with(|| a.account_id.cmp(&b.account_id))
        });
        Ok(rows)
    }

    async fn targets_for_months(
        &self,
        months: &[YearMonth],
    ) -> Result<HashMap<YearMonth, f64>, RevenueReadError> {
        Ok(months
            .iter()
            .map(|&month| (month, self.snapshot.target_for(month)))
            .collect())
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0u64), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
