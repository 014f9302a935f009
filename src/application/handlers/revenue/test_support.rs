//! Hand-written reader double shared by the revenue handler tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::YearMonth;
use crate::domain::revenue::{
    AccountActivity, DateRange, DealFilter, DealListing, DealOrder, RepWinLoss,
    SegmentPerformance, StageAggregate,
};
use crate::ports::{RevenueReadError, RevenueReader};

type FilterFn<T> = Box<dyn Fn(&DealFilter) -> T + Send + Sync>;

pub struct MockRevenueReader {
    pub sum: FilterFn<f64>,
    pub count: FilterFn<u64>,
    pub avg_amount: FilterFn<Option<f64>>,
    pub avg_cycle: FilterFn<Option<f64>>,
    pub stages: Vec<StageAggregate>,
    pub listings: Vec<DealListing>,
    pub reps: Vec<RepWinLoss>,
    pub segments: Vec<SegmentPerformance>,
    pub accounts: Vec<AccountActivity>,
    pub targets: HashMap<YearMonth, f64>,
    pub should_fail: bool,
    pub list_limits: Mutex<Vec<usize>>,
}

impl MockRevenueReader {
    pub fn new() -> Self {
        Self {
            sum: Box::new(|_| 0.0),
            count: Box::new(|_| 0),
            avg_amount: Box::new(|_| None),
            avg_cycle: Box::new(|_| None),
            stages: vec![],
            listings: vec![],
            reps: vec![],
            segments: vec![],
            accounts: vec![],
            targets: HashMap::new(),
            should_fail: false,
            list_limits: Mutex::new(vec![]),
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    fn check(&self) -> Result<(), RevenueReadError> {
        if self.should_fail {
            Err(RevenueReadError::Unavailable("Simulated failure".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Whether `filter` restricts closures to the window starting at `start`.
pub fn closes_in(filter: &DealFilter, start: NaiveDate) -> bool {
    filter
        .closed_within
        .map_or(false, |closed| closed.range.start == start)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[async_trait]
impl RevenueReader for MockRevenueReader {
    async fn sum_deal_amount(&self, filter: &DealFilter) -> Result<f64, RevenueReadError> {
        self.check()?;
        Ok((self.sum)(filter))
    }

    async fn count_deals(&self, filter: &DealFilter) -> Result<u64, RevenueReadError> {
        self.check()?;
        Ok((self.count)(filter))
    }

    async fn avg_deal_amount(&self, filter: &DealFilter) -> Result<Option<f64>, RevenueReadError> {
        self.check()?;
        Ok((self.avg_amount)(filter))
    }

    async fn avg_deal_cycle_days(
        &self,
        filter: &DealFilter,
    ) -> Result<Option<f64>, RevenueReadError> {
        self.check()?;
        Ok((self.avg_cycle)(filter))
    }

    async fn group_deals_by_stage(
        &self,
        _filter: &DealFilter,
    ) -> Result<Vec<StageAggregate>, RevenueReadError> {
        self.check()?;
        Ok(self.stages.clone())
    }

    async fn list_deals(
        &self,
        _filter: &DealFilter,
        _order: DealOrder,
        limit: usize,
    ) -> Result<Vec<DealListing>, RevenueReadError> {
        self.check()?;
        self.list_limits.lock().unwrap().push(limit);
        Ok(self.listings.iter().take(limit).cloned().collect())
    }

    async fn rep_win_loss_counts(
        &self,
        _range: &DateRange,
    ) -> Result<Vec<RepWinLoss>, RevenueReadError> {
        self.check()?;
        Ok(self.reps.clone())
    }

    async fn segment_pipeline_and_win_rate(
        &self,
        _range: &DateRange,
    ) -> Result<Vec<SegmentPerformance>, RevenueReadError> {
        self.check()?;
        Ok(self.segments.clone())
    }

    async fn accounts_with_stale_activity(
        &self,
        _open_as_of: NaiveDate,
        _activity_window_days: i64,
    ) -> Result<Vec<AccountActivity>, RevenueReadError> {
        self.check()?;
        Ok(self.accounts.clone())
    }

    async fn targets_for_months(
        &self,
        months: &[YearMonth],
    ) -> Result<HashMap<YearMonth, f64>, RevenueReadError> {
        self.check()?;
        Ok(months
            .iter()
            .map(|m| (*m, self.targets.get(m).copied().unwrap_or(0.0)))
            .collect())
    }
}
