use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::foundation::YearMonth;
use crate::domain::revenue::{
    AccountActivity, DateRange, DealFilter, DealListing, DealOrder, RepWinLoss,
    SegmentPerformance, StageAggregate,
};

/// Read-only port over the revenue snapshot.
///
/// Every query is a pure read; implementations must be safe to call
/// concurrently from independent view computations.
#[async_trait]
pub trait RevenueReader: Send + Sync {
    /// Sum of non-null amounts over matching deals (0 when none match).
    async fn sum_deal_amount(&self, filter: &DealFilter) -> Result<f64, RevenueReadError>;

    /// Number of matching deals.
    async fn count_deals(&self, filter: &DealFilter) -> Result<u64, RevenueReadError>;

    /// Mean of non-null amounts over matching deals.
    async fn avg_deal_amount(&self, filter: &DealFilter) -> Result<Option<f64>, RevenueReadError>;

    /// Mean of `closed_at - created_at` in days over matching deals that
    /// have a recorded close date.
    async fn avg_deal_cycle_days(
        &self,
        filter: &DealFilter,
    ) -> Result<Option<f64>, RevenueReadError>;

    /// Amount sum and deal count per stage, in pipeline stage order.
    async fn group_deals_by_stage(
        &self,
        filter: &DealFilter,
    ) -> Result<Vec<StageAggregate>, RevenueReadError>;

    /// Matching deals joined with their account name.
    async fn list_deals(
        &self,
        filter: &DealFilter,
        order: DealOrder,
        limit: usize,
    ) -> Result<Vec<DealListing>, RevenueReadError>;

    /// Won/lost counts per rep for deals with a recorded close date inside
    /// `range`. Reps without decisions in the range are omitted. Ordered by
    /// rep id.
    async fn rep_win_loss_counts(
        &self,
        range: &DateRange,
    ) -> Result<Vec<RepWinLoss>, RevenueReadError>;

    /// Per account segment with at least one deal: pipeline open at
    /// `range.end` and decisions recorded inside `range`. Ordered by segment.
    async fn segment_pipeline_and_win_rate(
        &self,
        range: &DateRange,
    ) -> Result<Vec<SegmentPerformance>, RevenueReadError>;

    /// Accounts with an open deal at `open_as_of` whose latest activity on or
    /// before that date is missing or more than `activity_window_days` old.
    /// Ordered by open value, largest first.
    async fn accounts_with_stale_activity(
        &self,
        open_as_of: NaiveDate,
        activity_window_days: i64,
    ) -> Result<Vec<AccountActivity>, RevenueReadError>;

    /// Target per requested month; months without a target map to 0.
    async fn targets_for_months(
        &self,
        months: &[YearMonth],
    ) -> Result<HashMap<YearMonth, f64>, RevenueReadError>;
}

/// Errors surfaced by revenue readers.
#[derive(Debug, thiserror::Error)]
pub enum RevenueReadError {
    #[error("Revenue store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed row: {0}")]
    MalformedRow(String),
}

impl From<sqlx::Error> for RevenueReadError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                RevenueReadError::MalformedRow(err.to_string())
            }
            other => RevenueReadError::Unavailable(other.to_string()),
        }
    }
}
