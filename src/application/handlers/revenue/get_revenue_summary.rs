//! GetRevenueSummaryHandler - Query handler for the quarter summary.
//!
//! Revenue against target for the requested quarter, the deltas against the
//! previous and year-ago quarters, and the per-month breakdown.

use std::sync::Arc;

use crate::domain::revenue::summary::recognized_revenue;
use crate::domain::revenue::{DateRange, MonthlyRevenue, RevenueSummary, SummaryInputs};
use crate::ports::RevenueReader;

use super::{AnalyticsError, QuarterQuery};

pub type GetRevenueSummaryQuery = QuarterQuery;

pub type GetRevenueSummaryResult = RevenueSummary;

pub struct GetRevenueSummaryHandler {
    reader: Arc<dyn RevenueReader>,
}

impl GetRevenueSummaryHandler {
    pub fn new(reader: Arc<dyn RevenueReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetRevenueSummaryQuery,
    ) -> Result<GetRevenueSummaryResult, AnalyticsError> {
        let windows = query.period.resolve();
        tracing::debug!(period = %query.period, "Computing revenue summary");

        let current = recognized_revenue(windows.current);
        let previous = recognized_revenue(windows.previous);
        let year_ago = recognized_revenue(windows.year_ago);

        let (current_revenue, previous_revenue, year_ago_revenue, targets) = tokio::try_join!(
            self.reader.sum_deal_amount(&current),
            self.reader.sum_deal_amount(&previous),
            self.reader.sum_deal_amount(&year_ago),
            self.reader.targets_for_months(&windows.months),
        )?;

        let mut monthly = Vec::with_capacity(windows.months.len());
        for month in windows.months {
            let revenue = self
                .reader
                .sum_deal_amount(&recognized_revenue(DateRange::of_month(month)))
                .await?;
            let target = targets.get(&month).copied().unwrap_or(0.0);
            monthly.push(MonthlyRevenue::new(month, revenue, target));
        }

        let target: f64 = windows
            .months
            .iter()
            .map(|month| targets.get(month).copied().unwrap_or(0.0))
            .sum();

        Ok(RevenueSummary::derive(
            &query.period,
            SummaryInputs {
                current_revenue,
                previous_revenue,
                year_ago_revenue,
                target,
                monthly,
            },
        ))
    }
}
