//! GetRevenueDriversHandler - Query handler for the drivers view.

use std::sync::Arc;

use crate::domain::foundation::YearMonth;
use crate::domain::revenue::drivers::{
    decided_in, open_pipeline, pipeline_by_stage, sales_cycles, won_in, won_with_close_date,
};
use crate::domain::revenue::summary::recognized_revenue;
use crate::domain::revenue::{DateRange, DriverInputs, MonthlyRevenue, PeriodDrivers, RevenueDrivers};
use crate::ports::{RevenueReadError, RevenueReader};

use super::{AnalyticsError, QuarterQuery};

pub type GetRevenueDriversQuery = QuarterQuery;

pub type GetRevenueDriversResult = RevenueDrivers;

/// Handler for the drivers view.
///
/// Pipeline is measured open at each quarter's end date; win rate, deal
/// size and cycle time over closures inside each quarter.
pub struct GetRevenueDriversHandler {
    reader: Arc<dyn RevenueReader>,
}

impl GetRevenueDriversHandler {
    pub fn new(reader: Arc<dyn RevenueReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetRevenueDriversQuery,
    ) -> Result<GetRevenueDriversResult, AnalyticsError> {
        let windows = query.period.resolve();
        tracing::debug!(period = %query.period, "Computing revenue drivers");

        let stage_filter = pipeline_by_stage(windows.reference_date());
        let (current, previous, stages, trend) = tokio::try_join!(
            self.period_drivers(windows.current),
            self.period_drivers(windows.previous),
            self.reader.group_deals_by_stage(&stage_filter),
            self.monthly_trend(&windows.trailing_months),
        )?;

        Ok(RevenueDrivers::derive(DriverInputs {
            current,
            previous,
            pipeline_by_stage: stages,
            monthly_trend: trend,
        }))
    }

    async fn period_drivers(&self, range: DateRange) -> Result<PeriodDrivers, RevenueReadError> {
        let pipeline = open_pipeline(range.end);
        let won = won_in(range);
        let decided = decided_in(range);
        let sized = won_with_close_date(range);
        let cycles = sales_cycles(range);

        let (pipeline, won, decided, avg_deal_size, avg_cycle_days) = tokio::try_join!(
            self.reader.sum_deal_amount(&pipeline),
            self.reader.count_deals(&won),
            self.reader.count_deals(&decided),
            self.reader.avg_deal_amount(&sized),
            self.reader.avg_deal_cycle_days(&cycles),
        )?;

        Ok(PeriodDrivers {
            pipeline,
            won,
            decided,
            avg_deal_size,
            avg_cycle_days,
        })
    }

    async fn monthly_trend(
        &self,
        months: &[YearMonth],
    ) -> Result<Vec<MonthlyRevenue>, RevenueReadError> {
        let targets = self.reader.targets_for_months(months).await?;
        let mut trend = Vec::with_capacity(months.len());
        for month in months {
            let revenue = self
                .reader
                .sum_deal_amount(&recognized_revenue(DateRange::of_month(*month)))
                .await?;
            let target = targets.get(month).copied().unwrap_or(0.0);
            trend.push(MonthlyRevenue::new(*month, revenue, target));
        }
        Ok(trend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::revenue::test_support::{closes_in, date, MockRevenueReader};
    use crate::domain::revenue::{DealStage, FiscalQuarter, Quarter, StageAggregate};

    fn q1_2025() -> GetRevenueDriversQuery {
        QuarterQuery::new(FiscalQuarter::new(Quarter::Q1, 2025).unwrap())
    }

    #[tokio::test]
    async fn test_drivers_compare_current_and_previous_quarter() {
        let mut reader = MockRevenueReader::new();
        reader.sum = Box::new(|filter| match filter.open_as_of {
            Some(d) if d == date(2025, 3, 31) => 150_000.0,
            Some(d) if d == date(2024, 12, 31) => 100_000.0,
            _ => 0.0,
        });
        reader.count = Box::new(|filter| {
            let current = closes_in(filter, date(2025, 1, 1));
            let won_only = filter.stages.as_deref() == Some(&[DealStage::ClosedWon][..]);
            match (current, won_only) {
                (true, true) => 2,
                (true, false) => 3,
                (false, true) => 1,
                (false, false) => 2,
            }
        });
        reader.avg_cycle = Box::new(|filter| {
            if closes_in(filter, date(2025, 1, 1)) {
                Some(45.0)
            } else {
                Some(50.0)
            }
        });
        reader.stages = vec![StageAggregate {
            stage: DealStage::Negotiation,
            value: 80_000.4,
            count: 3,
        }];

        let handler = GetRevenueDriversHandler::new(Arc::new(reader));
        let drivers = handler.handle(q1_2025()).await.unwrap();

        assert_eq!(drivers.pipeline_size, 150_000.0);
        assert_eq!(drivers.pipeline_change, 50.0);
        assert_eq!(drivers.win_rate, 66.7);
        assert_eq!(drivers.win_rate_change, 16.7);
        assert_eq!(drivers.avg_deal_size, 0.0);
        assert_eq!(drivers.sales_cycle_time, 45.0);
        assert_eq!(drivers.sales_cycle_time_change, -5.0);
        assert_eq!(drivers.pipeline_by_stage[0].value, 80_000.0);
    }

    #[tokio::test]
    async fn test_drivers_trend_covers_six_months() {
        let handler = GetRevenueDriversHandler::new(Arc::new(MockRevenueReader::new()));
        let drivers = handler.handle(q1_2025()).await.unwrap();

        let months: Vec<String> = drivers
            .monthly_trend
            .iter()
            .map(|m| m.month.to_string())
            .collect();
        assert_eq!(
            months,
            vec!["2024-10", "2024-11", "2024-12", "2025-01", "2025-02", "2025-03"]
        );
    }

    #[tokio::test]
    async fn test_drivers_propagate_reader_failure() {
        let handler = GetRevenueDriversHandler::new(Arc::new(MockRevenueReader::failing()));
        let result = handler.handle(q1_2025()).await;
        assert!(matches!(result, Err(AnalyticsError::ComputationFailed(_))));
    }
}
