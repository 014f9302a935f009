//! GetRiskFactorsHandler - Query handler for the risk view.

use std::sync::Arc;

use crate::domain::revenue::metrics::win_rate;
use crate::domain::revenue::risk::{
    decisions_recorded_in, low_activity_accounts, stale_deal_filter, underperforming_reps,
    wins_recorded_in,
};
use crate::domain::revenue::{DealOrder, RiskFactors, RiskThresholds, StaleDeals};
use crate::ports::RevenueReader;

use super::{AnalyticsError, QuarterQuery};

pub type GetRiskFactorsQuery = QuarterQuery;

pub type GetRiskFactorsResult = RiskFactors;

pub struct GetRiskFactorsHandler {
    reader: Arc<dyn RevenueReader>,
    thresholds: RiskThresholds,
}

impl GetRiskFactorsHandler {
    pub fn new(reader: Arc<dyn RevenueReader>) -> Self {
        Self::with_thresholds(reader, RiskThresholds::default())
    }

    pub fn with_thresholds(reader: Arc<dyn RevenueReader>, thresholds: RiskThresholds) -> Self {
        Self { reader, thresholds }
    }

    pub async fn handle(
        &self,
        query: GetRiskFactorsQuery,
    ) -> Result<GetRiskFactorsResult, AnalyticsError> {
        let windows = query.period.resolve();
        let reference = windows.reference_date();
        let t = self.thresholds;
        tracing::debug!(period = %query.period, "Computing risk factors");

        let stale = stale_deal_filter(reference, t.stale_after_days);
        let wins = wins_recorded_in(windows.current);
        let decisions = decisions_recorded_in(windows.current);

        let (stale_count, stale_listings, won, decided, reps, accounts) = tokio::try_join!(
            self.reader.count_deals(&stale),
            self.reader
                .list_deals(&stale, DealOrder::AmountDesc, t.stale_top_n),
            self.reader.count_deals(&wins),
            self.reader.count_deals(&decisions),
            self.reader.rep_win_loss_counts(&windows.current),
            self.reader
                .accounts_with_stale_activity(reference, t.activity_window_days),
        )?;

        let cohort_rate = win_rate(won, decided);

        Ok(RiskFactors::assemble(
            StaleDeals::new(stale_count, stale_listings, reference, t.stale_top_n),
            underperforming_reps(&reps, cohort_rate, t.max_underperforming_reps),
            low_activity_accounts(accounts, reference, t.max_low_activity_accounts),
        ))
    }
}
