//! GetRecommendationsHandler - Query handler for ranked recommendations.

use std::sync::Arc;

use crate::domain::revenue::recommendation::{
    aging_enterprise_deals, evaluate_rules, negotiation_deals, INACTIVITY_WINDOW_DAYS,
};
use crate::domain::revenue::{DealFilter, DealTally, Recommendations, RuleInputs};
use crate::ports::{RevenueReadError, RevenueReader};

use super::{AnalyticsError, QuarterQuery};

pub type GetRecommendationsQuery = QuarterQuery;

pub type GetRecommendationsResult = Recommendations;

pub struct GetRecommendationsHandler {
    reader: Arc<dyn RevenueReader>,
}

impl GetRecommendationsHandler {
    pub fn new(reader: Arc<dyn RevenueReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetRecommendationsQuery,
    ) -> Result<GetRecommendationsResult, AnalyticsError> {
        let windows = query.period.resolve();
        let reference = windows.reference_date();
        tracing::debug!(period = %query.period, "Generating recommendations");

        let aging = aging_enterprise_deals(reference);
        let negotiation = negotiation_deals(reference);

        let (aging_enterprise, rep_decisions, segments, quiet_accounts, negotiation) = tokio::try_join!(
            self.tally(&aging),
            self.reader.rep_win_loss_counts(&windows.current),
            self.reader.segment_pipeline_and_win_rate(&windows.current),
            self.reader
                .accounts_with_stale_activity(reference, INACTIVITY_WINDOW_DAYS),
            self.tally(&negotiation),
        )?;

        let findings = evaluate_rules(&RuleInputs {
            period: query.period,
            aging_enterprise,
            rep_decisions,
            segments,
            inactive_accounts: quiet_accounts.len(),
            negotiation,
        });
        tracing::debug!(fired = findings.len(), "Recommendation rules evaluated");

        Ok(Recommendations::rank(findings))
    }

    async fn tally(&self, filter: &DealFilter) -> Result<DealTally, RevenueReadError> {
        let (count, value) = tokio::try_join!(
            self.reader.count_deals(filter),
            self.reader.sum_deal_amount(filter),
        )?;
        Ok(DealTally { count, value })
    }
}
