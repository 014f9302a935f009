//! GetRevenueOverviewHandler - All four views for one quarter.
//!
//! The views share nothing but the resolved windows, so they are computed
//! concurrently. Any failure fails the whole overview.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::revenue::{
    Recommendations, RevenueDrivers, RevenueSummary, RiskFactors, RiskThresholds,
};
use crate::ports::RevenueReader;

use super::{
    AnalyticsError, GetRecommendationsHandler, GetRevenueDriversHandler,
    GetRevenueSummaryHandler, GetRiskFactorsHandler, QuarterQuery,
};

pub type GetRevenueOverviewQuery = QuarterQuery;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueOverview {
    pub quarter_label: String,
    pub summary: RevenueSummary,
    pub drivers: RevenueDrivers,
    pub risk_factors: RiskFactors,
    pub recommendations: Recommendations,
}

pub type GetRevenueOverviewResult = RevenueOverview;

pub struct GetRevenueOverviewHandler {
    summary: GetRevenueSummaryHandler,
    drivers: GetRevenueDriversHandler,
    risk_factors: GetRiskFactorsHandler,
    recommendations: GetRecommendationsHandler,
}

impl GetRevenueOverviewHandler {
    pub fn new(reader: Arc<dyn RevenueReader>, thresholds: RiskThresholds) -> Self {
        Self {
            summary: GetRevenueSummaryHandler::new(reader.clone()),
            drivers: GetRevenueDriversHandler::new(reader.clone()),
            risk_factors: GetRiskFactorsHandler::with_thresholds(reader.clone(), thresholds),
            recommendations: GetRecommendationsHandler::new(reader),
        }
    }

    pub async fn handle(
        &self,
        query: GetRevenueOverviewQuery,
    ) -> Result<GetRevenueOverviewResult, AnalyticsError> {
        let (summary, drivers, risk_factors, recommendations) = tokio::try_join!(
            self.summary.handle(query),
            self.drivers.handle(query),
            self.risk_factors.handle(query),
            self.recommendations.handle(query),
        )?;

        Ok(RevenueOverview {
            quarter_label: query.period.label(),
            summary,
            drivers,
            risk_factors,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::revenue::test_support::MockRevenueReader;
    use crate::domain::revenue::{FiscalQuarter, Quarter};

    fn q4_2024() -> GetRevenueOverviewQuery {
        QuarterQuery::new(FiscalQuarter::new(Quarter::Q4, 2024).unwrap())
    }

    #[tokio::test]
    async fn test_overview_bundles_every_view() {
        let handler = GetRevenueOverviewHandler::new(
            Arc::new(MockRevenueReader::new()),
            RiskThresholds::default(),
        );
        let overview = handler.handle(q4_2024()).await.unwrap();

        assert_eq!(overview.quarter_label, "Q4 2024");
        assert_eq!(overview.summary.quarter_label, "Q4 2024");
        assert_eq!(overview.drivers.monthly_trend.len(), 6);
        assert_eq!(overview.risk_factors.summary.stale_deals_count, 0);
        assert_eq!(overview.recommendations.total_recommendations, 0);

        let json = serde_json::to_value(&overview).unwrap();
        assert!(json.get("riskFactors").is_some());
    }

    #[tokio::test]
    async fn test_overview_fails_as_a_whole() {
        let handler = GetRevenueOverviewHandler::new(
            Arc::new(MockRevenueReader::failing()),
            RiskThresholds::default(),
        );
        assert!(matches!(
            handler.handle(q4_2024()).await,
            Err(AnalyticsError::ComputationFailed(_))
        ));
    }
}
