//! Revenue analytics query handlers.
//!
//! Read-only handlers, one per view, each resolving the requested quarter
//! and querying the revenue reader independently.

mod error;
mod get_recommendations;
mod get_revenue_drivers;
mod get_revenue_overview;
mod get_revenue_summary;
mod get_risk_factors;
mod query;

#[cfg(test)]
mod test_support;

pub use error::AnalyticsError;
pub use get_recommendations::{
    GetRecommendationsHandler, GetRecommendationsQuery, GetRecommendationsResult,
};
pub use get_revenue_drivers::{
    GetRevenueDriversHandler, GetRevenueDriversQuery, GetRevenueDriversResult,
};
pub use get_revenue_overview::{
    GetRevenueOverviewHandler, GetRevenueOverviewQuery, GetRevenueOverviewResult,
    RevenueOverview,
};
pub use get_revenue_summary::{
    GetRevenueSummaryHandler, GetRevenueSummaryQuery, GetRevenueSummaryResult,
};
pub use get_risk_factors::{GetRiskFactorsHandler, GetRiskFactorsQuery, GetRiskFactorsResult};
pub use query::QuarterQuery;
