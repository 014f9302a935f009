//! Application handlers.
//!
//! Query handlers that orchestrate domain derivations over the ports.

pub mod revenue;

pub use revenue::{
    AnalyticsError, GetRecommendationsHandler, GetRevenueDriversHandler,
    GetRevenueOverviewHandler, GetRevenueSummaryHandler, GetRiskFactorsHandler, QuarterQuery,
    RevenueOverview,
};
