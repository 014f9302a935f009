//! Application layer - Queries and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The revenue engine is read-only, so every handler is a query handler.

pub mod handlers;

pub use handlers::{
    AnalyticsError, GetRecommendationsHandler, GetRevenueDriversHandler,
    GetRevenueOverviewHandler, GetRevenueSummaryHandler, GetRiskFactorsHandler, QuarterQuery,
};
