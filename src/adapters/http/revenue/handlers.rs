//! HTTP handlers for revenue endpoints.
//!
//! These handlers connect Axum routes to application layer query handlers.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::revenue::{
    AnalyticsError, GetRecommendationsHandler, GetRevenueDriversHandler,
    GetRevenueOverviewHandler, GetRevenueSummaryHandler, GetRiskFactorsHandler, QuarterQuery,
};
use crate::domain::foundation::DomainError;
use crate::domain::revenue::RiskThresholds;
use crate::ports::RevenueReader;

use super::dto::{
    ErrorResponse, HealthResponse, QuarterParams, Recommendations, RevenueDrivers,
    RevenueOverview, RevenueSummary, RiskFactors,
};

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Revenue API error that implements IntoResponse.
#[derive(Debug)]
pub enum RevenueApiError {
    BadRequest(DomainError),
    Internal(String),
}

impl IntoResponse for RevenueApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            RevenueApiError::BadRequest(err) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::invalid_input(&err))
            }
            RevenueApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<AnalyticsError> for RevenueApiError {
    fn from(error: AnalyticsError) -> Self {
        match error {
            AnalyticsError::InvalidInput(err) => RevenueApiError::BadRequest(err.into()),
            // Store details stay in the logs.
            AnalyticsError::ComputationFailed(_) => {
                RevenueApiError::Internal("Failed to compute revenue analytics".to_string())
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing revenue dependencies.
#[derive(Clone)]
pub struct RevenueAppState {
    pub revenue_reader: Arc<dyn RevenueReader>,
    pub risk_thresholds: RiskThresholds,
}

impl RevenueAppState {
    pub fn new(revenue_reader: Arc<dyn RevenueReader>) -> Self {
        Self {
            revenue_reader,
            risk_thresholds: RiskThresholds::default(),
        }
    }

    pub fn summary_handler(&self) -> GetRevenueSummaryHandler {
        GetRevenueSummaryHandler::new(self.revenue_reader.clone())
    }

    pub fn drivers_handler(&self) -> GetRevenueDriversHandler {
        GetRevenueDriversHandler::new(self.revenue_reader.clone())
    }

    pub fn risk_factors_handler(&self) -> GetRiskFactorsHandler {
        GetRiskFactorsHandler::with_thresholds(self.revenue_reader.clone(), self.risk_thresholds)
    }

    pub fn recommendations_handler(&self) -> GetRecommendationsHandler {
        GetRecommendationsHandler::new(self.revenue_reader.clone())
    }

    pub fn overview_handler(&self) -> GetRevenueOverviewHandler {
        GetRevenueOverviewHandler::new(self.revenue_reader.clone(), self.risk_thresholds)
    }
}

fn parse_query(params: &QuarterParams) -> Result<QuarterQuery, RevenueApiError> {
    Ok(QuarterQuery::parse(
        params.quarter.as_deref(),
        params.year.as_deref(),
    )?)
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// GET /api/summary?quarter=Q1&year=2025
///
/// Revenue against target for the quarter, with the monthly breakdown.
pub async fn get_revenue_summary(
    State(state): State<RevenueAppState>,
    Query(params): Query<QuarterParams>,
) -> Result<Json<RevenueSummary>, RevenueApiError> {
    let query = parse_query(&params)?;
    let summary = state.summary_handler().handle(query).await?;
    Ok(Json(summary))
}

/// GET /api/drivers?quarter=Q1&year=2025
pub async fn get_revenue_drivers(
    State(state): State<RevenueAppState>,
    Query(params): Query<QuarterParams>,
) -> Result<Json<RevenueDrivers>, RevenueApiError> {
    let query = parse_query(&params)?;
    let drivers = state.drivers_handler().handle(query).await?;
    Ok(Json(drivers))
}

/// GET /api/risk-factors?quarter=Q1&year=2025
pub async fn get_risk_factors(
    State(state): State<RevenueAppState>,
    Query(params): Query<QuarterParams>,
) -> Result<Json<RiskFactors>, RevenueApiError> {
    let query = parse_query(&params)?;
    let risk = state.risk_factors_handler().handle(query).await?;
    Ok(Json(risk))
}

/// GET /api/recommendations?quarter=Q1&year=2025
pub async fn get_recommendations(
    State(state): State<RevenueAppState>,
    Query(params): Query<QuarterParams>,
) -> Result<Json<Recommendations>, RevenueApiError> {
    let query = parse_query(&params)?;
    let recommendations = state.recommendations_handler().handle(query).await?;
    Ok(Json(recommendations))
}

/// GET /api/overview?quarter=Q1&year=2025
///
/// All four views in one response.
pub async fn get_revenue_overview(
    State(state): State<RevenueAppState>,
    Query(params): Query<QuarterParams>,
) -> Result<Json<RevenueOverview>, RevenueApiError> {
    let query = parse_query(&params)?;
    let overview = state.overview_handler().handle(query).await?;
    Ok(Json(overview))
}
