//! HTTP routes for revenue endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{
    get_recommendations, get_revenue_drivers, get_revenue_overview, get_revenue_summary,
    get_risk_factors, health, RevenueAppState,
};

/// Creates the revenue router with all routes.
pub fn revenue_routes(state: RevenueAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/summary", get(get_revenue_summary))
        .route("/api/drivers", get(get_revenue_drivers))
        .route("/api/risk-factors", get(get_risk_factors))
        .route("/api/recommendations", get(get_recommendations))
        .route("/api/overview", get(get_revenue_overview))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryRevenueReader, RevenueSnapshot};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let reader = InMemoryRevenueReader::new(RevenueSnapshot::default());
        revenue_routes(RevenueAppState::new(Arc::new(reader)))
    }

    async fn status_of(uri: &str) -> StatusCode {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn every_view_answers_for_an_empty_snapshot() {
        for path in [
            "/api/summary",
            "/api/drivers",
            "/api/risk-factors",
            "/api/recommendations",
            "/api/overview",
        ] {
            let uri = format!("{path}?quarter=Q1&year=2025");
            assert_eq!(status_of(&uri).await, StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn bad_quarter_is_bad_request() {
        assert_eq!(
            status_of("/api/summary?quarter=Q7&year=2025").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of("/api/drivers").await, StatusCode::BAD_REQUEST);
    }
}
