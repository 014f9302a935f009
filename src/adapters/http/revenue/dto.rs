//! HTTP DTOs for revenue endpoints.
//!
//! Revenue views are read-only and the domain view models are already
//! designed for serialization, so they are re-exported directly.

pub use crate::application::handlers::revenue::RevenueOverview;
pub use crate::domain::revenue::{Recommendations, RevenueDrivers, RevenueSummary, RiskFactors};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// `?quarter=Qn&year=YYYY`, validated by the application layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuarterParams {
    pub quarter: Option<String>,
    pub year: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// 400 carrying the domain error's code and details.
    pub fn invalid_input(error: &DomainError) -> Self {
        let mut details = serde_json::Map::new();
        details.insert("reason".to_string(), error.code.to_string().into());
        for (key, value) in &error.details {
            details.insert(key.clone(), value.clone().into());
        }
        Self {
            details: Some(serde_json::Value::Object(details)),
            ..Self::bad_request(error.message.clone())
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Liveness payload for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
