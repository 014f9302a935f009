//! Revenue HTTP adapter module.
//!
//! Provides REST API endpoints for the revenue analytics views.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, QuarterParams};
pub use handlers::{RevenueApiError, RevenueAppState};
pub use routes::revenue_routes;
