//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod revenue;

// Re-export key types for convenience
pub use revenue::revenue_routes;
pub use revenue::RevenueAppState;
