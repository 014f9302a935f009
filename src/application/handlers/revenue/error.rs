//! Errors returned by the revenue query handlers.

use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::ports::RevenueReadError;

/// Failure of a view computation.
///
/// Reader failures of any kind collapse into `ComputationFailed`; no view
/// is ever returned partially computed.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Computation failed: {0}")]
    ComputationFailed(String),
}

impl From<RevenueReadError> for AnalyticsError {
    fn from(err: RevenueReadError) -> Self {
        tracing::error!(error = %err, "Revenue reader failed");
        AnalyticsError::ComputationFailed(err.to_string())
    }
}
