//! The query shared by every revenue view.

use crate::domain::foundation::ValidationError;
use crate::domain::revenue::FiscalQuarter;

use super::AnalyticsError;

/// Requests one view for one fiscal quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterQuery {
    pub period: FiscalQuarter,
}

impl QuarterQuery {
    pub fn new(period: FiscalQuarter) -> Self {
        Self { period }
    }

    /// Validates raw `quarter`/`year` input. Both are required.
    pub fn parse(quarter: Option<&str>, year: Option<&str>) -> Result<Self, AnalyticsError> {
        let quarter = quarter.ok_or_else(|| ValidationError::empty_field("quarter"))?;
        let year = year.ok_or_else(|| ValidationError::empty_field("year"))?;
        let period = FiscalQuarter::parse(quarter, year).map_err(|err| {
            tracing::warn!(quarter, year, error = %err, "Rejected quarter input");
            err
        })?;
        Ok(Self::new(period))
    }
}
