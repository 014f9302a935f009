//! Recommendation ranking.

use serde::Serialize;

use super::recommendation::Finding;

/// Findings returned to callers.
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub recommendations: Vec<Finding>,
    /// Findings that fired before truncation.
    pub total_recommendations: usize,
}

impl Recommendations {
    /// Stable-sorts by priority (high first) and keeps the first
    /// [`MAX_RECOMMENDATIONS`]. Equal priorities keep rule order.
    pub fn rank(mut findings: Vec<Finding>) -> Self {
        let total_recommendations = findings.len();
        findings.sort_by_key(|finding| finding.priority);
        findings.truncate(MAX_RECOMMENDATIONS);
        Self {
            recommendations: findings,
            total_recommendations,
        }
    }
}
