//! Quarter summary: revenue against target with period-over-period deltas.

use serde::Serialize;

use crate::domain::foundation::YearMonth;

use super::entities::DealStage;
use super::filter::{ClosingRule, DealFilter};
use super::metrics::{percent_change, percent_change_or_none, round_tenth, round_whole, share_of};
use super::quarter::{DateRange, FiscalQuarter};

/// Revenue recognised in `range`: won, sized deals closed in the range, with
/// creation date standing in for a missing close date.
pub fn recognized_revenue(range: DateRange) -> DealFilter {
    DealFilter::new()
        .stage(DealStage::ClosedWon)
        .with_amount()
        .closed_within(range, ClosingRule::AllowCreationFallback)
}

/// Revenue and target for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: YearMonth,
    pub revenue: f64,
    pub target: f64,
}

impl MonthlyRevenue {
    pub fn new(month: YearMonth, revenue: f64, target: f64) -> Self {
        Self {
            month,
            revenue: round_whole(revenue),
            target: round_whole(target),
        }
    }
}

/// Raw figures gathered for a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryInputs {
    pub current_revenue: f64,
    pub previous_revenue: f64,
    pub year_ago_revenue: f64,
    pub target: f64,
    pub monthly: Vec<MonthlyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub current_quarter_revenue: f64,
    pub target: f64,
    /// Share of target still missing; negative when ahead of target.
    pub gap_percent: f64,
    pub gap_amount: f64,
    pub qoq_change: f64,
    /// `None` when there is no year-ago revenue to compare against.
    pub yoy_change: Option<f64>,
    pub quarter_label: String,
    pub monthly_data: Vec<MonthlyRevenue>,
}

impl RevenueSummary {
    pub fn derive(period: &FiscalQuarter, inputs: SummaryInputs) -> Self {
        let gap_amount = inputs.target - inputs.current_revenue;

        Self {
            current_quarter_revenue: round_whole(inputs.current_revenue),
            target: round_whole(inputs.target),
            gap_percent: round_tenth(share_of(gap_amount, inputs.target)),
            gap_amount: round_whole(gap_amount),
            qoq_change: round_tenth(percent_change(
                inputs.current_revenue,
                inputs.previous_revenue,
            )),
            yoy_change: percent_change_or_none(inputs.current_revenue, inputs.year_ago_revenue)
                .map(round_tenth),
            quarter_label: period.label(),
            monthly_data: inputs.monthly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::revenue::quarter::Quarter;

    fn q1_2025() -> FiscalQuarter {
        FiscalQuarter::new(Quarter::Q1, 2025).unwrap()
    }

    fn inputs(current: f64, previous: f64, year_ago: f64, target: f64) -> SummaryInputs {
        SummaryInputs {
            current_revenue: current,
            previous_revenue: previous,
            year_ago_revenue: year_ago,
            target,
            monthly: vec![],
        }
    }

    #[test]
    fn ahead_of_target_gives_negative_gap() {
        let summary = RevenueSummary::derive(&q1_2025(), inputs(30_000.0, 0.0, 0.0, 15_000.0));
        assert_eq!(summary.current_quarter_revenue, 30_000.0);
        assert_eq!(summary.target, 15_000.0);
        assert_eq!(summary.gap_amount, -15_000.0);
        assert_eq!(summary.gap_percent, -100.0);
        assert_eq!(summary.quarter_label, "Q1 2025");
    }

    #[test]
    fn zero_target_gives_zero_gap_percent() {
        let summary = RevenueSummary::derive(&q1_2025(), inputs(5_000.0, 0.0, 0.0, 0.0));
        assert_eq!(summary.gap_percent, 0.0);
        assert_eq!(summary.gap_amount, -5_000.0);
    }

    #[test]
    fn yoy_is_null_without_baseline_but_qoq_is_zero() {
        let summary = RevenueSummary::derive(&q1_2025(), inputs(5_000.0, 0.0, 0.0, 10.0));
        assert_eq!(summary.qoq_change, 0.0);
        assert_eq!(summary.yoy_change, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["yoyChange"].is_null());
    }

    #[test]
    fn deltas_round_to_one_decimal() {
        let summary = RevenueSummary::derive(&q1_2025(), inputs(10_000.0, 3_000.0, 7_000.0, 0.0));
        assert_eq!(summary.qoq_change, 233.3);
        assert_eq!(summary.yoy_change, Some(42.9));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut data = inputs(1.0, 1.0, 1.0, 1.0);
        data.monthly = vec![MonthlyRevenue::new("2025-01".parse().unwrap(), 1.0, 2.0)];
        let json = serde_json::to_value(RevenueSummary::derive(&q1_2025(), data)).unwrap();
        assert!(json.get("currentQuarterRevenue").is_some());
        assert_eq!(json["monthlyData"][0]["month"], "2025-01");
    }

    #[test]
    fn revenue_filter_allows_creation_fallback() {
        let filter = recognized_revenue(q1_2025().range());
        assert_eq!(
            filter.closed_within.map(|c| c.rule),
            Some(ClosingRule::AllowCreationFallback)
        );
        assert!(filter.require_amount);
    }
}
