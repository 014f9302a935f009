//! Revenue drivers: pipeline, win rate, deal size and sales cycle.

use chrono::NaiveDate;
use serde::Serialize;

use super::entities::DealStage;
use super::filter::{ClosingRule, DealFilter};
use super::metrics::{percent_change, round_tenth, round_whole, win_rate};
use super::quarter::DateRange;
use super::records::StageAggregate;
use super::summary::MonthlyRevenue;

/// Sized open deals on `as_of`.
pub fn open_pipeline(as_of: NaiveDate) -> DealFilter {
    DealFilter::new()
        .stages(&DealStage::OPEN)
        .with_amount()
        .open_as_of(as_of)
}

/// Open deals on `as_of`, sized or not, for the per-stage breakdown.
pub fn pipeline_by_stage(as_of: NaiveDate) -> DealFilter {
    DealFilter::new().stages(&DealStage::OPEN).open_as_of(as_of)
}

/// Won decisions attributed to `range` (creation fallback allowed).
pub fn won_in(range: DateRange) -> DealFilter {
    DealFilter::new()
        .stage(DealStage::ClosedWon)
        .closed_within(range, ClosingRule::AllowCreationFallback)
}

/// All decisions attributed to `range` (creation fallback allowed).
pub fn decided_in(range: DateRange) -> DealFilter {
    DealFilter::new()
        .stages(&DealStage::CLOSED)
        .closed_within(range, ClosingRule::AllowCreationFallback)
}

/// Won, sized deals with a recorded close date in `range`.
pub fn won_with_close_date(range: DateRange) -> DealFilter {
    DealFilter::new()
        .stage(DealStage::ClosedWon)
        .with_amount()
        .closed_within(range, ClosingRule::RecordedDateOnly)
}

/// Won deals with a recorded close date in `range`.
pub fn sales_cycles(range: DateRange) -> DealFilter {
    DealFilter::new()
        .stage(DealStage::ClosedWon)
        .closed_within(range, ClosingRule::RecordedDateOnly)
}

/// Raw driver figures for one period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodDrivers {
    pub pipeline: f64,
    pub won: u64,
    pub decided: u64,
    pub avg_deal_size: Option<f64>,
    pub avg_cycle_days: Option<f64>,
}

impl PeriodDrivers {
    pub fn win_rate(&self) -> f64 {
        win_rate(self.won, self.decided)
    }

    fn deal_size(&self) -> f64 {
        self.avg_deal_size.unwrap_or(0.0)
    }

    fn cycle_days(&self) -> f64 {
        self.avg_cycle_days.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverInputs {
    pub current: PeriodDrivers,
    pub previous: PeriodDrivers,
    pub pipeline_by_stage: Vec<StageAggregate>,
    pub monthly_trend: Vec<MonthlyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueDrivers {
    pub pipeline_size: f64,
    pub pipeline_change: f64,
    pub win_rate: f64,
    /// Percentage-point difference against the previous quarter.
    pub win_rate_change: f64,
    pub avg_deal_size: f64,
    pub avg_deal_size_change: f64,
    pub sales_cycle_time: f64,
    /// Day difference against the previous quarter; 0 without a baseline.
    pub sales_cycle_time_change: f64,
    pub pipeline_by_stage: Vec<StageAggregate>,
    pub monthly_trend: Vec<MonthlyRevenue>,
}

impl RevenueDrivers {
    pub fn derive(inputs: DriverInputs) -> Self {
        let DriverInputs {
            current,
            previous,
            mut pipeline_by_stage,
            monthly_trend,
        } = inputs;

        let current_rate = current.win_rate();
        let previous_rate = previous.win_rate();

        let cycle_change = if previous.cycle_days() > 0.0 {
            current.cycle_days() - previous.cycle_days()
        } else {
            0.0
        };

        pipeline_by_stage.sort_by_key(|row| row.stage);
        for row in &mut pipeline_by_stage {
            row.value = round_whole(row.value);
        }

        Self {
            pipeline_size: round_whole(current.pipeline),
            pipeline_change: round_tenth(percent_change(current.pipeline, previous.pipeline)),
            win_rate: round_tenth(current_rate),
            win_rate_change: round_tenth(current_rate - previous_rate),
            avg_deal_size: round_whole(current.deal_size()),
            avg_deal_size_change: round_tenth(percent_change(
                current.deal_size(),
                previous.deal_size(),
            )),
            sales_cycle_time: round_whole(current.cycle_days()),
            sales_cycle_time_change: round_whole(cycle_change),
            pipeline_by_stage,
            monthly_trend,
        }
    }
}
