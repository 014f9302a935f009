//! Revenue analytics domain.
//!
//! Entities of the read-only snapshot, the quarter resolver, the deal
//! predicate and the pure derivations behind the four views.

pub mod drivers;
pub mod entities;
pub mod filter;
pub mod metrics;
pub mod quarter;
pub mod ranking;
pub mod recommendation;
pub mod records;
pub mod risk;
pub mod summary;

pub use drivers::{DriverInputs, PeriodDrivers, RevenueDrivers};
pub use entities::{Account, Activity, Closure, Deal, DealStage, MonthlyTarget, Rep, ENTERPRISE_SEGMENT};
pub use filter::{ClosedWithin, ClosingRule, DealFilter, DealOrder, OlderThan};
pub use quarter::{DateRange, FiscalQuarter, Quarter, QuarterWindows, TRAILING_TREND_MONTHS};
pub use ranking::{Recommendations, MAX_RECOMMENDATIONS};
pub use recommendation::{DealTally, Finding, FindingCategory, Priority, Rule, RuleInputs};
pub use records::{AccountActivity, DealListing, RepWinLoss, SegmentPerformance, StageAggregate};
pub use risk::{
    LowActivityAccount, RiskFactors, RiskSummary, RiskThresholds, StaleDeal, StaleDeals,
    UnderperformingRep, NO_ACTIVITY_SENTINEL_DAYS,
};
pub use summary::{MonthlyRevenue, RevenueSummary, SummaryInputs};
