//! Recommendation rules.
//!
//! Five independent rules run against one quarter. Each yields at most one
//! [`Finding`]; ordering and truncation happen in the ranker.

use chrono::NaiveDate;
use serde::Serialize;

use super::entities::{DealStage, ENTERPRISE_SEGMENT};
use super::filter::DealFilter;
use super::metrics::{round_whole, thousands};
use super::quarter::FiscalQuarter;
use super::records::{RepWinLoss, SegmentPerformance};
use super::risk::stale_deal_filter;

/// Age in days after which an open enterprise deal counts as aging.
pub const AGING_DEAL_DAYS: i64 = 30;
/// Decisions a rep needs in the quarter before being considered.
pub const MIN_REP_DECISIONS: u64 = 3;
/// Win rate below which the worst rep is flagged.
pub const REP_WIN_RATE_FLOOR: f64 = 40.0;
/// Activity window for the inactive-accounts rule.
pub const INACTIVITY_WINDOW_DAYS: i64 = 14;
/// Inactive accounts tolerated before the rule fires.
pub const MAX_QUIET_ACCOUNTS: usize = 5;
/// Negotiation-stage deals tolerated before the rule fires.
pub const MAX_NEGOTIATION_DEALS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingCategory {
    Deals,
    Reps,
    Accounts,
    Pipeline,
}

/// One recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Names the rule that produced it (`rec-1` .. `rec-5`).
    pub id: String,
    pub priority: Priority,
    pub category: FindingCategory,
    pub title: String,
    pub description: String,
    pub impact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

impl Finding {
    fn new(rule: Rule, title: String, description: String, impact: String, metric: String) -> Self {
        Self {
            id: rule.id().to_string(),
            priority: rule.priority(),
            category: rule.category(),
            title,
            description,
            impact,
            metric: Some(metric),
        }
    }
}

/// The rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    AgingEnterpriseDeals,
    WorstRep,
    WorstSegment,
    InactiveAccounts,
    NegotiationQuickWins,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::AgingEnterpriseDeals,
        Rule::WorstRep,
        Rule::WorstSegment,
        Rule::InactiveAccounts,
        Rule::NegotiationQuickWins,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Rule::AgingEnterpriseDeals => "rec-1",
            Rule::WorstRep => "rec-2",
            Rule::WorstSegment => "rec-3",
            Rule::InactiveAccounts => "rec-4",
            Rule::NegotiationQuickWins => "rec-5",
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Rule::WorstSegment | Rule::InactiveAccounts => Priority::Medium,
            _ => Priority::High,
        }
    }

    pub fn category(&self) -> FindingCategory {
        match self {
            Rule::AgingEnterpriseDeals | Rule::NegotiationQuickWins => FindingCategory::Deals,
            Rule::WorstRep => FindingCategory::Reps,
            Rule::WorstSegment | Rule::InactiveAccounts => FindingCategory::Accounts,
        }
    }
}

/// Sized enterprise deals open at `reference` and older than the aging cut-off.
pub fn aging_enterprise_deals(reference: NaiveDate) -> DealFilter {
    stale_deal_filter(reference, AGING_DEAL_DAYS).in_segment(ENTERPRISE_SEGMENT)
}

/// Sized negotiation-stage deals open at `reference`.
pub fn negotiation_deals(reference: NaiveDate) -> DealFilter {
    DealFilter::new()
        .stage(DealStage::Negotiation)
        .with_amount()
        .open_as_of(reference)
}

/// Count and summed amount of a deal population.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DealTally {
    pub count: u64,
    pub value: f64,
}

/// Everything the rules read for one quarter.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleInputs {
    pub period: FiscalQuarter,
    pub aging_enterprise: DealTally,
    pub rep_decisions: Vec<RepWinLoss>,
    pub segments: Vec<SegmentPerformance>,
    pub inactive_accounts: usize,
    pub negotiation: DealTally,
}

/// Runs every rule in order and collects the findings that fired.
pub fn evaluate_rules(inputs: &RuleInputs) -> Vec<Finding> {
    Rule::ALL
        .iter()
        .filter_map(|rule| match rule {
            Rule::AgingEnterpriseDeals => aging_enterprise_finding(inputs.aging_enterprise),
            Rule::WorstRep => worst_rep_finding(&inputs.rep_decisions, &inputs.period),
            Rule::WorstSegment => worst_segment_finding(&inputs.segments),
            Rule::InactiveAccounts => {
                inactive_accounts_finding(inputs.inactive_accounts, &inputs.period)
            }
            Rule::NegotiationQuickWins => negotiation_finding(inputs.negotiation),
        })
        .collect()
}

pub fn aging_enterprise_finding(tally: DealTally) -> Option<Finding> {
    if tally.count == 0 {
        return None;
    }
    let value_k = thousands(tally.value);
    Some(Finding::new(
        Rule::AgingEnterpriseDeals,
        "Focus on aging Enterprise deals".to_string(),
        format!(
            "{} Enterprise deals worth ${}K have been open for over {} days.",
            tally.count, value_k, AGING_DEAL_DAYS
        ),
        format!("Potential to close ${value_k}K in revenue"),
        format!("{} deals", tally.count),
    ))
}

/// Lowest-rate rep among those with enough decisions; first wins on ties.
pub fn worst_rep(reps: &[RepWinLoss]) -> Option<&RepWinLoss> {
    reps.iter()
        .filter(|rep| rep.total() >= MIN_REP_DECISIONS)
        .fold(None, |worst: Option<&RepWinLoss>, rep| match worst {
            Some(current) if current.win_rate() <= rep.win_rate() => Some(current),
            _ => Some(rep),
        })
}

pub fn worst_rep_finding(reps: &[RepWinLoss], period: &FiscalQuarter) -> Option<Finding> {
    let rep = worst_rep(reps)?;
    let rate = rep.win_rate();
    if rate >= REP_WIN_RATE_FLOOR {
        return None;
    }
    let shown = round_whole(rate) as i64;
    Some(Finding::new(
        Rule::WorstRep,
        format!("Coach {} on win rate", rep.rep_name),
        format!(
            "{} has a {}% win rate in {}, below team average.",
            rep.rep_name,
            shown,
            period.label()
        ),
        "Improving win rate by 10% could add significant revenue".to_string(),
        format!("{shown}% win rate"),
    ))
}

/// Segment with the lowest known win rate; a 0% rate counts.
pub fn worst_segment(segments: &[SegmentPerformance]) -> Option<(&SegmentPerformance, f64)> {
    segments
        .iter()
        .filter_map(|segment| segment.win_rate().map(|rate| (segment, rate)))
        .fold(None, |worst, (segment, rate)| match worst {
            Some((_, lowest)) if lowest <= rate => worst,
            _ => Some((segment, rate)),
        })
}

pub fn worst_segment_finding(segments: &[SegmentPerformance]) -> Option<Finding> {
    let (segment, rate) = worst_segment(segments)?;
    if segment.open_value <= 0.0 {
        return None;
    }
    Some(Finding::new(
        Rule::WorstSegment,
        format!("Increase activity for {} segment", segment.segment),
        format!(
            "{} segment has {} open deals worth ${}K.",
            segment.segment,
            segment.open_count,
            thousands(segment.open_value)
        ),
        "Strategic focus could improve segment conversion".to_string(),
        format!("{}% win rate", round_whole(rate) as i64),
    ))
}

pub fn inactive_accounts_finding(count: usize, period: &FiscalQuarter) -> Option<Finding> {
    if count <= MAX_QUIET_ACCOUNTS {
        return None;
    }
    Some(Finding::new(
        Rule::InactiveAccounts,
        "Increase outreach to inactive accounts".to_string(),
        format!(
            "{count} accounts with open deals have had no recent activity in {}.",
            period.label()
        ),
        "Prevents deal stagnation and potential loss".to_string(),
        format!("{count} accounts"),
    ))
}

pub fn negotiation_finding(tally: DealTally) -> Option<Finding> {
    if tally.count <= MAX_NEGOTIATION_DEALS {
        return None;
    }
    let value_k = thousands(tally.value);
    Some(Finding::new(
        Rule::NegotiationQuickWins,
        "Accelerate negotiation-stage deals".to_string(),
        format!(
            "{} deals worth ${value_k}K are in negotiation stage.",
            tally.count
        ),
        format!("Potential quick wins: ${value_k}K"),
        format!("{} deals", tally.count),
    ))
}
