//! Deal predicates shared by every repository query.
//!
//! A `DealFilter` is a conjunction of optional clauses. The in-memory reader
//! evaluates it with [`DealFilter::matches`]; the SQL reader translates each
//! clause into a `WHERE` fragment with identical semantics.

use chrono::NaiveDate;

use super::entities::{Account, Deal, DealStage};
use super::quarter::DateRange;

/// Which closing paths count when attributing a deal to a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosingRule {
    /// Only a recorded `closed_at` inside the range counts.
    RecordedDateOnly,
    /// A recorded `closed_at` inside the range, or, for a closed-stage deal
    /// with no `closed_at`, a `created_at` inside the range.
    AllowCreationFallback,
}

/// Deal closed within a period under a given closing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedWithin {
    pub range: DateRange,
    pub rule: ClosingRule,
}

/// Deal older than `days` whole days at `reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OlderThan {
    pub reference: NaiveDate,
    pub days: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealFilter {
    pub stages: Option<Vec<DealStage>>,
    pub require_amount: bool,
    pub open_as_of: Option<NaiveDate>,
    pub closed_within: Option<ClosedWithin>,
    pub older_than: Option<OlderThan>,
    pub segment: Option<String>,
}

impl DealFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(mut self, stages: &[DealStage]) -> Self {
        self.stages = Some(stages.to_vec());
        self
    }

    pub fn stage(self, stage: DealStage) -> Self {
        self.stages(&[stage])
    }

    pub fn with_amount(mut self) -> Self {
        self.require_amount = true;
        self
    }

    /// Open on `date` per point-in-time reconstruction.
    pub fn open_as_of(mut self, date: NaiveDate) -> Self {
        self.open_as_of = Some(date);
        self
    }

    pub fn closed_within(mut self, range: DateRange, rule: ClosingRule) -> Self {
        self.closed_within = Some(ClosedWithin { range, rule });
        self
    }

    pub fn older_than(mut self, reference: NaiveDate, days: i64) -> Self {
        self.older_than = Some(OlderThan { reference, days });
        self
    }

    pub fn in_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Evaluates the filter against one deal and its account.
    ///
    /// A segment clause never matches a deal whose account is unknown.
    pub fn matches(&self, deal: &Deal, account: Option<&Account>) -> bool {
        if let Some(stages) = &self.stages {
            if !stages.contains(&deal.stage) {
                return false;
            }
        }
        if self.require_amount && deal.amount.is_none() {
            return false;
        }
        if let Some(date) = self.open_as_of {
            if !deal.is_open_as_of(date) {
                return false;
            }
        }
        if let Some(closed) = &self.closed_within {
            let inside = match closed.rule {
                ClosingRule::RecordedDateOnly => deal.closed_by_date_within(&closed.range),
                ClosingRule::AllowCreationFallback => {
                    deal.closed_within_with_fallback(&closed.range)
                }
            };
            if !inside {
                return false;
            }
        }
        if let Some(age) = &self.older_than {
            if deal.age_days(age.reference) <= age.days {
                return false;
            }
        }
        if let Some(segment) = &self.segment {
            match account {
                Some(account) if &account.segment == segment => {}
                _ => return false,
            }
        }
        true
    }
}

/// Ordering for deal listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealOrder {
    /// Largest amount first; ties by deal id.
    AmountDesc,
    /// Oldest first; ties by deal id.
    CreatedAsc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AccountId, DealId, RepId};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn q1() -> DateRange {
        DateRange::new(date("2025-01-01"), date("2025-03-31"))
    }

    fn deal(stage: DealStage, amount: Option<f64>, created: &str, closed: Option<&str>) -> Deal {
        Deal {
            deal_id: DealId::new("D1").unwrap(),
            account_id: AccountId::new("A1").unwrap(),
            rep_id: RepId::new("R1").unwrap(),
            stage,
            amount,
            created_at: date(created),
            closed_at: closed.map(date),
        }
    }

    fn account(segment: &str) -> Account {
        Account {
            account_id: AccountId::new("A1").unwrap(),
            name: "Acme".to_string(),
            industry: "Retail".to_string(),
            segment: segment.to_string(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let d = deal(DealStage::ClosedLost, None, "2020-01-01", None);
        assert!(DealFilter::new().matches(&d, None));
    }

    #[test]
    fn stage_and_amount_clauses() {
        let r#unsized = deal(DealStage::Prospecting, None, "2025-01-01", None);
        let filter = DealFilter::new().stages(&DealStage::OPEN).with_amount();
        assert!(!filter.matches(&r#unsized, None));
        assert!(DealFilter::new().stages(&DealStage::OPEN).matches(&r#unsized, None));
        assert!(!DealFilter::new().stage(DealStage::Negotiation).matches(&r#unsized, None));
    }

    #[test]
    fn open_as_of_clause_rebuilds_state() {
        let closed_later = deal(DealStage::ClosedWon, Some(5.0), "2025-01-01", Some("2025-05-01"));
        let filter = DealFilter::new().open_as_of(date("2025-03-31"));
        assert!(filter.matches(&closed_later, None));

        let closed_before = deal(DealStage::ClosedWon, Some(5.0), "2025-01-01", Some("2025-03-31"));
        assert!(!filter.matches(&closed_before, None));
    }

    #[test]
    fn closing_rules_differ_only_on_fallback() {
        let no_close_date = deal(DealStage::ClosedWon, Some(5.0), "2025-02-01", None);
        let strict = DealFilter::new().closed_within(q1(), ClosingRule::RecordedDateOnly);
        let lenient = DealFilter::new().closed_within(q1(), ClosingRule::AllowCreationFallback);
        assert!(!strict.matches(&no_close_date, None));
        assert!(lenient.matches(&no_close_date, None));

        let open = deal(DealStage::Negotiation, Some(5.0), "2025-02-01", None);
        assert!(!lenient.matches(&open, None));
    }

    #[test]
    fn older_than_is_strict() {
        let filter = DealFilter::new().older_than(date("2025-03-31"), 30);
        assert!(!filter.matches(&deal(DealStage::Prospecting, None, "2025-03-01", None), None));
        assert!(filter.matches(&deal(DealStage::Prospecting, None, "2025-02-28", None), None));
    }

    #[test]
    fn segment_clause_needs_matching_account() {
        let d = deal(DealStage::Prospecting, Some(1.0), "2025-01-01", None);
        let filter = DealFilter::new().in_segment("Enterprise");
        assert!(filter.matches(&d, Some(&account("Enterprise"))));
        assert!(!filter.matches(&d, Some(&account("SMB"))));
        assert!(!filter.matches(&d, None));
    }
}
