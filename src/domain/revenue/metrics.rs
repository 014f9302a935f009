//! Ratio and rounding helpers shared by all views.
//!
//! Every ratio guards its denominator: a zero or negative baseline yields the
//! neutral value rather than `NaN`/`inf`.

/// Rounds to the nearest tenth, halves away from zero.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to the nearest whole unit, halves away from zero.
pub fn round_whole(value: f64) -> f64 {
    value.round()
}

/// `(current - previous) / previous * 100`, or 0 without a positive baseline.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    percent_change_or_none(current, previous).unwrap_or(0.0)
}

/// `(current - previous) / previous * 100`, or `None` without a positive
/// baseline ("no comparison available").
pub fn percent_change_or_none(current: f64, previous: f64) -> Option<f64> {
    if previous > 0.0 {
        Some((current - previous) / previous * 100.0)
    } else {
        None
    }
}

/// `won / total * 100`, or 0 when nothing was decided.
pub fn win_rate(won: u64, total: u64) -> f64 {
    win_rate_or_none(won, total).unwrap_or(0.0)
}

/// `won / total * 100`, or `None` when nothing was decided.
pub fn win_rate_or_none(won: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(won as f64 / total as f64 * 100.0)
    }
}

/// `part / whole * 100`, or 0 without a positive `whole`.
pub fn share_of(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Whole thousands, as used in `$60K` style texts.
pub fn thousands(value: f64) -> i64 {
    (value / 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_goes_away_from_zero() {
        assert_eq!(round_tenth(66.666), 66.7);
        assert_eq!(round_tenth(0.25), 0.3);
        assert_eq!(round_tenth(-0.25), -0.3);
        assert_eq!(round_whole(2.5), 3.0);
        assert_eq!(round_whole(-2.5), -3.0);
    }

    #[test]
    fn percent_change_defaults_to_zero() {
        assert_eq!(percent_change(100.0, 0.0), 0.0);
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(50.0, 100.0), -50.0);
    }

    #[test]
    fn percent_change_or_none_signals_missing_baseline() {
        assert_eq!(percent_change_or_none(100.0, 0.0), None);
        assert_eq!(percent_change_or_none(120.0, 100.0), Some(20.0));
    }

    #[test]
    fn win_rate_is_zero_without_decisions() {
        assert_eq!(win_rate(0, 0), 0.0);
        assert_eq!(win_rate_or_none(0, 0), None);
        assert_eq!(win_rate(1, 4), 25.0);
    }

    #[test]
    fn share_of_never_divides_by_zero() {
        let value = share_of(-15_000.0, 0.0);
        assert!(value.is_finite());
        assert_eq!(value, 0.0);
        assert_eq!(share_of(-15_000.0, 15_000.0), -100.0);
    }

    #[test]
    fn thousands_rounds() {
        assert_eq!(thousands(60_000.0), 60);
        assert_eq!(thousands(1_499.0), 1);
        assert_eq!(thousands(1_500.0), 2);
    }
}
