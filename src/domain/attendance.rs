//! Attendance counters shared by Déclic and Prépa sessions.

use serde::{Deserialize, Serialize};

/// The two user-entered counters an absent count is derived from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// People expected (inscrits, prescriptions, ...).
    pub total: u32,
    /// People who actually came.
    pub present: u32,
}

impl Attendance {
    pub const fn new(total: u32, present: u32) -> Self {
        Self { total, present }
    }

    /// `max(0, total - present)`; never negative.
    pub const fn absent(self) -> u32 {
        self.total.saturating_sub(self.present)
    }

    /// Presence rate in percent, `None` when nobody was expected.
    pub fn presence_rate(self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(f64::from(self.present) * 100.0 / f64::from(self.total))
        }
    }
}

/// Computes `value / target * 100`, `0.0` for an empty target.
pub fn rate(value: u64, target: u64) -> f64 {
    if target == 0 {
        0.0
    } else {
        value as f64 * 100.0 / target as f64
    }
}

/// Rounds a percentage to one decimal for display.
pub fn round_rate(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_difference_when_positive() {
        assert_eq!(Attendance::new(12, 9).absent(), 3);
    }

    #[test]
    fn absent_never_goes_negative() {
        assert_eq!(Attendance::new(4, 10).absent(), 0);
        assert_eq!(Attendance::new(0, 0).absent(), 0);
    }

    #[test]
    fn absent_matches_formula_over_a_grid() {
        for total in 0..30u32 {
            for present in 0..30u32 {
                let expected = (i64::from(total) - i64::from(present)).max(0);
                let computed = Attendance::new(total, present).absent();
                assert_eq!(i64::from(computed), expected);
                assert_eq!(Attendance::new(total, present).absent(), computed);
            }
        }
    }

    #[test]
    fn presence_rate_handles_empty_sessions() {
        assert_eq!(Attendance::new(0, 0).presence_rate(), None);
        assert_eq!(Attendance::new(8, 6).presence_rate(), Some(75.0));
    }

    #[test]
    fn rate_handles_zero_target() {
        assert_eq!(rate(5, 0), 0.0);
        assert_eq!(round_rate(rate(1, 3)), 33.3);
    }
}
