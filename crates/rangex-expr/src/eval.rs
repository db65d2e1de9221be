//! Membership in a union of intervals.

use crate::interval::Interval;

impl Interval {
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let above_lower = self.is_lower_unbounded()
            || if self.lower_inclusive {
                value >= self.lower
            } else {
                value > self.lower
            };
        let below_upper = self.is_upper_unbounded()
            || if self.upper_inclusive {
                value <= self.upper
            } else {
                value < self.upper
            };
        above_lower && below_upper
    }
}

/// True when `value` lies in at least one of `intervals`.
pub fn contains(value: f64, intervals: &[Interval]) -> bool {
    intervals.iter().any(|interval| interval.contains(value))
}
