use crate::error::ParseError;
use crate::eval;
use crate::parser;
use std::fmt;
use std::str::FromStr;

/// One bracketed clause such as `[0, 10)`.
///
/// An unbounded side is stored as the matching infinity. Parsing guarantees
/// `lower < upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub lower_inclusive: bool,
    pub upper: f64,
    pub upper_inclusive: bool,
}

impl Interval {
    pub fn is_lower_unbounded(&self) -> bool {
        self.lower == f64::NEG_INFINITY
    }

    pub fn is_upper_unbounded(&self) -> bool {
        self.upper == f64::INFINITY
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.lower_inclusive { "[" } else { "(" })?;
        if !self.is_lower_unbounded() {
            write!(f, "{}", self.lower)?;
        }
        f.write_str(", ")?;
        if !self.is_upper_unbounded() {
            write!(f, "{}", self.upper)?;
        }
        f.write_str(if self.upper_inclusive { "]" } else { ")" })
    }
}

/// A parsed union of intervals.
///
/// # Example
///
/// ```
/// use rangex_expr::RangeExpr;
///
/// let expr: RangeExpr = "[0,10)&(20,)".parse().unwrap();
/// assert!(expr.contains(0.0));
/// assert!(!expr.contains(10.0));
/// assert!(expr.contains(1e6));
/// assert_eq!(expr.to_string(), "[0, 10) & (20, )");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpr {
    intervals: Vec<Interval>,
}

impl RangeExpr {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parser::parse(text).map(|intervals| Self { intervals })
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn contains(&self, value: f64) -> bool {
        eval::contains(value, &self.intervals)
    }
}

impl FromStr for RangeExpr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RangeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(" & ")?;
            }
            write!(f, "{}", interval)?;
        }
        Ok(())
    }
}
