//! The table of named validation rules.

use rangex_expr::{parse_number, ParseError, RangeExpr};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
    #[error("rule '{rule}' requires parameter {index}")]
    MissingParam { rule: Rule, index: usize },
    #[error("rule '{rule}' has invalid parameter '{param}'")]
    InvalidParam { rule: Rule, param: String },
    #[error("rule '{rule}' has a malformed range: {source}")]
    Range {
        rule: Rule,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Required,
    Email,
    Url,
    Date,
    Number,
    Digits,
    MinLength,
    MaxLength,
    RangeLength,
    Min,
    Max,
    Range,
    Step,
    EqualTo,
}

impl Rule {
    pub const ALL: [Rule; 14] = [
        Rule::Required,
        Rule::Email,
        Rule::Url,
        Rule::Date,
        Rule::Number,
        Rule::Digits,
        Rule::MinLength,
        Rule::MaxLength,
        Rule::RangeLength,
        Rule::Min,
        Rule::Max,
        Rule::Range,
        Rule::Step,
        Rule::EqualTo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::Url => "url",
            Rule::Date => "date",
            Rule::Number => "number",
            Rule::Digits => "digits",
            Rule::MinLength => "minlength",
            Rule::MaxLength => "maxlength",
            Rule::RangeLength => "rangelength",
            Rule::Min => "min",
            Rule::Max => "max",
            Rule::Range => "range",
            Rule::Step => "step",
            Rule::EqualTo => "equalTo",
        }
    }

    /// Message template used when a rule has no custom message.
    /// `{0}` is replaced by the first rule parameter.
    pub fn default_message(self) -> &'static str {
        match self {
            Rule::Required => "This field is required",
            Rule::Email => "Please enter a valid email address",
            Rule::Url => "Please enter a valid URL",
            Rule::Date => "Please enter a valid date",
            Rule::Number => "Please enter a valid number",
            Rule::Digits => "Please enter only digits",
            Rule::MinLength => "Please enter at least {0} characters",
            Rule::MaxLength => "Please enter no more than {0} characters",
            Rule::RangeLength => "Please enter a value whose length is within {0}",
            Rule::Min => "Please enter a value no less than {0}",
            Rule::Max => "Please enter a value no greater than {0}",
            Rule::Range => "Please enter a value within {0}",
            Rule::Step => "Please enter a multiple of {0}",
            Rule::EqualTo => "Please enter the same value again",
        }
    }

    /// Tests `value` against this rule.
    ///
    /// The length and bound rules take a second, optional parameter: when it
    /// is present and not `false` the comparison includes the bound itself.
    pub fn check<P: AsRef<str>>(self, value: &str, params: &[P]) -> Result<bool, RuleError> {
        let passed = match self {
            Rule::Required => !value.trim().is_empty(),
            Rule::Email => EMAIL_PATTERN.is_match(value),
            Rule::Url => URL_PATTERN.is_match(value),
            Rule::Date => is_calendar_date(value),
            Rule::Number => NUMBER_PATTERN.is_match(value),
            Rule::Digits => DIGITS_PATTERN.is_match(value),
            Rule::MinLength => {
                let bound = self.number_param(params, 0)?;
                let len = char_len(value);
                if inclusive(params) {
                    len >= bound
                } else {
                    len > bound
                }
            }
            Rule::MaxLength => {
                let bound = self.number_param(params, 0)?;
                let len = char_len(value);
                if inclusive(params) {
                    len <= bound
                } else {
                    len < bound
                }
            }
            Rule::Min => {
                let bound = self.number_param(params, 0)?;
                parse_number(value).is_some_and(|v| {
                    if inclusive(params) {
                        v >= bound
                    } else {
                        v > bound
                    }
                })
            }
            Rule::Max => {
                let bound = self.number_param(params, 0)?;
                parse_number(value).is_some_and(|v| {
                    if inclusive(params) {
                        v <= bound
                    } else {
                        v < bound
                    }
                })
            }
            Rule::RangeLength => self.range_param(params)?.contains(char_len(value)),
            Rule::Range => {
                let expr = self.range_param(params)?;
                parse_number(value).is_some_and(|v| expr.contains(v))
            }
            Rule::Step => self.is_step_multiple(value, params)?,
            Rule::EqualTo => value == self.raw_param(params, 0)?,
        };
        log::debug!("rule {} on {:?}: {}", self, value, passed);
        Ok(passed)
    }

    fn raw_param<'p, P: AsRef<str>>(
        self,
        params: &'p [P],
        index: usize,
    ) -> Result<&'p str, RuleError> {
        params
            .get(index)
            .map(|p| p.as_ref())
            .ok_or(RuleError::MissingParam { rule: self, index })
    }

    fn param<'p, P: AsRef<str>>(self, params: &'p [P], index: usize) -> Result<&'p str, RuleError> {
        self.raw_param(params, index).map(str::trim)
    }

    fn number_param<P: AsRef<str>>(self, params: &[P], index: usize) -> Result<f64, RuleError> {
        let param = self.param(params, index)?;
        parse_number(param).ok_or_else(|| RuleError::InvalidParam {
            rule: self,
            param: param.to_string(),
        })
    }

    fn range_param<P: AsRef<str>>(self, params: &[P]) -> Result<RangeExpr, RuleError> {
        RangeExpr::parse(self.param(params, 0)?)
            .map_err(|source| RuleError::Range { rule: self, source })
    }

    fn is_step_multiple<P: AsRef<str>>(self, value: &str, params: &[P]) -> Result<bool, RuleError> {
        let step_text = self.param(params, 0)?;
        let step = self.number_param(params, 0)?;
        let decimals = decimal_places(step_text);
        let scale = 10f64.powi(decimals as i32);
        let step_units = (step * scale).round();
        if step_units == 0.0 {
            return Err(RuleError::InvalidParam {
                rule: self,
                param: step_text.to_string(),
            });
        }

        let value = value.trim();
        let Some(v) = parse_number(value) else {
            return Ok(false);
        };
        if decimal_places(value) > decimals {
            return Ok(false);
        }
        Ok((v * scale).round() % step_units == 0.0)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .into_iter()
            .find(|rule| rule.name() == s)
            .ok_or_else(|| RuleError::UnknownRule(s.to_string()))
    }
}

/// Looks up `rule` by name and tests `value` against it.
pub fn evaluate<P: AsRef<str>>(rule: &str, value: &str, params: &[P]) -> Result<bool, RuleError> {
    rule.parse::<Rule>()?.check(value, params)
}

// ============ Helpers ============

fn char_len(value: &str) -> f64 {
    value.chars().count() as f64
}

fn inclusive<P: AsRef<str>>(params: &[P]) -> bool {
    params.get(1).is_some_and(|p| {
        let p = p.as_ref().trim();
        !p.is_empty() && p != "false"
    })
}

fn decimal_places(text: &str) -> usize {
    text.split_once('.').map_or(0, |(_, fraction)| {
        fraction.chars().take_while(char::is_ascii_digit).count()
    })
}

fn is_calendar_date(value: &str) -> bool {
    let Some(caps) = DATE_PATTERN.captures(value.trim()) else {
        return false;
    };
    let field = |i: usize| caps[i].parse::<u32>().unwrap_or(0);
    let (year, month, day) = (field(1), field(2), field(3));
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let days_in_month = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        2 => 28,
        _ => return false,
    };
    (1..=days_in_month).contains(&day)
}

// ============ Patterns ============

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:https?|ftp):)?//(?:\S+(?::\S*)?@)?(?:(?:[0-9]{1,3}\.){3}[0-9]{1,3}|(?:[a-z0-9\x{00a1}-\x{ffff}][a-z0-9\x{00a1}-\x{ffff}_-]{0,62}\.)+[a-z\x{00a1}-\x{ffff}]{2,}\.?)(?::[0-9]{2,5})?(?:[/?#]\S*)?$",
    )
    .unwrap()
});
static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:-?[0-9]+|-?[0-9]{1,3}(?:,[0-9]{3})+)?(?:\.[0-9]+)?$").unwrap()
});
static DIGITS_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_patterns_compile() {
        let patterns = [
            &EMAIL_PATTERN,
            &URL_PATTERN,
            &NUMBER_PATTERN,
            &DIGITS_PATTERN,
            &DATE_PATTERN,
        ];
        for pattern in patterns {
            assert!(!pattern.as_str().is_empty());
        }
    }

    #[test]
    fn test_rule_names_round_trip() {
        for rule in Rule::ALL {
            assert_eq!(rule.name().parse::<Rule>().unwrap(), rule);
        }
        assert_eq!(
            "nope".parse::<Rule>(),
            Err(RuleError::UnknownRule("nope".to_string()))
        );
    }

    #[test]
    fn test_required() {
        assert!(evaluate("required", "x", &NONE).unwrap());
        assert!(!evaluate("required", "   ", &NONE).unwrap());
    }

    #[test]
    fn test_email_and_url() {
        assert!(evaluate("email", "a.b+c@example.co", &NONE).unwrap());
        assert!(!evaluate("email", "not an email", &NONE).unwrap());
        assert!(evaluate("url", "https://example.com/path?q=1", &NONE).unwrap());
        assert!(evaluate("url", "//cdn.example.org", &NONE).unwrap());
        assert!(!evaluate("url", "example.com", &NONE).unwrap());
    }

    #[test]
    fn test_number_and_digits() {
        assert!(evaluate("number", "-12.5", &NONE).unwrap());
        assert!(evaluate("number", "1,234.5", &NONE).unwrap());
        assert!(!evaluate("number", "1,23", &NONE).unwrap());
        assert!(evaluate("digits", "0042", &NONE).unwrap());
        assert!(!evaluate("digits", "4.2", &NONE).unwrap());
    }

    #[test]
    fn test_date() {
        assert!(evaluate("date", "2024-02-29", &NONE).unwrap());
        assert!(!evaluate("date", "2023-02-29", &NONE).unwrap());
        assert!(!evaluate("date", "2023-13-01", &NONE).unwrap());
        assert!(!evaluate("date", "yesterday", &NONE).unwrap());
    }

    #[test]
    fn test_length_rules() {
        assert!(evaluate("minlength", "abcd", &["3"]).unwrap());
        assert!(!evaluate("minlength", "abc", &["3"]).unwrap());
        assert!(evaluate("minlength", "abc", &["3", "true"]).unwrap());
        assert!(evaluate("maxlength", "ab", &["3"]).unwrap());
        assert!(!evaluate("maxlength", "abc", &["3", "false"]).unwrap());
        assert!(evaluate("maxlength", "日本語", &["3", "true"]).unwrap());
    }

    #[test]
    fn test_bound_rules() {
        assert!(evaluate("min", "5", &["5", "true"]).unwrap());
        assert!(!evaluate("min", "5", &["5"]).unwrap());
        assert!(evaluate("max", "4.5", &["5"]).unwrap());
        assert!(!evaluate("max", "abc", &["5"]).unwrap());
        assert_eq!(
            evaluate("max", "1", &["five"]),
            Err(RuleError::InvalidParam {
                rule: Rule::Max,
                param: "five".to_string()
            })
        );
    }

    #[test]
    fn test_range_rules() {
        assert!(evaluate("range", "5", &["[0,10)&[20,30]"]).unwrap());
        assert!(!evaluate("range", "15", &["[0,10)&[20,30]"]).unwrap());
        assert!(!evaluate("range", "ten", &["[0,10)"]).unwrap());
        assert!(evaluate("rangelength", "hello", &["[2,8]"]).unwrap());
        assert!(!evaluate("rangelength", "h", &["[2,8]"]).unwrap());
    }

    #[test]
    fn test_malformed_range_propagates() {
        assert!(matches!(
            evaluate("range", "5", &["[5,2)"]),
            Err(RuleError::Range {
                rule: Rule::Range,
                source: ParseError::RangeOrder { index: 0, .. }
            })
        ));
        assert!(matches!(
            evaluate("rangelength", "abc", &["[1,2"]),
            Err(RuleError::Range { .. })
        ));
        assert_eq!(
            evaluate("range", "5", &NONE),
            Err(RuleError::MissingParam {
                rule: Rule::Range,
                index: 0
            })
        );
    }

    #[test]
    fn test_step() {
        assert!(evaluate("step", "1.5", &["0.5"]).unwrap());
        assert!(!evaluate("step", "1.25", &["0.5"]).unwrap());
        assert!(evaluate("step", "12", &["3"]).unwrap());
        assert!(!evaluate("step", "13", &["3"]).unwrap());
        assert!(matches!(
            evaluate("step", "1", &["0"]),
            Err(RuleError::InvalidParam { .. })
        ));
    }

    #[test]
    fn test_equal_to() {
        assert!(evaluate("equalTo", "secret", &["secret"]).unwrap());
        assert!(!evaluate("equalTo", "secret", &["Secret"]).unwrap());
    }

    #[test]
    fn test_equal_to_keeps_whitespace() {
        assert!(evaluate("equalTo", " a", &[" a"]).unwrap());
        assert!(!evaluate("equalTo", "a", &[" a"]).unwrap());
        assert!(!evaluate("equalTo", " a", &["a"]).unwrap());
    }

    #[test]
    fn test_numeric_rules_read_literals() {
        assert!(evaluate("range", "0x5", &["[0x0,0x10)"]).unwrap());
        assert!(evaluate("min", "1_000", &["999"]).unwrap());
        assert!(!evaluate("max", "-infinity", &["0"]).unwrap());
        assert!(!evaluate("range", "inf", &["(,)"]).unwrap());
    }
}
