//! Named validation rules for form values.
//!
//! Rules range from plain patterns (`email`, `digits`, `date`) to numeric
//! bounds (`min`, `max`, `step`) and range expressions (`range`,
//! `rangelength`). A [`Validator`] checks a value against a list of rules
//! and reports the first failure with a human readable message. Callers can
//! register their own rules on a validator with [`Validator::add_method`].
//!
//! # Example
//!
//! ```
//! use rangex_rules::{evaluate, RuleError, Validator, Verdict};
//!
//! assert!(evaluate("range", "25", &["[0,10)&[20,30]"]).unwrap());
//!
//! let mut validator = Validator::new();
//! validator.add_rule("required", None).unwrap();
//! validator.add_rule("range:[0,10)&[20,30]", None).unwrap();
//! assert_eq!(validator.check("5").unwrap(), Verdict::Valid);
//! assert!(!validator.check("15").unwrap().is_valid());
//!
//! validator.add_method("even", |v: &str, _: &[String]| v.len() % 2 == 0, None);
//! validator.add_rule("even", Some("needs an even length")).unwrap();
//! assert!(!validator.check("5").unwrap().is_valid());
//! assert!(validator.check("25").unwrap().is_valid());
//!
//! // A malformed range is an error, not a failed check
//! assert!(matches!(
//!     evaluate("range", "1", &["[5,2)"]),
//!     Err(RuleError::Range { .. })
//! ));
//! ```

mod custom;
mod message;
mod rule;
mod validator;

pub use custom::{CustomRule, RuleFn, RuleKind};
pub use message::format_message;
pub use rule::{evaluate, Rule, RuleError};
pub use validator::{RuleSpec, Validator, Verdict};
