//! Rules registered at runtime next to the built-in table.

use crate::rule::{Rule, RuleError};
use std::fmt;
use std::sync::Arc;

/// Signature of a registered rule: the value, then the rule's parameters.
pub type RuleFn = dyn Fn(&str, &[String]) -> bool + Send + Sync;

const FALLBACK_MESSAGE: &str = "Please enter a valid value";

#[derive(Clone)]
pub struct CustomRule {
    name: String,
    check: Arc<RuleFn>,
    message: String,
}

impl CustomRule {
    /// Without a `message`, a rule named after a built-in keeps the
    /// built-in's message; any other name gets a generic one.
    pub fn new<F>(name: impl Into<String>, check: F, message: Option<&str>) -> Self
    where
        F: Fn(&str, &[String]) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let message = match message {
            Some(message) => message.to_string(),
            None => name
                .parse::<Rule>()
                .map_or(FALLBACK_MESSAGE, Rule::default_message)
                .to_string(),
        };
        Self {
            name,
            check: Arc::new(check),
            message,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_message(&self) -> &str {
        &self.message
    }

    pub fn check(&self, value: &str, params: &[String]) -> bool {
        (self.check)(value, params)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.check, &other.check)
    }
}

/// The rule a [`RuleSpec`](crate::RuleSpec) runs: built in or registered.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    Builtin(Rule),
    Custom(CustomRule),
}

impl RuleKind {
    pub fn name(&self) -> &str {
        match self {
            RuleKind::Builtin(rule) => rule.name(),
            RuleKind::Custom(custom) => custom.name(),
        }
    }

    pub fn default_message(&self) -> &str {
        match self {
            RuleKind::Builtin(rule) => rule.default_message(),
            RuleKind::Custom(custom) => custom.default_message(),
        }
    }

    pub fn check(&self, value: &str, params: &[String]) -> Result<bool, RuleError> {
        match self {
            RuleKind::Builtin(rule) => rule.check(value, params),
            RuleKind::Custom(custom) => {
                let passed = custom.check(value, params);
                log::debug!("custom rule {} on {:?}: {}", custom.name(), value, passed);
                Ok(passed)
            }
        }
    }
}

impl From<Rule> for RuleKind {
    fn from(rule: Rule) -> Self {
        RuleKind::Builtin(rule)
    }
}

impl From<CustomRule> for RuleKind {
    fn from(custom: CustomRule) -> Self {
        RuleKind::Custom(custom)
    }
}

impl PartialEq<Rule> for RuleKind {
    fn eq(&self, other: &Rule) -> bool {
        matches!(self, RuleKind::Builtin(rule) if rule == other)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_even(value: &str, _params: &[String]) -> bool {
        value.parse::<i64>().is_ok_and(|n| n % 2 == 0)
    }

    #[test]
    fn test_custom_check_gets_params() {
        let starts_with = |value: &str, params: &[String]| {
            params.first().is_some_and(|p| value.starts_with(p.as_str()))
        };
        let prefix = CustomRule::new("prefix", starts_with, None);
        assert!(prefix.check("rx-1", &["rx-".to_string()]));
        assert!(!prefix.check("tx-1", &["rx-".to_string()]));
        assert!(!prefix.check("rx-1", &[]));
    }

    #[test]
    fn test_default_messages() {
        let even = CustomRule::new("even", is_even, Some("{0} is odd"));
        assert_eq!(even.default_message(), "{0} is odd");
        let even = CustomRule::new("even", is_even, None);
        assert_eq!(even.default_message(), FALLBACK_MESSAGE);
        let digits = CustomRule::new("digits", is_even, None);
        assert_eq!(digits.default_message(), Rule::Digits.default_message());
    }

    #[test]
    fn test_kind_dispatch() {
        let builtin = RuleKind::from(Rule::Required);
        assert_eq!(builtin, Rule::Required);
        assert!(!builtin.check(" ", &[]).unwrap());

        let custom = RuleKind::from(CustomRule::new("even", is_even, None));
        assert_ne!(custom, Rule::Required);
        assert_eq!(custom.to_string(), "even");
        assert!(custom.check("4", &[]).unwrap());
        assert!(!custom.check("5", &[]).unwrap());
    }

    #[test]
    fn test_equality_follows_the_function() {
        let first = CustomRule::new("even", is_even, None);
        assert_eq!(first, first.clone());
        assert_ne!(first, CustomRule::new("even", is_even, None));
    }
}
