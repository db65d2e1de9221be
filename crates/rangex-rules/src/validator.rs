//! A list of rules checked against a single value.

use crate::custom::{CustomRule, RuleKind};
use crate::message::format_message;
use crate::rule::{Rule, RuleError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One rule with its parameters and an optional custom message.
///
/// Written as `name` or `name:param:param`, e.g. `range:[0,10)&[20,30]` or
/// `minlength:3:true`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpec {
    pub rule: RuleKind,
    pub params: Vec<String>,
    pub message: Option<String>,
}

impl RuleSpec {
    pub fn new(rule: impl Into<RuleKind>) -> Self {
        Self {
            rule: rule.into(),
            params: Vec::new(),
            message: None,
        }
    }

    /// Parses a built-in rule. Names registered on a [`Validator`] resolve
    /// through [`Validator::parse_rule`] instead.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let (name, params) = split_spec(text);
        let rule = name.parse::<Rule>()?;
        Ok(Self {
            params,
            ..Self::new(rule)
        })
    }

    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn check(&self, value: &str) -> Result<bool, RuleError> {
        self.rule.check(value, &self.params)
    }

    /// The custom message if set, otherwise the rule's default, with
    /// placeholders filled from the parameters.
    pub fn failure_message(&self) -> String {
        let template = self
            .message
            .as_deref()
            .unwrap_or_else(|| self.rule.default_message());
        format_message(template, &self.params)
    }
}

fn split_spec(text: &str) -> (&str, Vec<String>) {
    let mut parts = text.trim().split(':');
    let name = parts.next().unwrap_or_default().trim();
    let params = parts.map(|p| p.trim().to_string()).collect();
    (name, params)
}

impl FromStr for RuleSpec {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleSpec::parse(s)
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rule)?;
        for param in &self.params {
            write!(f, ":{}", param)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Valid,
    Invalid { rule: RuleKind, message: String },
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Vec<RuleSpec>,
    methods: HashMap<String, CustomRule>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, spec: RuleSpec) -> Self {
        self.rules.push(spec);
        self
    }

    /// Registers `check` under `name` for later [`add_rule`](Self::add_rule)
    /// calls. Registered names shadow built-in ones. Re-registering a name
    /// without a message keeps the message it had.
    pub fn add_method<F>(&mut self, name: &str, check: F, message: Option<&str>)
    where
        F: Fn(&str, &[String]) -> bool + Send + Sync + 'static,
    {
        let message = message.map(str::to_string).or_else(|| {
            self.methods
                .get(name)
                .map(|custom| custom.default_message().to_string())
        });
        let custom = CustomRule::new(name, check, message.as_deref());
        log::debug!("registered rule {}", name);
        self.methods.insert(name.to_string(), custom);
    }

    /// Like [`RuleSpec::parse`], but registered names win over built-ins.
    pub fn parse_rule(&self, text: &str) -> Result<RuleSpec, RuleError> {
        let (name, params) = split_spec(text);
        let rule = match self.methods.get(name) {
            Some(custom) => RuleKind::Custom(custom.clone()),
            None => RuleKind::Builtin(name.parse()?),
        };
        Ok(RuleSpec {
            params,
            ..RuleSpec::new(rule)
        })
    }

    /// Parses `spec` and appends it, with an optional custom message.
    pub fn add_rule(&mut self, spec: &str, message: Option<&str>) -> Result<(), RuleError> {
        let mut spec = self.parse_rule(spec)?;
        spec.message = message.map(str::to_string);
        self.rules.push(spec);
        Ok(())
    }

    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }

    /// Checks every rule in order and reports the first failure.
    ///
    /// A rule with malformed parameters is an error even when an earlier
    /// rule already failed.
    pub fn check(&self, value: &str) -> Result<Verdict, RuleError> {
        let mut verdict = Verdict::Valid;
        for spec in &self.rules {
            let passed = spec.check(value)?;
            if !passed && verdict.is_valid() {
                verdict = Verdict::Invalid {
                    rule: spec.rule.clone(),
                    message: spec.failure_message(),
                };
            }
        }
        log::debug!(
            "{} rule(s) on {:?}: valid={}",
            self.rules.len(),
            value,
            verdict.is_valid()
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_parse() {
        let spec = RuleSpec::parse("range:[0,10)&[20,30]").unwrap();
        assert_eq!(spec.rule, Rule::Range);
        assert_eq!(spec.params, vec!["[0,10)&[20,30]"]);

        let spec: RuleSpec = " minlength : 3 : true ".parse().unwrap();
        assert_eq!(spec.rule, Rule::MinLength);
        assert_eq!(spec.params, vec!["3", "true"]);
        assert_eq!(spec.to_string(), "minlength:3:true");

        assert_eq!(
            RuleSpec::parse("bogus:1"),
            Err(RuleError::UnknownRule("bogus".to_string()))
        );
    }

    #[test]
    fn test_failure_messages() {
        let spec = RuleSpec::new(Rule::MinLength).param("3");
        assert_eq!(spec.failure_message(), "Please enter at least 3 characters");
        let spec = RuleSpec::new(Rule::Range)
            .param("[1,5]")
            .message("pick from {0}, got it?");
        assert_eq!(spec.failure_message(), "pick from [1,5], got it?");
    }

    #[test]
    fn test_validator_reports_first_failure() {
        let validator = Validator::new()
            .rule(RuleSpec::new(Rule::Required))
            .rule(RuleSpec::new(Rule::Number))
            .rule(RuleSpec::new(Rule::Range).param("[0,10)&[20,30]"));

        assert_eq!(validator.check("25").unwrap(), Verdict::Valid);
        assert_eq!(
            validator.check("15").unwrap(),
            Verdict::Invalid {
                rule: Rule::Range.into(),
                message: "Please enter a value within [0,10)&[20,30]".to_string(),
            }
        );
        assert_eq!(
            validator.check("").unwrap(),
            Verdict::Invalid {
                rule: Rule::Required.into(),
                message: "This field is required".to_string(),
            }
        );
    }

    #[test]
    fn test_validator_checks_every_rule() {
        let mut validator = Validator::new();
        validator.add_rule("required", None).unwrap();
        validator.add_rule("range:[5,2)", Some("bad")).unwrap();
        assert_eq!(validator.rules().len(), 2);
        // the empty value fails `required`, but the malformed range still surfaces
        assert!(matches!(
            validator.check(""),
            Err(RuleError::Range { .. })
        ));
    }

    #[test]
    fn test_custom_message() {
        let mut validator = Validator::new();
        validator
            .add_rule("max:100:true", Some("at most {0}"))
            .unwrap();
        assert!(validator.check("100").unwrap().is_valid());
        assert_eq!(
            validator.check("101").unwrap(),
            Verdict::Invalid {
                rule: Rule::Max.into(),
                message: "at most 100".to_string(),
            }
        );
    }

    fn is_hex_color(value: &str, _params: &[String]) -> bool {
        value.len() == 7
            && value.starts_with('#')
            && value[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn test_registered_rule() {
        let mut validator = Validator::new();
        assert_eq!(
            validator.add_rule("color", None),
            Err(RuleError::UnknownRule("color".to_string()))
        );

        validator.add_method("color", is_hex_color, Some("{0} wants a hex color"));
        validator.add_rule("required", None).unwrap();
        validator.add_rule("color:background", None).unwrap();
        assert_eq!(validator.rules()[1].rule.name(), "color");
        assert_eq!(validator.rules()[1].to_string(), "color:background");

        assert!(validator.check("#00ff7f").unwrap().is_valid());
        match validator.check("green").unwrap() {
            Verdict::Invalid { rule, message } => {
                assert_eq!(rule.name(), "color");
                assert_eq!(message, "background wants a hex color");
            }
            Verdict::Valid => panic!("expected an invalid verdict"),
        }
    }

    #[test]
    fn test_registered_rule_params_and_message() {
        let mut validator = Validator::new();
        validator.add_method(
            "oneOf",
            |value: &str, params: &[String]| params.iter().any(|p| p == value),
            None,
        );
        validator.add_rule("oneOf:red:green", None).unwrap();
        assert!(validator.check("green").unwrap().is_valid());
        assert_eq!(
            validator.check("blue").unwrap(),
            Verdict::Invalid {
                rule: validator.rules()[0].rule.clone(),
                message: "Please enter a valid value".to_string(),
            }
        );

        // a second registration without a message keeps the first message
        validator.add_method("even", |v: &str, _: &[String]| v.len() % 2 == 0, Some("odd"));
        validator.add_method("even", |v: &str, _: &[String]| v.len() % 2 == 0, None);
        validator.add_rule("even", Some("custom wins")).unwrap();
        validator.add_rule("even", None).unwrap();
        let messages: Vec<_> = validator.rules()[1..]
            .iter()
            .map(RuleSpec::failure_message)
            .collect();
        assert_eq!(messages, vec!["custom wins", "odd"]);
    }

    #[test]
    fn test_registered_rule_shadows_builtin() {
        let mut validator = Validator::new();
        validator.add_method("digits", |v: &str, _: &[String]| v == "0", None);
        validator.add_rule("digits", None).unwrap();
        assert!(matches!(validator.rules()[0].rule, RuleKind::Custom(_)));
        assert!(!validator.check("42").unwrap().is_valid());
        assert_eq!(
            validator.rules()[0].failure_message(),
            Rule::Digits.default_message()
        );
        // a static parse still sees the built-in table
        assert_eq!(RuleSpec::parse("digits").unwrap().rule, Rule::Digits);
    }
}
