use crate::error::{Error, Result};
use rangex_expr::{parse_number, tokenize, ParseError, RangeExpr, Token};
use rangex_rules::{Validator, Verdict};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq)]
pub struct ValueResult {
    pub value: String,
    /// The number tested against the expression, if the value had one.
    pub measured: Option<f64>,
    pub passed: bool,
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub source: String,
    pub expression: RangeExpr,
    pub results: Vec<ValueResult>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }
}

#[derive(Debug, Clone)]
pub struct ExplainReport {
    pub source: String,
    pub expression: RangeExpr,
    pub tokens: Option<Vec<Token>>,
}

#[derive(Debug, Clone)]
pub struct ValidateReport {
    pub value: String,
    pub rules: Vec<String>,
    pub verdict: Verdict,
}

fn parse_expression(source: &str) -> Result<RangeExpr> {
    RangeExpr::parse(source).map_err(|e| expression_error(source, e))
}

fn expression_error(source: &str, e: ParseError) -> Error {
    Error::Expression {
        expression: source.to_string(),
        source: e,
    }
}

/// Values from the command line, or lines from `stdin` when there are none
/// or the only value is `-`.
pub fn read_values(values: &[String], stdin: impl BufRead) -> Result<Vec<String>> {
    let from_stdin = values.is_empty() || (values.len() == 1 && values[0] == "-");
    if !from_stdin {
        return Ok(values.to_vec());
    }
    let mut lines = Vec::new();
    for line in stdin.lines() {
        let line = line.map_err(Error::ReadStdin)?;
        let line = line.trim_end_matches('\r');
        if !line.trim().is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

pub fn check(source: &str, values: &[String], length: bool) -> Result<CheckReport> {
    let expression = parse_expression(source)?;
    let results = values
        .iter()
        .map(|value| {
            let measured = if length {
                Some(value.chars().count() as f64)
            } else {
                parse_number(value)
            };
            let passed = measured.is_some_and(|v| expression.contains(v));
            log::debug!("{:?} measured as {:?}: {}", value, measured, passed);
            ValueResult {
                value: value.clone(),
                measured,
                passed,
            }
        })
        .collect();
    Ok(CheckReport {
        source: source.to_string(),
        expression,
        results,
    })
}

pub fn explain(source: &str, with_tokens: bool) -> Result<ExplainReport> {
    let expression = parse_expression(source)?;
    let tokens = if with_tokens {
        let tokens = tokenize(source).map_err(|e| expression_error(source, e.into()))?;
        Some(tokens)
    } else {
        None
    };
    Ok(ExplainReport {
        source: source.to_string(),
        expression,
        tokens,
    })
}

pub fn validate(value: &str, rules: &[String], message: Option<&str>) -> Result<ValidateReport> {
    let mut validator = Validator::new();
    for rule in rules {
        validator.add_rule(rule, message)?;
    }
    let verdict = validator.check(value)?;
    Ok(ValidateReport {
        value: value.to_string(),
        rules: validator.rules().iter().map(|r| r.to_string()).collect(),
        verdict,
    })
}
