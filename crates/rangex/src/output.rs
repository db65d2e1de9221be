use crate::commands::{CheckReport, ExplainReport, ValidateReport};
use crate::error::Error;
use rangex_expr::chars::is_newline;
use rangex_expr::{Interval, ParseError, Span};
use rangex_rules::Verdict;
use serde_json::{json, Value};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub struct Output {
    stdout: StandardStream,
    stderr: StandardStream,
    json: bool,
}

impl Output {
    pub fn new(color: bool, json: bool) -> Self {
        let color_choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(color_choice),
            stderr: StandardStream::stderr(color_choice),
            json,
        }
    }

    fn set_color(&mut self, color: Color) {
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    }

    fn set_dim(&mut self) {
        let _ = self.stdout.set_color(ColorSpec::new().set_dimmed(true));
    }

    fn reset(&mut self) {
        let _ = self.stdout.reset();
    }

    fn print_json(&mut self, value: &Value) -> io::Result<()> {
        writeln!(self.stdout, "{}", value)
    }

    fn print_mark(&mut self, passed: bool) -> io::Result<()> {
        if passed {
            self.set_color(Color::Green);
            write!(self.stdout, "✓")?;
        } else {
            self.set_color(Color::Red);
            write!(self.stdout, "✗")?;
        }
        self.reset();
        Ok(())
    }

    pub fn print_check(&mut self, report: &CheckReport) -> io::Result<()> {
        if self.json {
            let results: Vec<Value> = report
                .results
                .iter()
                .map(|r| json!({ "value": r.value, "measured": r.measured, "passed": r.passed }))
                .collect();
            return self.print_json(&json!({
                "expression": report.source,
                "passed": report.passed(),
                "results": results,
            }));
        }

        for result in &report.results {
            self.print_mark(result.passed)?;
            write!(self.stdout, " {}", result.value)?;
            if result.measured.is_none() {
                self.set_dim();
                write!(self.stdout, " (not a number)")?;
                self.reset();
            }
            writeln!(self.stdout)?;
        }
        Ok(())
    }

    pub fn print_explain(&mut self, report: &ExplainReport) -> io::Result<()> {
        if self.json {
            let clauses: Vec<Value> = report
                .expression
                .intervals()
                .iter()
                .map(clause_json)
                .collect();
            let mut value = json!({
                "expression": report.source,
                "canonical": report.expression.to_string(),
                "clauses": clauses,
            });
            if let Some(tokens) = &report.tokens {
                value["tokens"] = tokens
                    .iter()
                    .map(|t| json!({ "kind": t.kind.to_string(), "start": t.span.start, "end": t.span.end }))
                    .collect();
            }
            return self.print_json(&value);
        }

        writeln!(self.stdout, "{}", report.expression)?;
        for (index, interval) in report.expression.intervals().iter().enumerate() {
            self.set_dim();
            write!(self.stdout, "  clause {}: ", index)?;
            self.reset();
            writeln!(self.stdout, "{}  {}", interval, describe(interval))?;
        }
        if let Some(tokens) = &report.tokens {
            writeln!(self.stdout, "tokens:")?;
            for token in tokens {
                self.set_dim();
                write!(self.stdout, "  {:>8} ", token.span.to_string())?;
                self.reset();
                writeln!(self.stdout, "{}", token.kind)?;
            }
        }
        Ok(())
    }

    pub fn print_verdict(&mut self, report: &ValidateReport) -> io::Result<()> {
        if self.json {
            let value = match &report.verdict {
                Verdict::Valid => json!({
                    "value": report.value,
                    "rules": report.rules,
                    "valid": true,
                }),
                Verdict::Invalid { rule, message } => json!({
                    "value": report.value,
                    "rules": report.rules,
                    "valid": false,
                    "rule": rule.name(),
                    "message": message,
                }),
            };
            return self.print_json(&value);
        }

        self.print_mark(report.verdict.is_valid())?;
        match &report.verdict {
            Verdict::Valid => writeln!(self.stdout, " {}", report.value),
            Verdict::Invalid { rule, message } => {
                write!(self.stdout, " {}: {}", report.value, message)?;
                self.set_dim();
                write!(self.stdout, " ({})", rule)?;
                self.reset();
                writeln!(self.stdout)
            }
        }
    }

    /// Reports a failed command, pointing at the offending part of the
    /// expression when its position is known.
    pub fn print_error(&mut self, error: &Error) -> io::Result<()> {
        let located = match error {
            Error::Expression { expression, source } => {
                source.span().map(|span| (expression.as_str(), span))
            }
            _ => None,
        };

        if self.json {
            let mut value = json!({ "error": error.to_string() });
            if let Some((_, span)) = located {
                value["span"] = json!([span.start, span.end]);
            }
            return self.print_json(&value);
        }

        let _ = self
            .stderr
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        write!(self.stderr, "error")?;
        let _ = self.stderr.reset();
        writeln!(self.stderr, ": {}", error)?;

        if let Some((expression, span)) = located {
            let (line, column, width) = caret_position(expression, span);
            writeln!(self.stderr, "  {}", line)?;
            let _ = self.stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
            writeln!(self.stderr, "  {}{}", " ".repeat(column), "^".repeat(width))?;
            let _ = self.stderr.reset();
        }
        if let Error::Expression {
            source: ParseError::Empty,
            ..
        } = error
        {
            writeln!(self.stderr, "  an expression needs at least one clause such as [0,10)")?;
        }
        Ok(())
    }
}

fn clause_json(interval: &Interval) -> Value {
    let bound = |unbounded: bool, value: f64| if unbounded { None } else { Some(value) };
    json!({
        "text": interval.to_string(),
        "lower": bound(interval.is_lower_unbounded(), interval.lower),
        "lower_inclusive": interval.lower_inclusive,
        "upper": bound(interval.is_upper_unbounded(), interval.upper),
        "upper_inclusive": interval.upper_inclusive,
    })
}

fn describe(interval: &Interval) -> String {
    let lower = if interval.is_lower_unbounded() {
        String::new()
    } else {
        let op = if interval.lower_inclusive { "<=" } else { "<" };
        format!("{} {} ", interval.lower, op)
    };
    let upper = if interval.is_upper_unbounded() {
        String::new()
    } else {
        let op = if interval.upper_inclusive { "<=" } else { "<" };
        format!(" {} {}", op, interval.upper)
    };
    if lower.is_empty() && upper.is_empty() {
        "any number".to_string()
    } else {
        format!("{}x{}", lower, upper)
    }
}

/// The source line holding `span.start`, with the caret column and width
/// counted in characters.
fn caret_position(text: &str, span: Span) -> (&str, usize, usize) {
    let start = span.start.min(text.len());
    let line_start = text[..start]
        .char_indices()
        .filter(|(_, c)| is_newline(*c))
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    let line_end = text[start..]
        .char_indices()
        .find(|(_, c)| is_newline(*c))
        .map_or(text.len(), |(i, _)| start + i);
    let line = &text[line_start..line_end];
    let column = text[line_start..start].chars().count();
    let width = if span.is_empty() {
        1
    } else {
        let end = (start + span.len()).min(line_end);
        text[start..end].chars().count().max(1)
    };
    (line, column, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_position() {
        assert_eq!(caret_position("[5,2)", Span::new(0, 5)), ("[5,2)", 0, 5));
        assert_eq!(caret_position("[1,2", Span::new(4, 4)), ("[1,2", 4, 1));
        assert_eq!(caret_position("[1,2x]", Span::new(4, 5)), ("[1,2x]", 4, 1));
    }

    #[test]
    fn test_caret_position_multiline() {
        let text = "[0,1] &\n[3,2]";
        assert_eq!(caret_position(text, Span::new(8, 13)), ("[3,2]", 0, 5));
        assert_eq!(caret_position("[0,1]\n", Span::new(6, 6)), ("", 0, 1));
    }

    #[test]
    fn test_caret_counts_characters() {
        // "é" is two bytes but one column
        assert_eq!(caret_position("é [1,x]", Span::new(6, 7)), ("é [1,x]", 5, 1));
    }

    #[test]
    fn test_describe() {
        let expr = rangex_expr::RangeExpr::parse("[0,10)&(,5]&(,)").unwrap();
        let described: Vec<_> = expr.intervals().iter().map(describe).collect();
        assert_eq!(described, vec!["0 <= x < 10", "x <= 5", "any number"]);
    }
}
