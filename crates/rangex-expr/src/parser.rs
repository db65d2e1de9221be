//! Recursive-descent parser from tokens to intervals.
//!
//! ```text
//! expression := clause ("&" clause)*
//! clause     := ("(" | "[") bound? "," bound? (")" | "]")
//! bound      := ("-" | "+")? NUMBER
//! ```

use crate::error::ParseError;
use crate::interval::Interval;
use crate::lexer::{next_token, Span, Token, TokenKind};

/// Scan state shared by the parsing steps: the text, the offset just past
/// the current token, and the current token itself.
struct Cursor<'a> {
    text: &'a str,
    position: usize,
    current: Token,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Result<Self, ParseError> {
        let (current, position) = next_token(text, 0)?;
        Ok(Self {
            text,
            position,
            current,
        })
    }

    /// Advances to the next token and returns the one it replaced.
    fn bump(&mut self) -> Result<Token, ParseError> {
        let (next, position) = next_token(self.text, self.position)?;
        self.position = position;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.current.kind == *kind
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.current.kind.clone(),
            span: self.current.span,
        }
    }

    fn expression(&mut self) -> Result<Vec<Interval>, ParseError> {
        if self.at(&TokenKind::Eof) {
            return Err(ParseError::Empty);
        }

        let mut intervals = Vec::new();
        loop {
            let interval = self.clause(intervals.len())?;
            intervals.push(interval);
            if !self.at(&TokenKind::Union) {
                break;
            }
            self.bump()?;
        }

        if !self.at(&TokenKind::Eof) {
            return Err(self.unexpected("'&' or end of input"));
        }
        Ok(intervals)
    }

    fn clause(&mut self, index: usize) -> Result<Interval, ParseError> {
        let lower_inclusive = match self.current.kind {
            TokenKind::OpenBracket => true,
            TokenKind::OpenParen => false,
            _ => return Err(self.unexpected("'(' or '['")),
        };
        let open = self.bump()?;

        let lower = if self.at(&TokenKind::Comma) {
            self.bump()?;
            f64::NEG_INFINITY
        } else {
            let value = self.bound()?;
            if !self.at(&TokenKind::Comma) {
                return Err(self.unexpected("','"));
            }
            self.bump()?;
            value
        };

        let upper = match self.current.kind {
            TokenKind::CloseParen | TokenKind::CloseBracket => f64::INFINITY,
            _ => self.bound()?,
        };

        let upper_inclusive = match self.current.kind {
            TokenKind::CloseBracket => true,
            TokenKind::CloseParen => false,
            _ => return Err(self.unexpected("')' or ']'")),
        };
        let close = self.bump()?;

        let interval = Interval {
            lower,
            lower_inclusive,
            upper,
            upper_inclusive,
        };
        // also rejects NaN bounds
        if !(lower < upper) {
            return Err(ParseError::RangeOrder {
                index,
                rendered: interval.to_string(),
                span: Span::new(open.span.start, close.span.end),
            });
        }
        Ok(interval)
    }

    fn bound(&mut self) -> Result<f64, ParseError> {
        let negative = match self.current.kind {
            TokenKind::Minus => {
                self.bump()?;
                true
            }
            TokenKind::Plus => {
                self.bump()?;
                false
            }
            _ => false,
        };

        let value = match &self.current.kind {
            TokenKind::Number(literal) => literal.to_f64(),
            _ => return Err(self.unexpected("number")),
        };
        self.bump()?;
        Ok(if negative { -value } else { value })
    }
}

/// Parses a range expression into its clauses, in source order.
pub fn parse(text: &str) -> Result<Vec<Interval>, ParseError> {
    let intervals = Cursor::new(text)?.expression()?;
    log::debug!("parsed {} clause(s) from {:?}", intervals.len(), text);
    Ok(intervals)
}

/// Reads `text` as a single bound: an optional sign and one numeric literal,
/// with the same literal forms an expression accepts (`0x10`, `1_000`, `2.5e3`).
///
/// Anything else, including `inf`, `NaN` and trailing tokens, is `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let mut cursor = Cursor::new(text).ok()?;
    let value = cursor.bound().ok()?;
    (cursor.at(&TokenKind::Eof) && !value.is_nan()).then_some(value)
}
