//! Tokenizer for range expressions.
//!
//! The lexer is a pure function of `(input, position)`: each call skips
//! whitespace and comments, then returns exactly one token and the position
//! just past it. Numeric literals follow the JavaScript grammar:
//!
//! - decimal: `42`, `3.5`, `1.`, `1e3`, `2.5E-4`
//! - radix: `0x1F`, `0o17`, `0b1010`
//! - legacy leading zero: `010` (octal, 8), `089` (decimal, 89)
//! - separators between digits: `1_000_000`, `0xFF_FF`
//! - big integer suffix `n` and decimal suffix `m`: `10n`, `0.1m`

use crate::chars::{self, CharClass, Punct};
use crate::error::LexError;
use std::fmt;
use winnow::combinator::{opt, preceded};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

/// Half-open byte range `[start, end)` into the expression text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Decoded value of a numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    /// Exact digits of an `n`-suffixed literal, separators removed.
    BigInt { digits: String, radix: u32 },
    /// Exact text of an `m`-suffixed literal, separators removed.
    Decimal(String),
}

impl Literal {
    pub fn to_f64(&self) -> f64 {
        match self {
            Literal::Number(n) => *n,
            Literal::BigInt { digits, radix } => fold_digits(digits, *radix),
            Literal::Decimal(text) => text.parse().unwrap_or(f64::NAN),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::BigInt { digits, radix } => {
                let prefix = match radix {
                    16 => "0x",
                    8 => "0o",
                    2 => "0b",
                    _ => "",
                };
                write!(f, "{}{}n", prefix, digits)
            }
            Literal::Decimal(text) => write!(f, "{}m", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(Literal),
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    /// `&`, joins clauses into a union.
    Union,
    Minus,
    Plus,
    Eof,
}

impl From<Punct> for TokenKind {
    fn from(p: Punct) -> Self {
        match p {
            Punct::OpenParen => TokenKind::OpenParen,
            Punct::CloseParen => TokenKind::CloseParen,
            Punct::OpenBracket => TokenKind::OpenBracket,
            Punct::CloseBracket => TokenKind::CloseBracket,
            Punct::Comma => TokenKind::Comma,
            Punct::Union => TokenKind::Union,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(lit) => write!(f, "number {}", lit),
            TokenKind::OpenParen => write!(f, "'('"),
            TokenKind::CloseParen => write!(f, "')'"),
            TokenKind::OpenBracket => write!(f, "'['"),
            TokenKind::CloseBracket => write!(f, "']'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Union => write!(f, "'&'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ============ Scanner ============

/// Scans one token starting at byte offset `position`.
///
/// Returns the token and the offset just past it. At the end of the input an
/// `Eof` token is returned and the position no longer advances.
pub fn next_token(input: &str, position: usize) -> Result<(Token, usize), LexError> {
    let start = skip_trivia(input, position)?;
    let Some(c) = chars::code_point_at(input, start) else {
        return Ok((Token::new(TokenKind::Eof, Span::new(start, start)), start));
    };

    let kind = match chars::classify(c) {
        CharClass::Digit => return scan_number(input, start),
        CharClass::Punct(p) => TokenKind::from(p),
        CharClass::Sign if c == '-' => TokenKind::Minus,
        CharClass::Sign => TokenKind::Plus,
        _ => return Err(LexError::UnexpectedChar { ch: c, pos: start }),
    };

    let end = start + c.len_utf8();
    log::trace!("token {} at {}..{}", kind, start, end);
    Ok((Token::new(kind, Span::new(start, end)), end))
}

fn skip_trivia(input: &str, mut pos: usize) -> Result<usize, LexError> {
    while let Some(c) = chars::code_point_at(input, pos) {
        match chars::classify(c) {
            CharClass::Whitespace | CharClass::NewLine => pos += c.len_utf8(),
            _ if input[pos..].starts_with("/*") => {
                let body = pos + 2;
                match input[body..].find("*/") {
                    Some(offset) => pos = body + offset + 2,
                    None => return Err(LexError::UnterminatedComment { start: pos }),
                }
            }
            _ if input[pos..].starts_with("//") => {
                pos = input[pos..]
                    .find(chars::is_newline)
                    .map_or(input.len(), |offset| pos + offset);
            }
            _ => break,
        }
    }
    Ok(pos)
}

fn scan_number(input: &str, start: usize) -> Result<(Token, usize), LexError> {
    let radix = input[start..]
        .strip_prefix('0')
        .and_then(|rest| rest.chars().next())
        .and_then(chars::radix_marker);

    let (literal, end) = match radix {
        Some(radix) => scan_radix(input, start, radix)?,
        None => scan_decimal(input, start)?,
    };

    if let Some(c) = chars::code_point_at(input, end) {
        if chars::is_identifier_start(c) {
            return Err(LexError::IdentifierAfterNumber { ch: c, pos: end });
        }
    }

    let span = Span::new(start, end);
    log::trace!("number {} at {}", literal, span);
    Ok((Token::new(TokenKind::Number(literal), span), end))
}

fn scan_radix(input: &str, start: usize, radix: u32) -> Result<(Literal, usize), LexError> {
    let digits_start = start + 2;
    let mut rest = &input[digits_start..];
    let run = radix_digits(&mut rest, radix).map_err(|_| LexError::MalformedNumber {
        span: Span::new(start, digits_start),
        reason: "expected digits after radix prefix",
    })?;
    let mut end = digits_start + run.len();
    if let Some(c) = chars::code_point_at(input, end).filter(char::is_ascii_digit) {
        return Err(LexError::InvalidDigit { ch: c, radix, pos: end });
    }
    if run.is_empty() {
        return Err(LexError::MalformedNumber {
            span: Span::new(start, digits_start),
            reason: "expected digits after radix prefix",
        });
    }
    check_separators(input, run, radix)?;

    let digits = run.replace('_', "");
    let literal = match chars::code_point_at(input, end) {
        Some('n') => {
            end += 1;
            Literal::BigInt { digits, radix }
        }
        Some('m') => {
            return Err(LexError::MalformedNumber {
                span: Span::new(start, end + 1),
                reason: "decimal suffix is not allowed on a radix literal",
            })
        }
        _ => Literal::Number(fold_digits(&digits, radix)),
    };
    Ok((literal, end))
}

fn scan_decimal(input: &str, start: usize) -> Result<(Literal, usize), LexError> {
    let mut rest = &input[start..];
    let parts = decimal_parts(&mut rest).map_err(|_| LexError::MalformedNumber {
        span: Span::new(start, start + 1),
        reason: "expected digits",
    })?;
    let end = input.len() - rest.len();
    let span = Span::new(start, end);

    if rest.starts_with(['e', 'E']) {
        return Err(LexError::MalformedNumber {
            span: Span::new(start, end + 1),
            reason: "missing exponent digits",
        });
    }

    for run in [Some(parts.integer), parts.fraction, parts.exponent]
        .into_iter()
        .flatten()
    {
        check_separators(input, run, 10)?;
    }

    let leading_zero = parts.integer.len() >= 2 && parts.integer.starts_with('0');
    if leading_zero {
        if let Some(offset) = parts.integer.find('_') {
            return Err(LexError::InvalidSeparator {
                pos: start + offset,
            });
        }
    }
    let legacy_octal = leading_zero && !parts.integer.contains(['8', '9']);
    let has_fraction = parts.fraction.is_some();
    let has_exponent = parts.exponent.is_some();

    if legacy_octal && (has_fraction || has_exponent) {
        return Err(LexError::MalformedNumber {
            span,
            reason: "legacy octal literal cannot have a fraction or exponent",
        });
    }

    let literal = match parts.suffix {
        Some('n') => {
            if has_fraction || has_exponent || leading_zero {
                return Err(LexError::MalformedNumber {
                    span,
                    reason: "invalid big integer literal",
                });
            }
            Literal::BigInt {
                digits: parts.integer.replace('_', ""),
                radix: 10,
            }
        }
        Some(_) => {
            if has_exponent || leading_zero {
                return Err(LexError::MalformedNumber {
                    span,
                    reason: "invalid decimal literal",
                });
            }
            Literal::Decimal(input[start..end - 1].replace('_', ""))
        }
        None if legacy_octal => Literal::Number(fold_digits(parts.integer, 8)),
        None => {
            let text = input[start..end].replace('_', "");
            let value = text.parse().map_err(|_| LexError::MalformedNumber {
                span,
                reason: "invalid number",
            })?;
            Literal::Number(value)
        }
    };
    Ok((literal, end))
}

/// A `_` must sit between two digits of the literal's radix.
fn check_separators(input: &str, run: &str, radix: u32) -> Result<(), LexError> {
    let base = run.as_ptr() as usize - input.as_ptr() as usize;
    let bytes = run.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(|b| (*b as char).is_digit(radix));

    for (i, b) in bytes.iter().enumerate() {
        if *b == b'_' && (i == 0 || !is_digit(i - 1) || !is_digit(i + 1)) {
            return Err(LexError::InvalidSeparator { pos: base + i });
        }
    }
    Ok(())
}

fn fold_digits(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * radix as f64 + d as f64)
}

// ============ Literal shape ============

struct DecimalParts<'a> {
    integer: &'a str,
    fraction: Option<&'a str>,
    exponent: Option<&'a str>,
    suffix: Option<char>,
}

fn is_decimal_or_separator(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

fn radix_digits<'a>(input: &mut &'a str, radix: u32) -> ModalResult<&'a str> {
    take_while(0.., move |c: char| c == '_' || c.is_digit(radix)).parse_next(input)
}

fn integer_part<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., is_decimal_or_separator).parse_next(input)
}

fn fraction_digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(0.., is_decimal_or_separator).parse_next(input)
}

fn exponent_part<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded(
        (one_of(['e', 'E']), opt(one_of(['+', '-']))),
        integer_part,
    )
    .parse_next(input)
}

fn literal_suffix(input: &mut &str) -> ModalResult<char> {
    one_of(['n', 'm']).parse_next(input)
}

fn decimal_parts<'a>(input: &mut &'a str) -> ModalResult<DecimalParts<'a>> {
    let integer = integer_part(input)?;
    let fraction = opt(preceded('.', fraction_digits)).parse_next(input)?;
    let exponent = opt(exponent_part).parse_next(input)?;
    let suffix = opt(literal_suffix).parse_next(input)?;
    Ok(DecimalParts {
        integer,
        fraction,
        exponent,
        suffix,
    })
}

// ============ Token stream ============

/// Iterator over the tokens of an expression, ending with `Eof`.
///
/// Stops after the first error.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            done: false,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match next_token(self.input, self.pos) {
            Ok((token, pos)) => {
                self.pos = pos;
                self.done = token.kind == TokenKind::Eof;
                Some(Ok(token))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).collect()
}
