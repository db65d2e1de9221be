//! Range expressions: unions of numeric intervals written as text.
//!
//! Supports:
//! - Closed and open bounds: `[0,10]`, `(0,10)`, `[0,10)`
//! - Unbounded sides: `(,5]`, `[0,)`, `(,)`
//! - Unions of clauses joined by `&`: `[0,10)&[20,30]`
//! - Signed bounds: `[-5,5]`
//! - Numeric literals: `1_000`, `2.5e3`, `0x1F`, `0o17`, `0b101`, `10n`, `0.5m`
//! - Comments: `// line`, `/* block */`
//!
//! # Example
//!
//! ```
//! use rangex_expr::{is_in_range, ParseError};
//!
//! assert!(is_in_range(5.0, "[0,10)&[20,30]").unwrap());
//! assert!(!is_in_range(15.0, "[0,10)&[20,30]").unwrap());
//! assert!(matches!(
//!     is_in_range(1.0, "[5,2)"),
//!     Err(ParseError::RangeOrder { index: 0, .. })
//! ));
//! ```

pub mod chars;
mod error;
mod eval;
mod interval;
pub mod lexer;
mod parser;

pub use error::{LexError, ParseError};
pub use eval::contains;
pub use interval::{Interval, RangeExpr};
pub use lexer::{next_token, tokenize, Lexer, Literal, Span, Token, TokenKind};
pub use parser::{parse, parse_number};

/// Parses `expression` and tests whether `value` lies in any of its clauses.
///
/// A malformed expression is an error, never `false`.
pub fn is_in_range(value: f64, expression: &str) -> Result<bool, ParseError> {
    let intervals = parse(expression)?;
    Ok(contains(value, &intervals))
}
