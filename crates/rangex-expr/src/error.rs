use crate::lexer::{Span, TokenKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character {ch:?} at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unterminated block comment starting at {start}")]
    UnterminatedComment { start: usize },
    #[error("malformed number at {span}: {reason}")]
    MalformedNumber { span: Span, reason: &'static str },
    #[error("invalid digit {ch:?} for base {radix} at {pos}")]
    InvalidDigit { ch: char, radix: u32, pos: usize },
    #[error("numeric separator not allowed at {pos}")]
    InvalidSeparator { pos: usize },
    #[error("identifier character {ch:?} directly after number at {pos}")]
    IdentifierAfterNumber { ch: char, pos: usize },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { ch, pos }
            | LexError::InvalidDigit { ch, pos, .. }
            | LexError::IdentifierAfterNumber { ch, pos } => Span::new(*pos, pos + ch.len_utf8()),
            LexError::UnterminatedComment { start } => Span::new(*start, start + 2),
            LexError::MalformedNumber { span, .. } => *span,
            LexError::InvalidSeparator { pos } => Span::new(*pos, pos + 1),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("empty range expression")]
    Empty,
    #[error("expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
        span: Span,
    },
    #[error("Range Error at {index} for {rendered}")]
    RangeOrder {
        index: usize,
        rendered: String,
        span: Span,
    },
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Lex(e) => Some(e.span()),
            ParseError::Empty => None,
            ParseError::UnexpectedToken { span, .. } | ParseError::RangeOrder { span, .. } => {
                Some(*span)
            }
        }
    }
}
