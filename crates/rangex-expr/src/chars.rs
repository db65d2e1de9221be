//! Code point classification for the range expression lexer.

/// One of the structural characters of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Digit,
    /// Letters that mark a radix prefix, a literal suffix or an exponent.
    NumericMarker,
    Whitespace,
    NewLine,
    Punct(Punct),
    Sign,
    Other,
}

pub fn classify(c: char) -> CharClass {
    match c {
        '0'..='9' => CharClass::Digit,
        'x' | 'X' | 'o' | 'O' | 'b' | 'B' | 'n' | 'm' | 'e' | 'E' => CharClass::NumericMarker,
        '(' => CharClass::Punct(Punct::OpenParen),
        ')' => CharClass::Punct(Punct::CloseParen),
        '[' => CharClass::Punct(Punct::OpenBracket),
        ']' => CharClass::Punct(Punct::CloseBracket),
        ',' => CharClass::Punct(Punct::Comma),
        '&' => CharClass::Punct(Punct::Union),
        '+' | '-' => CharClass::Sign,
        c if is_newline(c) => CharClass::NewLine,
        c if is_whitespace(c) => CharClass::Whitespace,
        _ => CharClass::Other,
    }
}

pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\u{000B}'
            | '\u{000C}'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

pub fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Radix selected by the letter following a leading `0`.
pub fn radix_marker(c: char) -> Option<u32> {
    match c {
        'x' | 'X' => Some(16),
        'o' | 'O' => Some(8),
        'b' | 'B' => Some(2),
        _ => None,
    }
}

/// Decodes the full code point starting at byte offset `pos`.
pub fn code_point_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..)?.chars().next()
}
