//! Parse error types.
//!
//! Lexing and parsing share one error type: a `ParseErrorKind` saying what
//! went wrong and the byte span where it happened. Converting the span to a
//! `line:column` pair is left to the caller, which owns the source text.

use std::fmt;

use jcat_ir::Span;

/// What went wrong while reading a source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A byte that starts no token.
    UnexpectedChar(char),
    /// Missing closing quote.
    UnterminatedString,
    /// Missing `*/`.
    UnterminatedComment,
    /// Missing closing `|||`, or a text block without a first line.
    UnterminatedTextBlock,
    /// Text block lines must share the first line's indentation.
    TextBlockIndent,
    /// Unknown escape sequence such as `\q`.
    InvalidEscape(char),
    /// Malformed `\uXXXX` escape.
    InvalidUnicodeEscape,
    /// Malformed number literal such as `1e`.
    InvalidNumber,
    /// A token other than the one the grammar requires.
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    /// The same fixed field name twice in one object literal.
    DuplicateField(String),
    /// Source text too long for `u32` byte offsets.
    SourceTooLarge(usize),
}

/// A lexing or parsing failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }

    #[cold]
    pub fn unexpected(expected: &'static str, found: impl Into<String>, span: Span) -> Self {
        ParseError {
            kind: ParseErrorKind::UnexpectedToken {
                expected,
                found: found.into(),
            },
            span,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            ParseErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ParseErrorKind::UnterminatedComment => f.write_str("unterminated comment"),
            ParseErrorKind::UnterminatedTextBlock => f.write_str("unterminated text block"),
            ParseErrorKind::TextBlockIndent => {
                f.write_str("text block lines must keep the first line's indentation")
            }
            ParseErrorKind::InvalidEscape(c) => write!(f, "unknown escape sequence \\{c}"),
            ParseErrorKind::InvalidUnicodeEscape => f.write_str("malformed \\u escape"),
            ParseErrorKind::InvalidNumber => f.write_str("malformed number literal"),
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ParseErrorKind::DuplicateField(name) => write!(f, "duplicate field: {name}"),
            ParseErrorKind::SourceTooLarge(len) => {
                write!(f, "source is {len} bytes, the limit is {} bytes", u32::MAX)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for ParseError {}
