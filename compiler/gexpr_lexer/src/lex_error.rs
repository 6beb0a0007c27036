//! Lexical errors.

use gexpr_ir::Span;
use thiserror::Error;

/// What went wrong while lexing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("invalid character {0:?}")]
    InvalidChar(char),
    #[error("unknown escape sequence")]
    UnknownEscape,
    #[error("escape sequence is invalid Unicode code point")]
    InvalidCodePoint,
    #[error("octal escape value > 255")]
    OctalOutOfRange,
    #[error("rune literal not terminated")]
    UnterminatedRune,
    #[error("more than one character in rune literal")]
    MultiCharRune,
    #[error("empty rune literal or unescaped ' in rune literal")]
    EmptyRune,
    #[error("string literal not terminated")]
    UnterminatedString,
    #[error("'_' must separate successive digits")]
    BadDigitSeparator,
    #[error("expression source exceeds 4GiB")]
    SourceTooLarge,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[cold]
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }
}
