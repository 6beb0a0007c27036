//! Parse error types.

use gexpr_ir::Span;
use gexpr_lexer::{LexError, LexErrorKind};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("{0}")]
    Lex(LexErrorKind),
    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },
    #[error("expected operand, found {found}")]
    ExpectedOperand { found: String },
    #[error("expected type, found {found}")]
    ExpectedType { found: String },
    #[error("mixed named and unnamed parameters")]
    MixedParams,
    #[error("function literals are not supported")]
    FuncLit,
    #[error("missing type in composite literal")]
    MissingCompositeType,
    #[error("channel receive is not supported")]
    Receive,
    #[error("embedded interfaces are not supported")]
    EmbeddedInterface,
}

/// Parse failure with the span of the offending token.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(ParseErrorKind::Lex(err.kind), err.span)
    }
}
