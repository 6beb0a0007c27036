//! Shared syntax data for the gexpr expression evaluator.
//!
//! Holds everything the lexer, parser and evaluator agree on:
//! - [`Span`] byte ranges and the [`SourceMap`] that turns them into
//!   line/column [`Position`]s
//! - [`Token`] kinds produced by the lexer
//! - the [`Expr`] tree produced by the parser and walked by the evaluator
//! - [`ensure_sufficient_stack`] for recursive passes over that tree

mod ast;
mod source_map;
mod span;
mod stack;
mod token;

pub use ast::{
    ArrayLen, BinaryOp, ChanDirSyntax, Expr, ExprKind, FieldDecl, FuncTypeExpr, Ident, Literal,
    MethodSpec, Param, UnaryOp,
};
pub use source_map::{Position, SourceMap, DEFAULT_FILE_NAME};
pub use span::{Span, SpanError};
pub use stack::ensure_sufficient_stack;
pub use token::{Token, TokenKind, TokenList};
