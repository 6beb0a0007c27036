//! Recursive descent parser for gexpr expressions.
//!
//! Parses exactly one expression. Type expressions (`[]int`, `map[K]V`,
//! `*T`, `func(int) string`, ...) are ordinary operands so they can appear
//! as conversion callees, `make`/`new` arguments and composite literal types.

mod cursor;
mod error;
mod grammar;

use gexpr_ir::{Expr, TokenList};
use tracing::trace;

use cursor::Cursor;
pub use error::{ParseError, ParseErrorKind};

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }

    /// Parse one expression and require the token stream to end after it.
    pub fn parse_complete_expr(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        if !self.cursor.is_at_end() {
            return Err(self.cursor.unexpected("end of expression"));
        }
        Ok(expr)
    }
}

/// Lex and parse `source` as a single expression.
pub fn parse_expr(source: &str) -> Result<Expr, ParseError> {
    let output = gexpr_lexer::lex(source);
    if let Some(err) = output.errors.into_iter().next() {
        return Err(err.into());
    }
    trace!(tokens = output.tokens.len(), "lexed expression");
    Parser::new(&output.tokens).parse_complete_expr()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
