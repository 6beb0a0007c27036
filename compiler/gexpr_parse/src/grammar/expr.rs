//! Expression parsing: binary precedence climbing, unary operators,
//! operands and postfix forms.

use gexpr_ir::{ensure_sufficient_stack, BinaryOp, Expr, ExprKind, Literal, TokenKind, UnaryOp};

use crate::{ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    /// Parse an expression (`||` level).
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(1)
    }

    fn current_binary_op(&self) -> Option<BinaryOp> {
        Some(match self.cursor.current_kind() {
            TokenKind::PipePipe => BinaryOp::LogicalOr,
            TokenKind::AmpAmp => BinaryOp::LogicalAnd,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Pipe => BinaryOp::Or,
            TokenKind::Caret => BinaryOp::Xor,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            TokenKind::Shl => BinaryOp::Shl,
            TokenKind::Shr => BinaryOp::Shr,
            TokenKind::Amp => BinaryOp::And,
            TokenKind::AmpCaret => BinaryOp::AndNot,
            _ => return None,
        })
    }

    /// Precedence climbing over left-associative binary operators.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.current_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.cursor.advance();
            let right = self.parse_binary(prec + 1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    x: Box::new(left),
                    y: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| {
            let start = self.cursor.current_span();
            let op = match self.cursor.current_kind() {
                TokenKind::Plus => UnaryOp::Pos,
                TokenKind::Minus => UnaryOp::Neg,
                TokenKind::Bang => UnaryOp::Not,
                TokenKind::Caret => UnaryOp::BitNot,
                TokenKind::Amp => UnaryOp::Addr,
                TokenKind::Star => {
                    self.cursor.advance();
                    let x = self.parse_unary()?;
                    let span = start.merge(x.span);
                    return Ok(Expr::new(ExprKind::Star(Box::new(x)), span));
                }
                TokenKind::Arrow if !matches!(self.cursor.peek_kind(1), TokenKind::Chan) => {
                    return Err(ParseError::new(ParseErrorKind::Receive, start));
                }
                _ => return self.parse_primary(),
            };
            self.cursor.advance();
            let x = self.parse_unary()?;
            let span = start.merge(x.span);
            Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    x: Box::new(x),
                },
                span,
            ))
        })
    }

    /// Operand followed by any number of selectors, indexes, slices,
    /// type assertions, calls and composite literal bodies.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_operand()?;
        loop {
            expr = match self.cursor.current_kind() {
                TokenKind::Dot => self.parse_selector_or_assert(expr)?,
                TokenKind::LBracket => self.parse_index_or_slice(expr)?,
                TokenKind::LParen => self.parse_call(expr)?,
                TokenKind::LBrace if is_literal_type(&expr) => self.parse_composite(expr)?,
                _ => return Ok(expr),
            };
        }
    }

    fn parse_operand(&mut self) -> Result<Expr, ParseError> {
        let span = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Ident(name) => ExprKind::Ident(name.clone()),
            TokenKind::Int(text) => ExprKind::Lit(Literal::Int(text.clone())),
            TokenKind::Float(text) => ExprKind::Lit(Literal::Float(text.clone())),
            TokenKind::Imag(text) => ExprKind::Lit(Literal::Imag(text.clone())),
            TokenKind::Char(c) => ExprKind::Lit(Literal::Char(*c)),
            TokenKind::String(bytes) => ExprKind::Lit(Literal::String(bytes.clone())),
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                let end = self.cursor.expect(&TokenKind::RParen)?;
                return Ok(Expr::new(ExprKind::Paren(Box::new(inner)), span.merge(end)));
            }
            TokenKind::Func => {
                let ty = self.parse_type()?;
                if self.cursor.check(&TokenKind::LBrace) {
                    return Err(ParseError::new(ParseErrorKind::FuncLit, ty.span));
                }
                return Ok(ty);
            }
            TokenKind::LBracket
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Arrow
            | TokenKind::Struct
            | TokenKind::Interface => return self.parse_type(),
            found => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedOperand {
                        found: found.describe(),
                    },
                    span,
                ))
            }
        };
        self.cursor.advance();
        Ok(Expr::new(kind, span))
    }

    fn parse_selector_or_assert(&mut self, x: Expr) -> Result<Expr, ParseError> {
        self.cursor.advance();
        if self.cursor.eat(&TokenKind::LParen) {
            let ty = self.parse_type()?;
            let end = self.cursor.expect(&TokenKind::RParen)?;
            let span = x.span.merge(end);
            return Ok(Expr::new(
                ExprKind::TypeAssert {
                    x: Box::new(x),
                    ty: Box::new(ty),
                },
                span,
            ));
        }
        let sel = self.cursor.expect_ident()?;
        let span = x.span.merge(sel.span);
        Ok(Expr::new(
            ExprKind::Selector {
                x: Box::new(x),
                sel,
            },
            span,
        ))
    }

    fn parse_index_or_slice(&mut self, x: Expr) -> Result<Expr, ParseError> {
        self.cursor.advance();
        let low = if self.cursor.check(&TokenKind::Colon) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        if self.cursor.check(&TokenKind::RBracket) {
            if let Some(index) = low {
                let end = self.cursor.advance().span;
                let span = x.span.merge(end);
                return Ok(Expr::new(
                    ExprKind::Index {
                        x: Box::new(x),
                        index,
                    },
                    span,
                ));
            }
        }
        self.cursor.expect(&TokenKind::Colon)?;
        let high = self.parse_optional_bound()?;
        let mut max = None;
        let slice3 = self.cursor.eat(&TokenKind::Colon);
        if slice3 {
            max = self.parse_optional_bound()?;
        }
        let end = self.cursor.expect(&TokenKind::RBracket)?;
        let span = x.span.merge(end);
        Ok(Expr::new(
            ExprKind::Slice {
                x: Box::new(x),
                low,
                high,
                max,
                slice3,
            },
            span,
        ))
    }

    fn parse_optional_bound(&mut self) -> Result<Option<Box<Expr>>, ParseError> {
        if matches!(
            self.cursor.current_kind(),
            TokenKind::Colon | TokenKind::RBracket
        ) {
            Ok(None)
        } else {
            Ok(Some(Box::new(self.parse_expr()?)))
        }
    }

    fn parse_call(&mut self, fun: Expr) -> Result<Expr, ParseError> {
        self.cursor.advance();
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.cursor.check(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            if self.cursor.eat(&TokenKind::Ellipsis) {
                ellipsis = true;
                self.cursor.eat(&TokenKind::Comma);
                break;
            }
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RParen)?;
        let span = fun.span.merge(end);
        Ok(Expr::new(
            ExprKind::Call {
                fun: Box::new(fun),
                args,
                ellipsis,
            },
            span,
        ))
    }

    fn parse_composite(&mut self, ty: Expr) -> Result<Expr, ParseError> {
        self.cursor.advance();
        let mut elts = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            elts.push(self.parse_element()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        let span = ty.span.merge(end);
        Ok(Expr::new(
            ExprKind::CompositeLit {
                ty: Box::new(ty),
                elts,
            },
            span,
        ))
    }

    fn parse_element(&mut self) -> Result<Expr, ParseError> {
        let key = self.parse_element_value()?;
        if !self.cursor.eat(&TokenKind::Colon) {
            return Ok(key);
        }
        let value = self.parse_element_value()?;
        let span = key.span.merge(value.span);
        Ok(Expr::new(
            ExprKind::KeyValue {
                key: Box::new(key),
                value: Box::new(value),
            },
            span,
        ))
    }

    fn parse_element_value(&mut self) -> Result<Expr, ParseError> {
        if self.cursor.check(&TokenKind::LBrace) {
            return Err(ParseError::new(
                ParseErrorKind::MissingCompositeType,
                self.cursor.current_span(),
            ));
        }
        self.parse_expr()
    }
}

/// Operands that may be followed by a composite literal body.
fn is_literal_type(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Ident(_)
        | ExprKind::ArrayType { .. }
        | ExprKind::MapType { .. }
        | ExprKind::StructType(_) => true,
        ExprKind::Selector { x, .. } => matches!(x.kind, ExprKind::Ident(_)),
        _ => false,
    }
}
