//! Type expression parsing.

use gexpr_ir::{
    ensure_sufficient_stack, ArrayLen, ChanDirSyntax, Expr, ExprKind, FieldDecl, FuncTypeExpr,
    Ident, MethodSpec, Param, Span, TokenKind,
};

use crate::{ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    /// Parse a type expression.
    pub(crate) fn parse_type(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| {
            let start = self.cursor.current_span();
            match self.cursor.current_kind() {
                TokenKind::Ident(_) => self.parse_type_name(),
                TokenKind::Star => {
                    self.cursor.advance();
                    let elem = self.parse_type()?;
                    let span = start.merge(elem.span);
                    Ok(Expr::new(ExprKind::Star(Box::new(elem)), span))
                }
                TokenKind::LParen => {
                    self.cursor.advance();
                    let inner = self.parse_type()?;
                    let end = self.cursor.expect(&TokenKind::RParen)?;
                    Ok(Expr::new(ExprKind::Paren(Box::new(inner)), start.merge(end)))
                }
                TokenKind::LBracket => self.parse_array_type(start),
                TokenKind::Map => {
                    self.cursor.advance();
                    self.cursor.expect(&TokenKind::LBracket)?;
                    let key = self.parse_type()?;
                    self.cursor.expect(&TokenKind::RBracket)?;
                    let value = self.parse_type()?;
                    let span = start.merge(value.span);
                    Ok(Expr::new(
                        ExprKind::MapType {
                            key: Box::new(key),
                            value: Box::new(value),
                        },
                        span,
                    ))
                }
                TokenKind::Chan => {
                    self.cursor.advance();
                    let dir = if self.cursor.eat(&TokenKind::Arrow) {
                        ChanDirSyntax::Send
                    } else {
                        ChanDirSyntax::Both
                    };
                    self.finish_chan_type(start, dir)
                }
                TokenKind::Arrow => {
                    self.cursor.advance();
                    self.cursor.expect(&TokenKind::Chan)?;
                    self.finish_chan_type(start, ChanDirSyntax::Recv)
                }
                TokenKind::Func => {
                    self.cursor.advance();
                    let sig = self.parse_signature()?;
                    let span = start.merge(self.cursor.previous_span());
                    Ok(Expr::new(ExprKind::FuncType(sig), span))
                }
                TokenKind::Struct => self.parse_struct_type(start),
                TokenKind::Interface => self.parse_interface_type(start),
                found => Err(ParseError::new(
                    ParseErrorKind::ExpectedType {
                        found: found.describe(),
                    },
                    start,
                )),
            }
        })
    }

    /// `T` or `pkg.T`.
    fn parse_type_name(&mut self) -> Result<Expr, ParseError> {
        let name = self.cursor.expect_ident()?;
        let base = Expr::new(ExprKind::Ident(name.name), name.span);
        if !self.cursor.check(&TokenKind::Dot)
            || !matches!(self.cursor.peek_kind(1), TokenKind::Ident(_))
        {
            return Ok(base);
        }
        self.cursor.advance();
        let sel = self.cursor.expect_ident()?;
        let span = base.span.merge(sel.span);
        Ok(Expr::new(
            ExprKind::Selector {
                x: Box::new(base),
                sel,
            },
            span,
        ))
    }

    fn parse_array_type(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.cursor.advance();
        let len = if self.cursor.eat(&TokenKind::RBracket) {
            ArrayLen::Slice
        } else if self.cursor.eat(&TokenKind::Ellipsis) {
            self.cursor.expect(&TokenKind::RBracket)?;
            ArrayLen::Ellipsis
        } else {
            let len = self.parse_expr()?;
            self.cursor.expect(&TokenKind::RBracket)?;
            ArrayLen::Fixed(Box::new(len))
        };
        let elem = self.parse_type()?;
        let span = start.merge(elem.span);
        Ok(Expr::new(
            ExprKind::ArrayType {
                len,
                elem: Box::new(elem),
            },
            span,
        ))
    }

    fn finish_chan_type(&mut self, start: Span, dir: ChanDirSyntax) -> Result<Expr, ParseError> {
        let elem = self.parse_type()?;
        let span = start.merge(elem.span);
        Ok(Expr::new(
            ExprKind::ChanType {
                dir,
                elem: Box::new(elem),
            },
            span,
        ))
    }

    fn starts_type(&self) -> bool {
        matches!(
            self.cursor.current_kind(),
            TokenKind::Ident(_)
                | TokenKind::Star
                | TokenKind::LBracket
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Arrow
                | TokenKind::Func
                | TokenKind::Struct
                | TokenKind::Interface
        )
    }

    /// Parameters and optional results following `func` or a method name.
    fn parse_signature(&mut self) -> Result<FuncTypeExpr, ParseError> {
        let params = self.parse_params()?;
        let results = if self.cursor.check(&TokenKind::LParen) {
            self.parse_params()?
        } else if self.starts_type() {
            vec![Param {
                name: None,
                ty: self.parse_type()?,
                variadic: false,
            }]
        } else {
            Vec::new()
        };
        Ok(FuncTypeExpr { params, results })
    }

    /// `(a, b int, c ...string)` or `(int, ...string)`.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.cursor.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            params.push(self.parse_param()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        group_param_names(params)
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let named = matches!(self.cursor.current_kind(), TokenKind::Ident(_))
            && !matches!(
                self.cursor.peek_kind(1),
                TokenKind::Comma | TokenKind::RParen | TokenKind::Dot
            );
        let name = if named {
            Some(self.cursor.expect_ident()?)
        } else {
            None
        };
        let variadic = self.cursor.eat(&TokenKind::Ellipsis);
        let ty = self.parse_type()?;
        Ok(Param { name, ty, variadic })
    }

    fn parse_struct_type(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.cursor.advance();
        self.cursor.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            fields.push(self.parse_field_decl()?);
            self.cursor.eat(&TokenKind::Semicolon);
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(ExprKind::StructType(fields), start.merge(end)))
    }

    fn parse_field_decl(&mut self) -> Result<FieldDecl, ParseError> {
        let start = self.cursor.current_span();
        let embedded = match self.cursor.current_kind() {
            TokenKind::Star => true,
            TokenKind::Ident(_) => matches!(
                self.cursor.peek_kind(1),
                TokenKind::Dot | TokenKind::Semicolon | TokenKind::RBrace | TokenKind::String(_)
            ),
            _ => return Err(self.cursor.unexpected("field name or embedded type")),
        };
        let mut names = Vec::new();
        let ty = if embedded {
            if self.cursor.eat(&TokenKind::Star) {
                let elem = self.parse_type_name()?;
                let span = start.merge(elem.span);
                Expr::new(ExprKind::Star(Box::new(elem)), span)
            } else {
                self.parse_type_name()?
            }
        } else {
            names.push(self.cursor.expect_ident()?);
            while self.cursor.eat(&TokenKind::Comma) {
                names.push(self.cursor.expect_ident()?);
            }
            self.parse_type()?
        };
        let tag = match self.cursor.current_kind() {
            TokenKind::String(bytes) => {
                self.cursor.advance();
                Some(bytes.clone())
            }
            _ => None,
        };
        Ok(FieldDecl {
            names,
            ty,
            tag,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    fn parse_interface_type(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.cursor.advance();
        self.cursor.expect(&TokenKind::LBrace)?;
        let mut methods = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            let name = self.cursor.expect_ident()?;
            if !self.cursor.check(&TokenKind::LParen) {
                return Err(ParseError::new(ParseErrorKind::EmbeddedInterface, name.span));
            }
            let sig = self.parse_signature()?;
            methods.push(MethodSpec { name, sig });
            self.cursor.eat(&TokenKind::Semicolon);
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(ExprKind::InterfaceType(methods), start.merge(end)))
    }
}

/// Resolve `(a, b int)`: leading bare identifiers take the type of the next
/// named parameter. Either every parameter is named or none is.
fn group_param_names(params: Vec<Param>) -> Result<Vec<Param>, ParseError> {
    if params.iter().all(|p| p.name.is_none()) {
        return Ok(params);
    }
    let mut grouped = Vec::with_capacity(params.len());
    let mut pending: Vec<Ident> = Vec::new();
    for param in params {
        match param.name {
            Some(_) => {
                for name in pending.drain(..) {
                    grouped.push(Param {
                        name: Some(name),
                        ty: param.ty.clone(),
                        variadic: param.variadic,
                    });
                }
                grouped.push(param);
            }
            None => match (&param.ty.kind, param.variadic) {
                (ExprKind::Ident(name), false) => pending.push(Ident {
                    name: name.clone(),
                    span: param.ty.span,
                }),
                _ => return Err(ParseError::new(ParseErrorKind::MixedParams, param.ty.span)),
            },
        }
    }
    if let Some(dangling) = pending.first() {
        return Err(ParseError::new(ParseErrorKind::MixedParams, dangling.span));
    }
    Ok(grouped)
}
