//! Public entry points: parse once, evaluate many times.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use gexpr_ir::{Expr, SourceMap, DEFAULT_FILE_NAME};
use gexpr_parse::parse_expr;
use gexpr_rt::{NativeValue, RtValue};
use tracing::debug;

use crate::data::Data;
use crate::environment::Identifiers;
use crate::errors::{const_overflow, not_expr, untyped_nil, Error, ErrorKind, PosError};
use crate::interpreter::Interpreter;
use crate::value::Value;

/// A parsed expression together with its source text.
#[derive(Clone, Debug)]
pub struct Expression {
    expr: Expr,
    source: String,
    map: SourceMap,
}

impl Expression {
    /// Parse `source`; positions are reported against the file name
    /// `"expression"`.
    pub fn parse(source: &str) -> Result<Self, Error> {
        Self::parse_named(DEFAULT_FILE_NAME, source)
    }

    /// Parse `source`, reporting positions against `file`.
    pub fn parse_named(file: &str, source: &str) -> Result<Self, Error> {
        let map = SourceMap::new(file, source);
        match parse_expr(source) {
            Ok(expr) => Ok(Expression {
                expr,
                source: source.to_string(),
                map,
            }),
            Err(err) => Err(PosError {
                kind: ErrorKind::Syntax(err.to_string()),
                span: Some(err.span),
            }
            .resolve(&map)),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate to whatever the expression denotes: a value, a type, a
    /// built-in function or a namespace.
    #[tracing::instrument(level = "trace", skip_all, fields(source = %self.source))]
    pub fn eval_raw(&self, env: &Identifiers) -> Result<Value, Error> {
        let result = catch_unwind(AssertUnwindSafe(|| {
            let scope = env.prepare().map_err(|e| e.no_pos())?;
            Interpreter::new(&scope, &self.source).eval(&self.expr)
        }))
        .unwrap_or_else(|payload| {
            Err(PosError {
                kind: ErrorKind::Internal(panic_message(payload.as_ref())),
                span: None,
            })
        });
        result.map_err(|err| {
            let err = err.resolve(&self.map);
            debug!(error = %err, "evaluation failed");
            err
        })
    }

    /// Evaluate an expression that must denote a value.
    pub fn eval_to_data(&self, env: &Identifiers) -> Result<Data, Error> {
        match self.eval_raw(env)? {
            Value::Data(data) => Ok(data),
            other => Err(self.error(not_expr(&other).at(self.expr.span))),
        }
    }

    /// Evaluate to a runtime value. Untyped constants take their default
    /// type; untyped `nil` has no runtime value.
    pub fn eval_to_regular(&self, env: &Identifiers) -> Result<RtValue, Error> {
        let span = self.expr.span;
        match self.eval_to_data(env)? {
            Data::Regular(v) => Ok(v),
            Data::TypedConst(c) => Ok(c.regular().clone()),
            Data::UntypedBool(b) => Ok(RtValue::from(b)),
            Data::UntypedConst(c) => {
                let ty = c.default_type();
                c.materialize(&ty)
                    .ok_or_else(|| self.error(const_overflow(&c, &ty).at(span)))
            }
            Data::Nil => Err(self.error(untyped_nil().at(span))),
        }
    }

    /// Evaluate to plain host data.
    pub fn eval_to_native(&self, env: &Identifiers) -> Result<NativeValue, Error> {
        self.eval_to_regular(env).map(|v| v.to_native())
    }

    fn error(&self, err: PosError) -> Error {
        let err = err.resolve(&self.map);
        debug!(error = %err, "evaluation failed");
        err
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Parse and evaluate `source` in one step. See [`Expression::eval_raw`].
pub fn eval_raw(source: &str, env: &Identifiers) -> Result<Value, Error> {
    Expression::parse(source)?.eval_raw(env)
}

/// See [`Expression::eval_to_data`].
pub fn eval_to_data(source: &str, env: &Identifiers) -> Result<Data, Error> {
    Expression::parse(source)?.eval_to_data(env)
}

/// See [`Expression::eval_to_regular`].
pub fn eval_to_regular(source: &str, env: &Identifiers) -> Result<RtValue, Error> {
    Expression::parse(source)?.eval_to_regular(env)
}

/// See [`Expression::eval_to_native`].
pub fn eval_to_native(source: &str, env: &Identifiers) -> Result<NativeValue, Error> {
    Expression::parse(source)?.eval_to_native(env)
}
