//! Tree-walking interpreter.
//!
//! # Architecture
//!
//! `Interpreter::eval` dispatches on the node kind and hands the evaluated
//! operands to the leaf engines:
//!
//! - `operators` / `unary_operators` for operator nodes
//! - `call` for function calls and selectors
//! - `builtins` for calls of built-in functions
//! - `index` for index and slice expressions
//! - `composite` (here) for composite literals
//! - `types` (here) for type expressions
//!
//! Leaf engines return [`IntError`](crate::errors::IntError); the
//! interpreter attaches the span of the node it was evaluating.

mod composite;
mod types;

use gexpr_ir::{ensure_sufficient_stack, Expr, ExprKind, Span};
use gexpr_rt::{Constant, Type};

use crate::builtins::{call_builtin, Builtin};
use crate::call::{call_function, select};
use crate::convert::{assert_type, convert};
use crate::data::Data;
use crate::environment::Identifiers;
use crate::errors::{
    argument_count, invalid_ellipsis, not_callable, not_expr, not_type, undefined, unsupported,
    IntError, PosError,
};
use crate::index::{evaluate_index, evaluate_slice};
use crate::operators::evaluate_binary;
use crate::unary_operators::{evaluate_star, evaluate_unary};
use crate::value::Value;

/// Result of evaluating one node.
pub(crate) type EvalResult<T> = Result<T, PosError>;

/// Evaluates one parsed expression against a prepared environment.
pub(crate) struct Interpreter<'a> {
    env: &'a Identifiers,
    source: &'a str,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(env: &'a Identifiers, source: &'a str) -> Self {
        Interpreter { env, source }
    }

    pub(crate) fn eval(&self, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_inner(expr))
    }

    /// Evaluate a node that must denote a value.
    fn eval_data(&self, expr: &Expr) -> EvalResult<Data> {
        match self.eval(expr)? {
            Value::Data(data) => Ok(data),
            other => Err(not_expr(&other).at(expr.span)),
        }
    }

    /// Evaluate a node that must denote a type.
    fn eval_type(&self, expr: &Expr) -> EvalResult<Type> {
        match self.eval(expr)? {
            Value::Type(ty) => Ok(ty),
            other => Err(not_type(&other).at(expr.span)),
        }
    }

    fn eval_optional(&self, expr: Option<&Expr>) -> EvalResult<Option<Data>> {
        expr.map(|e| self.eval_data(e)).transpose()
    }

    /// Source text of a node, for messages.
    fn text(&self, expr: &Expr) -> &'a str {
        self.source.get(expr.span.to_range()).unwrap_or("<expression>")
    }

    fn eval_inner(&self, expr: &Expr) -> EvalResult<Value> {
        let span = expr.span;
        let at = |e: IntError| e.at(span);
        match &expr.kind {
            ExprKind::Ident(name) => self.eval_ident(name).map_err(at),
            ExprKind::Lit(lit) => Constant::from_literal(lit)
                .map(Value::untyped_const)
                .map_err(|e| at(e.into())),
            ExprKind::Paren(inner) => self.eval(inner),
            ExprKind::Star(x) => evaluate_star(self.eval(x)?).map_err(at),
            ExprKind::Unary { op, x } => {
                let x = self.eval_data(x)?;
                evaluate_unary(*op, x).map(Value::Data).map_err(at)
            }
            ExprKind::Binary { op, x, y } => {
                let x = self.eval_data(x)?;
                let y = self.eval_data(y)?;
                evaluate_binary(x, *op, y).map(Value::Data).map_err(at)
            }
            ExprKind::Selector { x, sel } => {
                let receiver = self.eval(x)?;
                select(&receiver, &sel.name, self.text(x)).map_err(at)
            }
            ExprKind::Index { x, index } => {
                let x = self.eval_data(x)?;
                let index = self.eval_data(index)?;
                evaluate_index(&x, &index).map(Value::Data).map_err(at)
            }
            ExprKind::Slice {
                x,
                low,
                high,
                max,
                slice3,
            } => {
                let x = self.eval_data(x)?;
                let low = self.eval_optional(low.as_deref())?;
                let high = self.eval_optional(high.as_deref())?;
                let max = self.eval_optional(max.as_deref())?;
                evaluate_slice(&x, low.as_ref(), high.as_ref(), max.as_ref(), *slice3)
                    .map(Value::Data)
                    .map_err(at)
            }
            ExprKind::TypeAssert { x, ty } => {
                let x = self.eval_data(x)?;
                let ty = self.eval_type(ty)?;
                assert_type(&x, &ty).map(Value::regular).map_err(at)
            }
            ExprKind::Call {
                fun,
                args,
                ellipsis,
            } => self.eval_call(fun, args, *ellipsis, span),
            ExprKind::CompositeLit { ty, elts } => {
                self.eval_composite(ty, elts, span).map(Value::regular)
            }
            ExprKind::KeyValue { .. } => {
                Err(at(unsupported("key: value outside a composite literal")))
            }
            ExprKind::ArrayType { .. }
            | ExprKind::MapType { .. }
            | ExprKind::ChanType { .. }
            | ExprKind::FuncType(_)
            | ExprKind::StructType(_)
            | ExprKind::InterfaceType(_) => self.eval_type_expr(expr).map(Value::Type),
        }
    }

    /// Names resolve to constants, then built-ins, then predeclared
    /// types, then the environment.
    fn eval_ident(&self, name: &str) -> Result<Value, IntError> {
        match name {
            "true" => return Ok(Value::untyped_const(Constant::Bool(true))),
            "false" => return Ok(Value::untyped_const(Constant::Bool(false))),
            "nil" => return Ok(Value::nil()),
            _ => {}
        }
        if let Some(builtin) = Builtin::from_name(name) {
            return Ok(Value::Builtin(builtin));
        }
        if let Some(ty) = Type::lookup_predeclared(name) {
            return Ok(Value::Type(ty));
        }
        self.env.get(name).cloned().ok_or_else(|| undefined(name))
    }

    fn eval_call(&self, fun: &Expr, args: &[Expr], ellipsis: bool, span: Span) -> EvalResult<Value> {
        let at = |e: IntError| e.at(span);
        match self.eval(fun)? {
            Value::Builtin(builtin) => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                call_builtin(builtin, args, ellipsis)
                    .map(Value::Data)
                    .map_err(at)
            }
            Value::Type(ty) => {
                if ellipsis {
                    return Err(at(invalid_ellipsis(&ty)));
                }
                let [arg] = args else {
                    return Err(at(argument_count(&ty, &1, args.len())));
                };
                let x = self.eval_data(arg)?;
                convert(&x, &ty).map(Value::Data).map_err(at)
            }
            Value::Data(Data::Regular(f)) => {
                let args = args
                    .iter()
                    .map(|arg| self.eval_data(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                call_function(&f, &args, ellipsis, self.text(fun))
                    .map(Value::Data)
                    .map_err(at)
            }
            other => Err(not_callable(&other).at(fun.span)),
        }
    }
}
