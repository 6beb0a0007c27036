//! Gexpr Eval - evaluator for single Go-syntax expressions.
//!
//! Evaluates an expression against embedder-supplied identifiers, emulating
//! the static rules of the source language (untyped constants, typed
//! constant overflow, assignability, method sets) through the runtime type
//! descriptors of `gexpr_rt`.
//!
//! # Architecture
//!
//! - [`Expression`]: parse once, evaluate many times; converts internal
//!   errors into positioned [`Error`]s and catches contract violations
//! - [`Identifiers`]: name bindings, validated and normalized per evaluation
//! - [`Value`] / [`Data`]: what an expression denotes, and the five
//!   constness/typedness variants of an ordinary value
//! - `interpreter`: the tree walker, with type expressions and composite
//!   literals
//! - `operators`, `unary_operators`, `index`, `call`, `builtins`, `convert`:
//!   leaf engines working on already evaluated operands
//!
//! # Example
//!
//! ```
//! use gexpr_eval::{eval_to_native, Identifiers};
//! use gexpr_rt::{NativeValue, RtValue};
//!
//! let env = Identifiers::new().with("x", RtValue::int(40));
//! assert_eq!(eval_to_native("x + 2", &env), Ok(NativeValue::Int(42)));
//! ```

mod builtins;
mod call;
mod convert;
mod data;
mod environment;
pub mod errors;
mod expression;
mod index;
mod interpreter;
mod operators;
mod unary_operators;
mod value;

pub use builtins::Builtin;
pub use data::{Data, TypedConst};
pub use environment::Identifiers;
pub use errors::{Error, ErrorKind};
pub use expression::{eval_raw, eval_to_data, eval_to_native, eval_to_regular, Expression};
pub use value::{Namespace, Value};

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
