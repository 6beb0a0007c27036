//! End-to-end tests driving the evaluator from source text.

mod expression_tests;
mod index_tests;
mod operators_tests;
mod proptests;

use gexpr_rt::NativeValue;

use crate::{eval_to_data, eval_to_native, Data, ErrorKind, Identifiers};

/// Evaluate `src`, which must succeed, to data.
fn data(src: &str, env: &Identifiers) -> Data {
    eval_to_data(src, env).unwrap()
}

/// Evaluate `src`, which must succeed, to host data.
fn native(src: &str, env: &Identifiers) -> NativeValue {
    eval_to_native(src, env).unwrap()
}

/// Evaluate `src`, which must fail, and return the failure.
fn error(src: &str, env: &Identifiers) -> ErrorKind {
    match eval_to_data(src, env) {
        Ok(data) => panic!("{src} evaluated to {data}, expected an error"),
        Err(err) => err.kind,
    }
}

fn ints(values: &[i64]) -> NativeValue {
    NativeValue::List(values.iter().map(|&v| NativeValue::Int(v)).collect())
}
