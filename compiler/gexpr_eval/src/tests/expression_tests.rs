//! Tests for the public entry points: parsing, error positions, result
//! projection and panic containment.

use std::sync::Once;

use gexpr_rt::{NativeFn, NativeValue, RtValue, Signature, Type};
use pretty_assertions::assert_eq;

use crate::{
    eval_raw, eval_to_data, eval_to_native, eval_to_regular, Builtin, ErrorKind, Expression,
    Identifiers, Value,
};

static TRACING_INIT: Once = Once::new();

/// Route evaluator logs to the test output. Enable with
/// `RUST_LOG=gexpr_eval=debug`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_test_writer())
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

#[test]
fn syntax_errors_have_positions() {
    init_tracing();
    let err = Expression::parse("1 +").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Syntax(_)));
    let position = err.position().unwrap();
    assert_eq!(&*position.file, "expression");
    assert_eq!(position.line, 1);
}

#[test]
fn evaluation_errors_have_positions() {
    init_tracing();
    let err = eval_to_data("a", &Identifiers::new()).unwrap_err();
    assert_eq!(err.to_string(), "expression:1:1: undefined: a");

    let err = eval_to_data("1 + b", &Identifiers::new()).unwrap_err();
    let position = err.position().unwrap();
    assert_eq!((position.line, position.col), (1, 5));
    assert_eq!(err.message(), "undefined: b");
}

#[test]
fn named_source_file() {
    let expr = Expression::parse_named("config.go", "missing").unwrap();
    let err = expr.eval_to_data(&Identifiers::new()).unwrap_err();
    assert_eq!(err.to_string(), "config.go:1:1: undefined: missing");
}

#[test]
fn environment_errors_have_no_position() {
    let env = Identifiers::new().with("a.a", RtValue::int(1));
    let err = eval_to_data("1", &env).unwrap_err();
    assert_eq!(err.position(), None);
    assert_eq!(err.to_string(), "-: invalid identifier a.a");
}

#[test]
fn regular_projection_of_constants() {
    let env = Identifiers::new();
    let value = eval_to_regular("1 << 10", &env).unwrap();
    assert_eq!(value.ty(), &Type::int());
    assert_eq!(value.as_i64(), 1024);
    assert_eq!(eval_to_regular("2.5", &env).unwrap().ty(), &Type::float64());
    assert_eq!(eval_to_regular("'a'", &env).unwrap().ty(), &Type::rune());
    assert_eq!(eval_to_regular("1 < 2", &env).unwrap().ty(), &Type::bool());
    assert_eq!(eval_to_native("int8(-3)", &env), Ok(NativeValue::Int(-3)));
}

#[test]
fn regular_projection_failures() {
    let env = Identifiers::new();
    assert!(matches!(
        eval_to_regular("1 << 100", &env).unwrap_err().kind(),
        ErrorKind::ConstOverflow { .. }
    ));
    assert_eq!(
        eval_to_regular("nil", &env).unwrap_err().kind(),
        &ErrorKind::UntypedNil
    );
}

#[test]
fn raw_results_of_every_category() {
    let env = Identifiers::new().with("pkg.X", RtValue::int(1));
    assert!(matches!(eval_raw("int", &env), Ok(Value::Type(ty)) if ty == Type::int()));
    assert!(matches!(eval_raw("len", &env), Ok(Value::Builtin(Builtin::Len))));
    assert!(matches!(eval_raw("pkg", &env), Ok(Value::Namespace(_))));
    assert!(matches!(
        eval_to_data("int", &env).unwrap_err().kind(),
        ErrorKind::NotExpr { .. }
    ));
    assert!(matches!(
        eval_to_data("pkg", &env).unwrap_err().kind(),
        ErrorKind::NotExpr { .. }
    ));
}

#[test]
fn host_panics_are_contained() {
    let explode = RtValue::func(
        &Type::func_of(Signature::new(Vec::new(), vec![Type::int()], false)),
        NativeFn::new(|_| panic!("host exploded")),
    );
    let env = Identifiers::new().with("explode", explode);
    let err = eval_to_data("explode()", &env).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Internal("host exploded".to_string()));
    assert_eq!(err.position(), None);
}

#[test]
fn parsed_expression_is_reusable() {
    let expr = Expression::parse("x * 2").unwrap();
    assert_eq!(expr.source(), "x * 2");
    let first = Identifiers::new().with("x", RtValue::int(3));
    let second = Identifiers::new().with("x", RtValue::float_of(&Type::float64(), 1.25));
    assert_eq!(expr.eval_to_native(&first), Ok(NativeValue::Int(6)));
    assert_eq!(expr.eval_to_native(&second), Ok(NativeValue::Float(2.5)));
    assert!(expr.eval_to_native(&Identifiers::new()).is_err());
}

#[test]
fn type_only_environment() {
    let celsius = Type::named("Celsius", &Type::float64());
    let env = Identifiers::from_types([
        ("Celsius", celsius.clone()),
        ("units.Count", Type::named("Count", &Type::int())),
    ]);
    let value = eval_to_regular("Celsius(36.5)", &env).unwrap();
    assert_eq!(value.ty(), &celsius);
    assert_eq!(eval_to_native("units.Count(3) * 2", &env), Ok(NativeValue::Int(6)));
    assert!(matches!(
        eval_to_data("Celsius", &env).unwrap_err().kind(),
        ErrorKind::NotExpr { .. }
    ));
}

#[test]
fn bindings_are_not_mutated_by_evaluation() {
    let env = Identifiers::new().with("x", RtValue::int(3));
    assert_eq!(eval_to_native("*&x", &env), Ok(NativeValue::Int(3)));
    let Some(Value::Data(data)) = env.get("x") else {
        panic!("x is bound to data");
    };
    assert!(!data.regular().can_addr());
}
