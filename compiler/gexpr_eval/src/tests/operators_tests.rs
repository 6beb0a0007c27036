//! Tests for binary and unary operator evaluation.

use gexpr_rt::{ConstError, Constant, Kind, NativeValue, RtValue, Type};
use pretty_assertions::assert_eq;

use super::{data, error, native};
use crate::{ErrorKind, Identifiers};

fn env() -> Identifiers {
    Identifiers::new()
        .with("x", RtValue::int(2))
        .with("y", RtValue::int_of(&Type::int8(), 3))
        .with("u", RtValue::uint_of(&Type::uint8(), 0x81))
        .with("n", RtValue::uint_of(&Type::uint(), 3))
        .with("f", RtValue::float_of(&Type::float64(), 0.5))
        .with("b", RtValue::from(true))
        .with("s", RtValue::from("go"))
        .with("nilSlice", RtValue::zero(&Type::slice_of(Type::int())))
}

// Untyped constants

#[test]
fn untyped_arithmetic_stays_untyped() {
    let env = env();
    assert_eq!(data("1 + 2", &env).untyped_const(), &Constant::int(3));
    assert_eq!(data("7 / 2", &env).untyped_const(), &Constant::int(3));
    assert_eq!(data("1 << 70 >> 68", &env).untyped_const(), &Constant::int(4));
    assert_eq!(
        data(r#""a" + "b""#, &env).untyped_const(),
        &Constant::string(b"ab")
    );
}

#[test]
fn untyped_division_by_zero_fails() {
    assert_eq!(
        error("1 / 0", &env()),
        ErrorKind::Constant(ConstError::DivisionByZero)
    );
}

#[test]
fn comparison_of_constants_is_untyped_bool() {
    let env = env();
    assert!(data("1 < 2", &env).untyped_bool());
    assert!(!data("!(1 < 2)", &env).untyped_bool());
    assert!(data(r#""a" != "b""#, &env).untyped_bool());
    assert!(data("int8(3) > 2", &env).untyped_bool());
}

// Typed constants

#[test]
fn conversion_of_constant_expression_is_typed_constant() {
    let result = data("int8(1*(1+2))", &Identifiers::new());
    let typed = result.typed_const();
    assert_eq!(typed.ty(), &Type::int8());
    assert_eq!(typed.value(), &Constant::int(3));
}

#[test]
fn typed_constant_arithmetic_wraps() {
    let env = env();
    let sum = data("int8(127) + 1", &env);
    assert_eq!(sum.typed_const().value(), &Constant::int(-128));
    let neg = data("-int8(-128)", &env);
    assert_eq!(neg.typed_const().value(), &Constant::int(-128));
    let not = data("^uint8(0)", &env);
    assert_eq!(not.typed_const().value(), &Constant::int(255));
}

#[test]
fn typed_constant_division_by_zero_fails() {
    assert_eq!(error("int8(1) / 0", &env()), ErrorKind::DivisionByZero);
}

#[test]
fn untyped_operand_must_fit_typed_constant() {
    assert!(matches!(
        error("int8(1) + 300", &env()),
        ErrorKind::ConstOverflow { .. }
    ));
}

// Regular values

#[test]
fn untyped_operand_takes_regular_type() {
    let env = env();
    let sum = data("x + 40", &env);
    assert_eq!(sum.regular().ty(), &Type::int());
    assert_eq!(sum.regular().as_i64(), 42);
    assert_eq!(native("f * 3", &env), NativeValue::Float(1.5));
    assert_eq!(native(r#"s + "pher""#, &env), NativeValue::String("gopher".to_string()));
}

#[test]
fn untyped_operand_not_representable_in_regular_type() {
    assert!(matches!(
        error("x + 1.5", &env()),
        ErrorKind::ConstOverflow { .. }
    ));
}

#[test]
fn mismatched_regular_types_fail() {
    assert!(matches!(
        error("x + y", &env()),
        ErrorKind::MismatchedTypes { .. }
    ));
}

#[test]
fn regular_integer_division_by_zero_fails() {
    assert_eq!(error("x / 0", &env()), ErrorKind::DivisionByZero);
    assert_eq!(error("x % 0", &env()), ErrorKind::DivisionByZero);
}

#[test]
fn regular_integers_wrap() {
    let env = env();
    let y = data("y * 100", &env);
    assert_eq!(y.regular().kind(), Kind::Int8);
    assert_eq!(y.regular().as_i64(), 44);
    assert_eq!(native("u + 200", &env), NativeValue::Uint(73));
    assert_eq!(native("x &^ 3", &env), NativeValue::Int(0));
}

#[test]
fn logical_operators_on_regular_bool() {
    let env = env();
    assert_eq!(native("true && b", &env), NativeValue::Bool(true));
    assert_eq!(native("b && x > 5", &env), NativeValue::Bool(false));
}

#[test]
fn operator_not_defined_for_kind() {
    assert!(matches!(
        error("s - s", &env()),
        ErrorKind::OperatorNotDefined { .. }
    ));
    assert!(matches!(
        error("nil + 1", &env()),
        ErrorKind::OperatorNotDefined { .. }
    ));
}

// Comparisons

#[test]
fn regular_comparisons() {
    let env = env();
    assert!(data("x < 3", &env).untyped_bool());
    assert!(data("f < 1", &env).untyped_bool());
    assert!(data(r#"s == "go""#, &env).untyped_bool());
    assert!(!data("y >= 4", &env).untyped_bool());
}

#[test]
fn nil_comparisons() {
    let env = env();
    assert!(data("nilSlice == nil", &env).untyped_bool());
    assert!(!data("nil != nilSlice", &env).untyped_bool());
    assert!(matches!(
        error("x == nil", &env),
        ErrorKind::InvalidNilComparison { .. }
    ));
    assert!(matches!(
        error("nil == nil", &env),
        ErrorKind::OperatorNotDefined { .. }
    ));
}

#[test]
fn slices_are_not_comparable() {
    assert!(matches!(
        error("nilSlice == nilSlice", &env()),
        ErrorKind::OperatorNotDefined { .. }
    ));
}

// Shifts

#[test]
fn shifts_of_regular_values() {
    let env = env();
    assert_eq!(native("u << 2", &env), NativeValue::Uint(4));
    assert_eq!(native("x << n", &env), NativeValue::Int(16));
    assert_eq!(native("x >> 70", &env), NativeValue::Int(0));
}

#[test]
fn untyped_constant_shifted_by_regular_count_is_int() {
    let shifted = data("1 << n", &env());
    assert_eq!(shifted.regular().ty(), &Type::int());
    assert_eq!(shifted.regular().as_i64(), 8);
}

#[test]
fn typed_constant_shift_stays_constant() {
    let shifted = data("uint8(1) << 7", &env());
    assert_eq!(shifted.typed_const().value(), &Constant::int(128));
}

#[test]
fn invalid_shifts() {
    let env = env();
    assert!(matches!(error("x << -1", &env), ErrorKind::ShiftCount { .. }));
    assert!(matches!(error("x << x", &env), ErrorKind::ShiftCount { .. }));
    assert!(matches!(error("f << 1", &env), ErrorKind::ShiftOperand { .. }));
    assert!(matches!(
        error("1.5 << 2", &env),
        ErrorKind::Constant(ConstError::NonIntegerShift(_))
    ));
}

// Unary operators

#[test]
fn unary_operators() {
    let env = env();
    assert_eq!(data("-5", &env).untyped_const(), &Constant::int(-5));
    assert_eq!(native("-x", &env), NativeValue::Int(-2));
    assert_eq!(native("!b", &env), NativeValue::Bool(false));
    assert_eq!(native("^u", &env), NativeValue::Uint(0x7e));
    assert!(matches!(error("!x", &env), ErrorKind::OperatorNotDefined { .. }));
    assert!(matches!(error("-nil", &env), ErrorKind::OperatorNotDefined { .. }));
}

#[test]
fn address_and_indirection() {
    let env = env();
    assert_eq!(native("*&x", &env), NativeValue::Int(2));
    let ptr = data("&x", &env);
    assert_eq!(ptr.regular().ty(), &Type::ptr_to(Type::int()));
    assert!(matches!(error("&1", &env), ErrorKind::CannotTakeAddress { .. }));
    assert!(matches!(error("*x", &env), ErrorKind::InvalidIndirect { .. }));
}
