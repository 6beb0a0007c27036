//! Tests for index and slice expressions.

use gexpr_rt::{Constant, NativeValue, RtValue, Type};
use pretty_assertions::assert_eq;

use super::{data, error, ints, native};
use crate::{ErrorKind, Identifiers};

fn env() -> Identifiers {
    let ints = Type::slice_of(Type::int());
    let arr = RtValue::array_from(
        &Type::array_of(3, Type::int()),
        &[RtValue::int(7), RtValue::int(8), RtValue::int(9)],
    );
    let arr_ptr = arr.to_addressable().addr().unwrap();
    let m = RtValue::map_from(
        &Type::map_of(Type::string(), Type::int()),
        vec![(RtValue::from("a"), RtValue::int(1))],
    )
    .unwrap();
    Identifiers::new()
        .with(
            "x",
            RtValue::slice_from(
                &ints,
                &[RtValue::int(1), RtValue::int(2), RtValue::int(3)],
            ),
        )
        .with("arr", arr)
        .with("arrPtr", arr_ptr)
        .with("m", m)
        .with("s", RtValue::from("hello"))
        .with("i", RtValue::int(1))
}

#[test]
fn constant_string_index() {
    let env = env();
    assert_eq!(data(r#""abc"[1]"#, &env).untyped_const(), &Constant::int(98));
    let byte = data(r#""abc"[i]"#, &env);
    assert_eq!(byte.regular().ty(), &Type::uint8());
    assert_eq!(byte.regular().as_u64(), 98);
}

#[test]
fn regular_index() {
    let env = env();
    assert_eq!(native("s[i]", &env), NativeValue::Uint(u64::from(b'e')));
    assert_eq!(native("x[2]", &env), NativeValue::Int(3));
    assert_eq!(native("arr[0]", &env), NativeValue::Int(7));
    assert_eq!(native("arrPtr[2]", &env), NativeValue::Int(9));
}

#[test]
fn map_index() {
    let env = env();
    assert_eq!(native(r#"m["a"]"#, &env), NativeValue::Int(1));
    assert_eq!(native(r#"m["b"]"#, &env), NativeValue::Int(0));
    assert!(matches!(error("m[1]", &env), ErrorKind::CannotAssign { .. }));
}

#[test]
fn index_errors() {
    let env = env();
    assert_eq!(
        error("x[3]", &env),
        ErrorKind::IndexOutOfRange { index: 3, len: 3 }
    );
    assert_eq!(
        error(r#""abc"[5]"#, &env),
        ErrorKind::IndexOutOfRange { index: 5, len: 3 }
    );
    assert_eq!(error("x[-1]", &env), ErrorKind::NegativeIndex { index: -1 });
    assert!(matches!(
        error("x[1.5]", &env),
        ErrorKind::IndexNotInteger { .. }
    ));
    assert!(matches!(error("1[0]", &env), ErrorKind::CannotIndex { .. }));
}

#[test]
fn slicing_strings() {
    let env = env();
    assert_eq!(native(r#""hello"[1:3]"#, &env), NativeValue::String("el".to_string()));
    assert_eq!(native("s[:2]", &env), NativeValue::String("he".to_string()));
    assert_eq!(native("s[3:]", &env), NativeValue::String("lo".to_string()));
    assert_eq!(error(r#""abc"[0:1:2]"#, &env), ErrorKind::ThreeIndexString);
    assert_eq!(error("s[0:1:2]", &env), ErrorKind::ThreeIndexString);
}

#[test]
fn slicing_slices() {
    let env = env();
    assert_eq!(native("x[1:]", &env), ints(&[2, 3]));
    assert_eq!(native("x[:]", &env), ints(&[1, 2, 3]));
    assert_eq!(native("cap(x[:2:2])", &env), NativeValue::Int(2));
    assert_eq!(native("len(x[1:1])", &env), NativeValue::Int(0));
}

#[test]
fn slicing_arrays() {
    let env = env();
    let sliced = data("arr[1:]", &env);
    assert_eq!(sliced.regular().ty(), &Type::slice_of(Type::int()));
    assert_eq!(native("arr[1:]", &env), ints(&[8, 9]));
    assert_eq!(native("arrPtr[:1]", &env), ints(&[7]));
    assert!(matches!(
        error("[2]int{1, 2}[0:1]", &env),
        ErrorKind::UnaddressableSlice { .. }
    ));
}

#[test]
fn slice_errors() {
    let env = env();
    assert_eq!(
        error("x[1:2:]", &env),
        ErrorKind::MissingSliceIndex { which: "final" }
    );
    assert_eq!(
        error("x[2:1]", &env),
        ErrorKind::SliceBounds {
            low: 2,
            high: 1,
            cap: 3
        }
    );
    assert_eq!(
        error("x[0:4]", &env),
        ErrorKind::SliceBounds {
            low: 0,
            high: 4,
            cap: 3
        }
    );
    assert!(matches!(error("1[:]", &env), ErrorKind::CannotSlice { .. }));
}
