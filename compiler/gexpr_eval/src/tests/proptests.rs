//! Property tests checking evaluation against host arithmetic.

use gexpr_rt::{Constant, NativeValue, RtValue, Type};
use proptest::prelude::*;

use super::{data, ints};
use crate::{eval_to_data, eval_to_native, Identifiers, TypedConst};

proptest! {
    #[test]
    fn int8_addition_wraps(a in any::<i8>(), b in any::<i8>()) {
        let env = Identifiers::new()
            .with("a", RtValue::int_of(&Type::int8(), i64::from(a)))
            .with("b", RtValue::int_of(&Type::int8(), i64::from(b)));
        let sum = eval_to_native("a + b", &env);
        prop_assert_eq!(sum, Ok(NativeValue::Int(i64::from(a.wrapping_add(b)))));
    }

    #[test]
    fn untyped_addition_is_exact(a in any::<i64>(), b in any::<i64>()) {
        let sum = data(&format!("{a} + {b}"), &Identifiers::new());
        prop_assert_eq!(sum.untyped_const(), &Constant::int(i128::from(a) + i128::from(b)));
    }

    #[test]
    fn slicing_has_expected_length(len in 0usize..8, low in 0usize..10, high in 0usize..10) {
        let values: Vec<i64> = (0..).take(len).collect();
        let env = Identifiers::new().with(
            "xs",
            RtValue::slice_from(
                &Type::slice_of(Type::int()),
                &values.iter().map(|&v| RtValue::int(v)).collect::<Vec<_>>(),
            ),
        );
        let result = eval_to_native(&format!("xs[{low}:{high}]"), &env);
        if low <= high && high <= len {
            prop_assert_eq!(result, Ok(ints(&values[low..high])));
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn int16_conversion_matches_binding(v in any::<i32>()) {
        let result = eval_to_data(&format!("int16({v})"), &Identifiers::new());
        let expected = TypedConst::new(&Type::int16(), &Constant::int(v));
        match (result, expected) {
            (Ok(data), Some(expected)) => {
                prop_assert_eq!(data.typed_const().value(), expected.value());
            }
            (Err(_), None) => {}
            (result, expected) => {
                prop_assert!(false, "{result:?} disagrees with {expected:?}");
            }
        }
    }
}
