//! Unary operators, address-of and pointer indirection.

use gexpr_ir::UnaryOp;
use gexpr_rt::{Constant, Kind, RtValue, Type};

use crate::data::{Data, TypedConst};
use crate::errors::{
    cannot_take_address, const_overflow, invalid_indirect, nil_dereference, operator_not_defined,
    IntResult,
};
use crate::value::Value;

/// Evaluate `op x`.
pub fn evaluate_unary(op: UnaryOp, x: Data) -> IntResult<Data> {
    if op == UnaryOp::Addr {
        return address_of(&x);
    }
    match x {
        Data::Nil => Err(operator_not_defined(&op, &x)),
        Data::UntypedBool(b) if op == UnaryOp::Not => Ok(Data::UntypedBool(!b)),
        Data::UntypedBool(_) => Err(operator_not_defined(&op, &x)),
        Data::UntypedConst(c) => Ok(Data::UntypedConst(Constant::unary(op, &c)?)),
        Data::TypedConst(ref c) => {
            let result = regular_unary(op, c.regular())?;
            TypedConst::from_regular(result.clone())
                .map(Data::TypedConst)
                .ok_or_else(|| const_overflow(&result, c.ty()))
        }
        Data::Regular(v) => regular_unary(op, &v).map(Data::Regular),
    }
}

fn address_of(x: &Data) -> IntResult<Data> {
    let Data::Regular(v) = x else {
        return Err(cannot_take_address(x));
    };
    // Composite literals and other temporaries get fresh storage.
    let v = if v.can_addr() {
        v.clone()
    } else {
        v.to_addressable()
    };
    v.addr()
        .map(Data::Regular)
        .ok_or_else(|| cannot_take_address(x))
}

fn regular_unary(op: UnaryOp, v: &RtValue) -> IntResult<RtValue> {
    let ty = v.ty();
    let kind = ty.kind();
    let undefined = || operator_not_defined(&op, &Data::Regular(v.clone()));
    let value = match op {
        UnaryOp::Pos if kind.is_numeric() => v.copied(),
        UnaryOp::Neg => match kind {
            k if k.is_signed_int() => RtValue::int_of(ty, v.as_i64().wrapping_neg()),
            k if k.is_unsigned_int() => RtValue::uint_of(ty, v.as_u64().wrapping_neg()),
            k if k.is_float() => RtValue::float_of(ty, -v.as_f64()),
            k if k.is_complex() => {
                let (re, im) = v.as_complex();
                RtValue::complex_of(ty, -re, -im)
            }
            _ => return Err(undefined()),
        },
        UnaryOp::BitNot if kind.is_signed_int() => RtValue::int_of(ty, !v.as_i64()),
        UnaryOp::BitNot if kind.is_unsigned_int() => RtValue::uint_of(ty, !v.as_u64()),
        UnaryOp::Not if kind == Kind::Bool => RtValue::bool_of(ty, !v.as_bool()),
        _ => return Err(undefined()),
    };
    Ok(value)
}

/// `*x`: a pointer type when `x` is a type, else a dereference.
pub fn evaluate_star(x: Value) -> IntResult<Value> {
    match x {
        Value::Type(ty) => Ok(Value::Type(Type::ptr_to(ty))),
        Value::Data(Data::Regular(v)) if v.kind() == Kind::Ptr => v
            .elem()
            .map(Value::regular)
            .ok_or_else(nil_dereference),
        other => Err(invalid_indirect(&other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typed_negation_wraps() {
        let min = TypedConst::new(&Type::int8(), &Constant::int(-128));
        let Some(min) = min else {
            panic!("-128 fits int8");
        };
        let Ok(Data::TypedConst(negated)) = evaluate_unary(UnaryOp::Neg, Data::TypedConst(min))
        else {
            panic!("typed constant expected");
        };
        assert_eq!(negated.value(), &Constant::int(-128));
    }

    #[test]
    fn complement_of_unsigned() {
        let x = Data::Regular(RtValue::uint_of(&Type::uint8(), 0x0f));
        let Ok(Data::Regular(v)) = evaluate_unary(UnaryOp::BitNot, x) else {
            panic!("regular expected");
        };
        assert_eq!(v.as_u64(), 0xf0);
    }

    #[test]
    fn address_of_temporary_is_allowed() {
        let x = Data::Regular(RtValue::int(7));
        let Ok(Data::Regular(ptr)) = evaluate_unary(UnaryOp::Addr, x) else {
            panic!("pointer expected");
        };
        assert_eq!(ptr.ty(), &Type::ptr_to(Type::int()));
        let Ok(Value::Data(Data::Regular(pointee))) = evaluate_star(Value::regular(ptr)) else {
            panic!("pointee expected");
        };
        assert_eq!(pointee.as_i64(), 7);
    }

    #[test]
    fn address_of_constant_fails() {
        let result = evaluate_unary(UnaryOp::Addr, Data::UntypedConst(Constant::int(1)));
        assert!(result.is_err());
    }

    #[test]
    fn nil_pointer_dereference_fails() {
        let ptr = RtValue::zero(&Type::ptr_to(Type::int()));
        let result = evaluate_star(Value::regular(ptr)).map(|_| ());
        assert_eq!(result.map_err(|e| e.kind), Err(nil_dereference().kind));
    }
}
