//! Binary operator implementations.
//!
//! The algorithm is picked by the constness of the operands:
//! - two untyped operands fold exactly in the constant model
//! - an untyped operand is first bound to the other operand's type
//! - two typed constants compute in their type and stay constant
//! - anything involving a regular value computes at run time
//!
//! Comparisons always yield an untyped boolean. Shifts take their type
//! from the left operand alone.

use std::cmp::Ordering;

use gexpr_ir::BinaryOp;
use gexpr_rt::{Constant, Kind, RtValue, Type};

use crate::convert::{assign, bind_const};
use crate::data::{Data, TypedConst};
use crate::errors::{
    const_overflow, division_by_zero, invalid_nil_comparison, mismatched_types,
    operator_not_defined, runtime, shift_count, shift_operand, IntResult,
};

/// Evaluate `x op y`.
pub fn evaluate_binary(x: Data, op: BinaryOp, y: Data) -> IntResult<Data> {
    if op.is_comparison() {
        compare(&x, op, &y)
    } else if op.is_shift() {
        shift(&x, op, &y)
    } else {
        arith(&x, op, &y)
    }
}

/// Both operands after binding, with identical types.
enum Operands {
    Const(TypedConst, TypedConst),
    Regular(RtValue, RtValue),
}

/// Untyped operands seen as constants. Comparison results take part as
/// boolean constants.
fn untyped(x: &Data) -> Option<Constant> {
    match x {
        Data::UntypedConst(c) => Some(c.clone()),
        Data::UntypedBool(b) => Some(Constant::Bool(*b)),
        _ => None,
    }
}

fn regular_of(x: &Data) -> Option<&RtValue> {
    match x {
        Data::Regular(v) => Some(v),
        Data::TypedConst(c) => Some(c.regular()),
        _ => None,
    }
}

/// Bind an untyped operand to the type of the typed operand `other`.
fn bind_untyped(x: &Data, other: &Data, context: &str) -> IntResult<Data> {
    match (x, other) {
        (Data::UntypedConst(c), Data::TypedConst(t)) => bind_const(c, t.ty()).map(Data::TypedConst),
        (_, Data::TypedConst(t)) => assign(x, t.ty(), context).map(Data::Regular),
        (_, Data::Regular(v)) => assign(x, v.ty(), context).map(Data::Regular),
        _ => Ok(x.clone()),
    }
}

/// Bring two typed-or-untyped operands to a common type. With
/// `assignable` set (comparisons) a regular operand may also be
/// converted to the other operand's type when assignable to it.
fn bind(x: &Data, op: BinaryOp, y: &Data, assignable: bool) -> IntResult<Operands> {
    let context = format!("operation {op}");
    let (x, y) = match (x.is_untyped(), y.is_untyped()) {
        (true, false) => (bind_untyped(x, y, &context)?, y.clone()),
        (false, true) => (x.clone(), bind_untyped(y, x, &context)?),
        _ => (x.clone(), y.clone()),
    };
    match (x, y) {
        (Data::TypedConst(a), Data::TypedConst(b)) if a.ty() == b.ty() => Ok(Operands::Const(a, b)),
        (x, y) => {
            let (Some(a), Some(b)) = (regular_of(&x), regular_of(&y)) else {
                return Err(operator_not_defined(&op, &x));
            };
            if a.ty() == b.ty() {
                return Ok(Operands::Regular(a.clone(), b.clone()));
            }
            if assignable {
                if let Some(a) = a.assign_to(b.ty()) {
                    return Ok(Operands::Regular(a, b.clone()));
                }
                if let Some(b) = b.assign_to(a.ty()) {
                    return Ok(Operands::Regular(a.clone(), b));
                }
            }
            Err(mismatched_types(&x, &op, &y, &x.deep_type(), &y.deep_type()))
        }
    }
}

// Arithmetic, bitwise and logical operators

fn arith(x: &Data, op: BinaryOp, y: &Data) -> IntResult<Data> {
    if matches!(x, Data::Nil) || matches!(y, Data::Nil) {
        return Err(operator_not_defined(&op, &Data::Nil));
    }
    if let (Some(a), Some(b)) = (untyped(x), untyped(y)) {
        let result = Constant::binary(&a, op, &b)?;
        return Ok(match (x, y) {
            (Data::UntypedBool(_), _) | (_, Data::UntypedBool(_)) => {
                Data::UntypedBool(matches!(result, Constant::Bool(true)))
            }
            _ => Data::UntypedConst(result),
        });
    }
    match bind(x, op, y, false)? {
        Operands::Const(a, b) => {
            if matches!(op, BinaryOp::Div | BinaryOp::Rem) && is_zero(b.value()) {
                return Err(division_by_zero());
            }
            let result = regular_arith(a.regular(), op, b.regular())?;
            TypedConst::from_regular(result.clone())
                .map(Data::TypedConst)
                .ok_or_else(|| const_overflow(&result, a.ty()))
        }
        Operands::Regular(a, b) => regular_arith(&a, op, &b).map(Data::Regular),
    }
}

fn is_zero(c: &Constant) -> bool {
    matches!(Constant::compare(c, BinaryOp::Eq, &Constant::int(0)), Ok(true))
}

/// Run-time `a op b` for two values of the same type. Integers wrap to
/// the width of their kind.
pub(crate) fn regular_arith(a: &RtValue, op: BinaryOp, b: &RtValue) -> IntResult<RtValue> {
    let ty = a.ty();
    let kind = ty.kind();
    let undefined = || operator_not_defined(&op, &Data::Regular(a.clone()));
    let value = match kind {
        k if k.is_signed_int() => {
            let (x, y) = (a.as_i64(), b.as_i64());
            if matches!(op, BinaryOp::Div | BinaryOp::Rem) && y == 0 {
                return Err(division_by_zero());
            }
            let r = match op {
                BinaryOp::Add => x.wrapping_add(y),
                BinaryOp::Sub => x.wrapping_sub(y),
                BinaryOp::Mul => x.wrapping_mul(y),
                BinaryOp::Div => x.wrapping_div(y),
                BinaryOp::Rem => x.wrapping_rem(y),
                BinaryOp::And => x & y,
                BinaryOp::Or => x | y,
                BinaryOp::Xor => x ^ y,
                BinaryOp::AndNot => x & !y,
                _ => return Err(undefined()),
            };
            RtValue::int_of(ty, r)
        }
        k if k.is_unsigned_int() => {
            let (x, y) = (a.as_u64(), b.as_u64());
            if matches!(op, BinaryOp::Div | BinaryOp::Rem) && y == 0 {
                return Err(division_by_zero());
            }
            let r = match op {
                BinaryOp::Add => x.wrapping_add(y),
                BinaryOp::Sub => x.wrapping_sub(y),
                BinaryOp::Mul => x.wrapping_mul(y),
                BinaryOp::Div => x / y,
                BinaryOp::Rem => x % y,
                BinaryOp::And => x & y,
                BinaryOp::Or => x | y,
                BinaryOp::Xor => x ^ y,
                BinaryOp::AndNot => x & !y,
                _ => return Err(undefined()),
            };
            RtValue::uint_of(ty, r)
        }
        k if k.is_float() => {
            let (x, y) = (a.as_f64(), b.as_f64());
            let r = match op {
                BinaryOp::Add => x + y,
                BinaryOp::Sub => x - y,
                BinaryOp::Mul => x * y,
                BinaryOp::Div => x / y,
                _ => return Err(undefined()),
            };
            RtValue::float_of(ty, r)
        }
        k if k.is_complex() => {
            let ((ar, ai), (br, bi)) = (a.as_complex(), b.as_complex());
            let (re, im) = match op {
                BinaryOp::Add => (ar + br, ai + bi),
                BinaryOp::Sub => (ar - br, ai - bi),
                BinaryOp::Mul => (ar * br - ai * bi, ar * bi + ai * br),
                BinaryOp::Div => {
                    let denom = br * br + bi * bi;
                    ((ar * br + ai * bi) / denom, (ai * br - ar * bi) / denom)
                }
                _ => return Err(undefined()),
            };
            RtValue::complex_of(ty, re, im)
        }
        Kind::String if op == BinaryOp::Add => {
            let mut joined = a.as_bytes().to_vec();
            joined.extend_from_slice(&b.as_bytes());
            RtValue::string_of(ty, &joined)
        }
        Kind::Bool if op == BinaryOp::LogicalAnd => RtValue::bool_of(ty, a.as_bool() && b.as_bool()),
        Kind::Bool if op == BinaryOp::LogicalOr => RtValue::bool_of(ty, a.as_bool() || b.as_bool()),
        _ => return Err(undefined()),
    };
    Ok(value)
}

// Comparison operators

fn compare(x: &Data, op: BinaryOp, y: &Data) -> IntResult<Data> {
    match (x, y) {
        (Data::Nil, Data::Nil) => return Err(operator_not_defined(&op, &Data::Nil)),
        (Data::Nil, other) | (other, Data::Nil) => return compare_nil(other, op),
        _ => {}
    }
    if let (Some(a), Some(b)) = (untyped(x), untyped(y)) {
        return Ok(Data::UntypedBool(Constant::compare(&a, op, &b)?));
    }
    let result = match bind(x, op, y, true)? {
        Operands::Const(a, b) => Constant::compare(a.value(), op, b.value())?,
        Operands::Regular(a, b) => regular_compare(&a, op, &b)?,
    };
    Ok(Data::UntypedBool(result))
}

fn compare_nil(other: &Data, op: BinaryOp) -> IntResult<Data> {
    match other {
        Data::Regular(v)
            if v.kind().is_nilable() && matches!(op, BinaryOp::Eq | BinaryOp::NotEq) =>
        {
            Ok(Data::UntypedBool(v.is_nil() == (op == BinaryOp::Eq)))
        }
        _ => Err(invalid_nil_comparison(other, &op)),
    }
}

fn regular_compare(a: &RtValue, op: BinaryOp, b: &RtValue) -> IntResult<bool> {
    let undefined = || operator_not_defined(&op, &Data::Regular(a.clone()));
    let kind = a.kind();
    if matches!(op, BinaryOp::Eq | BinaryOp::NotEq) {
        if !a.ty().comparable() {
            return Err(undefined());
        }
        let equal = a.equals(b).map_err(runtime)?;
        return Ok(equal == (op == BinaryOp::Eq));
    }
    let ordering = match kind {
        k if k.is_signed_int() => Some(a.as_i64().cmp(&b.as_i64())),
        k if k.is_unsigned_int() => Some(a.as_u64().cmp(&b.as_u64())),
        k if k.is_float() => a.as_f64().partial_cmp(&b.as_f64()),
        Kind::String => Some(a.as_bytes().cmp(&b.as_bytes())),
        _ => return Err(undefined()),
    };
    // Unordered floats (NaN) compare false.
    Ok(ordering.is_some_and(|ordering| match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    }))
}

// Shift operators

/// Shift count and whether it is a constant.
fn count_of(y: &Data) -> IntResult<(u64, bool)> {
    let count = match y {
        Data::UntypedConst(c) => c.representable(Kind::Uint64).and_then(|c| c.to_u64()),
        Data::TypedConst(c) if c.ty().kind().is_unsigned_int() => c.value().to_u64(),
        Data::Regular(v) if v.kind().is_unsigned_int() => return Ok((v.as_u64(), false)),
        _ => None,
    };
    count.map(|n| (n, true)).ok_or_else(|| shift_count(y))
}

fn shift(x: &Data, op: BinaryOp, y: &Data) -> IntResult<Data> {
    let (count, const_count) = count_of(y)?;
    match x {
        Data::UntypedConst(c) if const_count => Ok(Data::UntypedConst(Constant::shift(c, op, count)?)),
        // Best effort for an untyped constant shifted by a variable: the
        // constant takes type int instead of the type the context would
        // give it.
        Data::UntypedConst(c) => {
            if c.to_int().is_none() {
                return Err(shift_operand(x));
            }
            let value = c
                .materialize(&Type::int())
                .ok_or_else(|| const_overflow(c, &Type::int()))?;
            Ok(Data::Regular(regular_shift(&value, op, count)))
        }
        Data::TypedConst(c) if c.ty().kind().is_integer() => {
            let value = regular_shift(c.regular(), op, count);
            if !const_count {
                return Ok(Data::Regular(value));
            }
            TypedConst::from_regular(value.clone())
                .map(Data::TypedConst)
                .ok_or_else(|| const_overflow(&value, c.ty()))
        }
        Data::Regular(v) if v.kind().is_integer() => Ok(Data::Regular(regular_shift(v, op, count))),
        _ => Err(shift_operand(x)),
    }
}

fn regular_shift(v: &RtValue, op: BinaryOp, count: u64) -> RtValue {
    let bits = u32::try_from(count).ok().filter(|&n| n < 64);
    let ty = v.ty();
    if v.kind().is_signed_int() {
        let x = v.as_i64();
        let r = match (op, bits) {
            (BinaryOp::Shl, Some(n)) => x << n,
            (BinaryOp::Shl, None) => 0,
            (_, Some(n)) => x >> n,
            (_, None) => {
                if x < 0 {
                    -1
                } else {
                    0
                }
            }
        };
        RtValue::int_of(ty, r)
    } else {
        let x = v.as_u64();
        let r = match (op, bits) {
            (BinaryOp::Shl, Some(n)) => x << n,
            (_, Some(n)) => x >> n,
            (_, None) => 0,
        };
        RtValue::uint_of(ty, r)
    }
}
