//! Implicit assignment and explicit conversion of [`Data`].
//!
//! Assignment is the narrower relation: a constant must fit the target
//! exactly, `nil` only goes to nilable kinds, and a regular value needs an
//! assignable type. Conversion adds numeric narrowing between types, the
//! integer-to-string rule and the byte/rune slice conversions. Converting a
//! constant to a basic type keeps it constant.

use gexpr_rt::{Constant, Kind, RtValue, Type};

use crate::data::{Data, TypedConst};
use crate::errors::{
    assertion_failed, cannot_assign, cannot_convert, const_overflow, impossible_assertion,
    not_interface, IntError, IntResult,
};

impl Data {
    /// The runtime value a variable of type `ty` would hold after
    /// `var v ty = x`. Interface targets box the value.
    pub fn assign(&self, ty: &Type) -> Option<RtValue> {
        match self {
            Data::Nil => ty.kind().is_nilable().then(|| RtValue::zero(ty)),
            Data::Regular(v) => v.assign_to(ty),
            Data::UntypedConst(c) => {
                if ty.kind() == Kind::Interface {
                    return c.materialize(&c.default_type())?.assign_to(ty);
                }
                c.materialize(ty)
            }
            Data::TypedConst(c) => c.regular().assign_to(ty),
            Data::UntypedBool(b) => match ty.kind() {
                Kind::Bool => Some(RtValue::bool_of(ty, *b)),
                Kind::Interface => RtValue::from(*b).assign_to(ty),
                _ => None,
            },
        }
    }

    pub fn assignable_to(&self, ty: &Type) -> bool {
        self.assign(ty).is_some()
    }

    /// `ty(x)`. Constants converted to a basic type stay constant; a
    /// conversion to any other type yields a regular value.
    pub fn convert(&self, ty: &Type) -> Option<Data> {
        match self {
            Data::Nil | Data::UntypedBool(_) => self.assign(ty).map(Data::Regular),
            Data::Regular(v) => v.convert(ty).map(Data::Regular),
            Data::UntypedConst(c) => {
                if ty.kind().is_basic() {
                    return convert_const(c, ty);
                }
                c.materialize(&c.default_type())?
                    .convert(ty)
                    .map(Data::Regular)
            }
            Data::TypedConst(c) => {
                if !c.ty().convertible_to(ty) {
                    return None;
                }
                if ty.kind().is_basic() {
                    return convert_const(c.value(), ty);
                }
                c.regular().convert(ty).map(Data::Regular)
            }
        }
    }

    pub fn convertible_to(&self, ty: &Type) -> bool {
        self.convert(ty).is_some()
    }

    /// Integer value usable as an index, length or capacity.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Data::Regular(v) if v.kind().is_integer() => {
                v.as_i128().and_then(|i| i64::try_from(i).ok())
            }
            Data::TypedConst(c) if c.ty().kind().is_integer() => c.value().to_i64(),
            Data::UntypedConst(c) => c.representable(Kind::Int).and_then(|c| c.to_i64()),
            _ => None,
        }
    }
}

fn convert_const(value: &Constant, ty: &Type) -> Option<Data> {
    let converted = value.convert(ty.kind())?;
    TypedConst::new(ty, &converted).map(Data::TypedConst)
}

/// Numeric constant that failed to bind to a numeric type: it overflows
/// (or truncates), rather than being of the wrong kind altogether.
fn overflows(x: &Data, ty: &Type) -> Option<String> {
    let value = match x {
        Data::UntypedConst(c) => c,
        Data::TypedConst(c) => c.value(),
        _ => return None,
    };
    (value.is_numeric() && ty.kind().is_numeric()).then(|| value.to_string())
}

fn bind_error(x: &Data, ty: &Type, fallback: impl FnOnce() -> IntError) -> IntError {
    match overflows(x, ty) {
        Some(value) => const_overflow(&value, ty),
        None => fallback(),
    }
}

/// [`Data::assign`] with an error naming `context` ("argument to f",
/// "struct literal", ...).
pub(crate) fn assign(x: &Data, ty: &Type, context: &str) -> IntResult<RtValue> {
    x.assign(ty)
        .ok_or_else(|| bind_error(x, ty, || cannot_assign(x, ty, context)))
}

/// [`Data::convert`] with an error.
pub(crate) fn convert(x: &Data, ty: &Type) -> IntResult<Data> {
    x.convert(ty)
        .ok_or_else(|| bind_error(x, ty, || cannot_convert(x, ty)))
}

/// Bind an untyped constant to the type of a typed constant operand.
pub(crate) fn bind_const(c: &Constant, ty: &Type) -> IntResult<TypedConst> {
    TypedConst::new(ty, c).ok_or_else(|| {
        let x = Data::UntypedConst(c.clone());
        bind_error(&x, ty, || cannot_convert(&x, ty))
    })
}

/// `x.(ty)`: the dynamic value of interface value `x`, checked against
/// `ty`. An interface `ty` re-boxes the dynamic value.
pub(crate) fn assert_type(x: &Data, ty: &Type) -> IntResult<RtValue> {
    let iface = match x {
        Data::Regular(v) if v.kind() == Kind::Interface => v,
        _ => return Err(not_interface(x)),
    };
    let iface_ty = iface.ty();
    if ty.kind() != Kind::Interface && !ty.implements(iface_ty) {
        return Err(impossible_assertion(ty, iface_ty));
    }
    let Some(dynamic) = iface.elem() else {
        return Err(assertion_failed(iface_ty, &"nil", ty));
    };
    let matched = if ty.kind() == Kind::Interface {
        dynamic.ty().implements(ty)
    } else {
        dynamic.ty() == ty
    };
    if !matched {
        return Err(assertion_failed(iface_ty, dynamic.ty(), ty));
    }
    Ok(if ty.kind() == Kind::Interface {
        RtValue::boxed(ty, &dynamic)
    } else {
        dynamic.copied()
    })
}
