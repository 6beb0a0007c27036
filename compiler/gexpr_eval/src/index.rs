//! Index and slice expressions.

use gexpr_rt::{Constant, Kind, RtValue, Type};

use crate::builtins::ensure_storage;
use crate::convert::assign;
use crate::data::Data;
use crate::errors::{
    cannot_index, cannot_slice, index_not_integer, index_out_of_range, missing_slice_index,
    negative_index, nil_dereference, runtime, slice_bounds, three_index_string,
    unaddressable_slice, IntResult,
};

/// Non-negative integer index.
fn index_value(index: &Data) -> IntResult<usize> {
    let Some(i) = index.as_int() else {
        return Err(index_not_integer(index));
    };
    usize::try_from(i).map_err(|_| negative_index(i))
}

/// Pointers to arrays index and slice like the array itself.
fn auto_deref(v: &RtValue) -> IntResult<RtValue> {
    if v.kind() == Kind::Ptr && v.ty().elem().is_some_and(|e| e.kind() == Kind::Array) {
        return v.elem().ok_or_else(nil_dereference);
    }
    Ok(v.clone())
}

fn const_string(x: &Data) -> Option<(&[u8], Option<&Type>)> {
    match x {
        Data::UntypedConst(Constant::Str(bytes)) => Some((bytes, None)),
        Data::TypedConst(c) => match c.value() {
            Constant::Str(bytes) => Some((bytes, Some(c.ty()))),
            _ => None,
        },
        _ => None,
    }
}

fn is_const(x: &Data) -> bool {
    matches!(x, Data::UntypedConst(_) | Data::TypedConst(_))
}

/// Evaluate `x[index]`.
pub fn evaluate_index(x: &Data, index: &Data) -> IntResult<Data> {
    if let Some((bytes, _)) = const_string(x) {
        let i = index_value(index)?;
        let Some(&byte) = bytes.get(i) else {
            return Err(index_out_of_range(i, bytes.len()));
        };
        return Ok(if is_const(index) {
            Data::UntypedConst(Constant::int(byte))
        } else {
            Data::Regular(RtValue::uint_of(&Type::uint8(), u64::from(byte)))
        });
    }

    let Data::Regular(v) = x else {
        return Err(cannot_index(x));
    };
    let v = auto_deref(v)?;
    match v.kind() {
        Kind::Map => {
            let (Some(key_ty), Some(elem_ty)) = (v.ty().key(), v.ty().elem()) else {
                return Err(cannot_index(x));
            };
            let key = assign(index, key_ty, "map index")?;
            match v.map_get(&key).map_err(runtime)? {
                Some(found) => Ok(Data::Regular(found)),
                None => {
                    ensure_storage(elem_ty, 1)?;
                    Ok(Data::Regular(RtValue::zero(elem_ty)))
                }
            }
        }
        Kind::Array | Kind::Slice | Kind::String => {
            let i = index_value(index)?;
            if i >= v.len() {
                return Err(index_out_of_range(i, v.len()));
            }
            Ok(Data::Regular(v.index(i)))
        }
        _ => Err(cannot_index(x)),
    }
}

/// Optional slice bound.
fn bound(index: Option<&Data>) -> IntResult<Option<usize>> {
    index.map(index_value).transpose()
}

/// Evaluate `x[low:high]` or, with `max` supplied, `x[low:high:max]`.
pub fn evaluate_slice(
    x: &Data,
    low: Option<&Data>,
    high: Option<&Data>,
    max: Option<&Data>,
    slice3: bool,
) -> IntResult<Data> {
    if let Some((bytes, ty)) = const_string(x) {
        if slice3 {
            return Err(three_index_string());
        }
        let len = bytes.len();
        let (low, high) = (bound(low)?.unwrap_or(0), bound(high)?.unwrap_or(len));
        if low > high || high > len {
            return Err(slice_bounds(low, high, len));
        }
        let ty = ty.cloned().unwrap_or_else(Type::string);
        return Ok(Data::Regular(RtValue::string_of(&ty, &bytes[low..high])));
    }

    let Data::Regular(v) = x else {
        return Err(cannot_slice(x));
    };
    let v = auto_deref(v)?;
    match v.kind() {
        Kind::Array if !v.can_addr() => return Err(unaddressable_slice(x)),
        Kind::Array | Kind::Slice => {}
        Kind::String if slice3 => return Err(three_index_string()),
        Kind::String => {}
        _ => return Err(cannot_slice(x)),
    }

    let cap = if v.kind() == Kind::String {
        v.len()
    } else {
        v.cap()
    };
    let low = bound(low)?.unwrap_or(0);
    let (high, max) = if slice3 {
        let high = bound(high)?.ok_or_else(|| missing_slice_index("middle"))?;
        let max = bound(max)?.ok_or_else(|| missing_slice_index("final"))?;
        (high, max)
    } else {
        let high = bound(high)?.unwrap_or_else(|| v.len());
        (high, cap)
    };
    if low > high || high > max || max > cap {
        return Err(slice_bounds(low, high, cap));
    }
    Ok(Data::Regular(v.slice(low, high, max)))
}
