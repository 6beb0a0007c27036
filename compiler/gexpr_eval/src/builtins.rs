//! Built-in functions: `len`, `cap`, `complex`, `real`, `imag`, `new`,
//! `make` and `append`.

use std::fmt;

use gexpr_rt::{Constant, Kind, RtValue, Type};

use crate::convert;
use crate::data::{Data, TypedConst};
use crate::errors::{
    argument_count, builtin_mismatch, cannot_make, const_overflow, invalid_builtin_arg,
    invalid_ellipsis, invalid_size, len_larger_than_cap, not_expr, not_type, too_large, IntResult,
};
use crate::value::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Len,
    Cap,
    Complex,
    Real,
    Imag,
    New,
    Make,
    Append,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        Some(match name {
            "len" => Builtin::Len,
            "cap" => Builtin::Cap,
            "complex" => Builtin::Complex,
            "real" => Builtin::Real,
            "imag" => Builtin::Imag,
            "new" => Builtin::New,
            "make" => Builtin::Make,
            "append" => Builtin::Append,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Cap => "cap",
            Builtin::Complex => "complex",
            Builtin::Real => "real",
            Builtin::Imag => "imag",
            Builtin::New => "new",
            Builtin::Make => "make",
            Builtin::Append => "append",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Call `builtin` with already evaluated arguments. Only `append` accepts
/// the `...` form.
pub fn call_builtin(builtin: Builtin, args: Vec<Value>, ellipsis: bool) -> IntResult<Data> {
    if ellipsis && builtin != Builtin::Append {
        return Err(invalid_ellipsis(&builtin));
    }
    match builtin {
        Builtin::New => {
            let [ty] = exactly(builtin, args)?;
            match ty {
                Value::Type(ty) => {
                    ensure_storage(&ty, 1)?;
                    Ok(Data::Regular(RtValue::new_pointer(&ty)))
                }
                other => Err(not_type(&other)),
            }
        }
        Builtin::Make => make(&args),
        Builtin::Len => {
            let [x] = exactly(builtin, data_args(args)?)?;
            len(&x)
        }
        Builtin::Cap => {
            let [x] = exactly(builtin, data_args(args)?)?;
            cap(&x)
        }
        Builtin::Complex => {
            let [re, im] = exactly(builtin, data_args(args)?)?;
            complex(&re, &im)
        }
        Builtin::Real | Builtin::Imag => {
            let [x] = exactly(builtin, data_args(args)?)?;
            component(builtin, &x)
        }
        Builtin::Append => append(&data_args(args)?, ellipsis),
    }
}

fn exactly<T, const N: usize>(builtin: Builtin, args: Vec<T>) -> IntResult<[T; N]> {
    <[T; N]>::try_from(args).map_err(|args| argument_count(&builtin, &N, args.len()))
}

fn data_args(args: Vec<Value>) -> IntResult<Vec<Data>> {
    args.into_iter()
        .map(|arg| match arg {
            Value::Data(d) => Ok(d),
            other => Err(not_expr(&other)),
        })
        .collect()
}

fn int_value(n: usize) -> RtValue {
    RtValue::int(i64::try_from(n).unwrap_or(i64::MAX))
}

fn int_const(n: usize) -> IntResult<Data> {
    TypedConst::new(&Type::int(), &Constant::int(n))
        .map(Data::TypedConst)
        .ok_or_else(|| const_overflow(&n, &Type::int()))
}

/// Length of an array or of the array a pointer points to; known from
/// the type alone, so a nil pointer is fine.
fn static_array_len(ty: &Type) -> Option<usize> {
    match ty.kind() {
        Kind::Array => ty.array_len(),
        Kind::Ptr => ty.elem().filter(|e| e.kind() == Kind::Array)?.array_len(),
        _ => None,
    }
}

// len and cap

fn len(x: &Data) -> IntResult<Data> {
    let constant = match x {
        Data::UntypedConst(c) => Some(c),
        Data::TypedConst(c) => Some(c.value()),
        _ => None,
    };
    if let Some(Constant::Str(bytes)) = constant {
        return Ok(Data::UntypedConst(Constant::int(bytes.len())));
    }
    match x {
        Data::Regular(v) => {
            if let Some(n) = static_array_len(v.ty()) {
                return int_const(n);
            }
            match v.kind() {
                Kind::Chan | Kind::Map | Kind::Slice | Kind::String => {
                    Ok(Data::Regular(int_value(v.len())))
                }
                _ => Err(invalid_builtin_arg("len", x)),
            }
        }
        _ => Err(invalid_builtin_arg("len", x)),
    }
}

fn cap(x: &Data) -> IntResult<Data> {
    let Data::Regular(v) = x else {
        return Err(invalid_builtin_arg("cap", x));
    };
    if let Some(n) = static_array_len(v.ty()) {
        return int_const(n);
    }
    match v.kind() {
        Kind::Chan | Kind::Slice => Ok(Data::Regular(int_value(v.cap()))),
        _ => Err(invalid_builtin_arg("cap", x)),
    }
}

// complex, real and imag

/// Float kind fixed by a `complex` argument; `None` for an untyped number.
fn float_kind(x: &Data) -> IntResult<Option<Kind>> {
    let kind = match x {
        Data::UntypedConst(c) if c.is_numeric() => return Ok(None),
        Data::TypedConst(c) => c.ty().kind(),
        Data::Regular(v) => v.kind(),
        _ => return Err(invalid_builtin_arg("complex", x)),
    };
    if kind.is_float() {
        Ok(Some(kind))
    } else {
        Err(invalid_builtin_arg("complex", x))
    }
}

fn constant_of(x: &Data) -> Option<&Constant> {
    match x {
        Data::UntypedConst(c) => Some(c),
        Data::TypedConst(c) => Some(c.value()),
        _ => None,
    }
}

fn complex(re: &Data, im: &Data) -> IntResult<Data> {
    let both = || format!("{re}, {im}");
    if let (Data::UntypedConst(r), Data::UntypedConst(i)) = (re, im) {
        return Constant::complex(r, i)
            .map(Data::UntypedConst)
            .ok_or_else(|| invalid_builtin_arg("complex", &both()));
    }

    let kind = match (float_kind(re)?, float_kind(im)?) {
        (Some(a), Some(b)) if a != b => {
            return Err(builtin_mismatch("complex", &re.deep_type(), &im.deep_type()));
        }
        (Some(k), _) | (None, Some(k)) => k,
        (None, None) => Kind::Float64,
    };
    let (part_ty, result_ty) = if kind == Kind::Float32 {
        (Type::float32(), Type::complex64())
    } else {
        (Type::float64(), Type::complex128())
    };

    if let (Some(r), Some(i)) = (constant_of(re), constant_of(im)) {
        return Constant::complex(r, i)
            .and_then(|c| TypedConst::new(&result_ty, &c))
            .map(Data::TypedConst)
            .ok_or_else(|| invalid_builtin_arg("complex", &both()));
    }

    let part = |x: &Data| -> IntResult<f64> {
        match x {
            Data::Regular(v) => Ok(v.as_f64()),
            _ => constant_of(x)
                .and_then(|c| c.materialize(&part_ty))
                .map(|v| v.as_f64())
                .ok_or_else(|| invalid_builtin_arg("complex", x)),
        }
    };
    let value = RtValue::complex_of(&result_ty, part(re)?, part(im)?);
    Ok(Data::Regular(value))
}

fn component(builtin: Builtin, x: &Data) -> IntResult<Data> {
    let name = builtin.name();
    let take = |c: &Constant| {
        if builtin == Builtin::Imag {
            c.imag()
        } else {
            c.real()
        }
    };
    let part_ty = |kind: Kind| {
        if kind == Kind::Complex64 {
            Type::float32()
        } else {
            Type::float64()
        }
    };
    match x {
        Data::UntypedConst(c) if c.is_numeric() => take(c)
            .map(Data::UntypedConst)
            .ok_or_else(|| invalid_builtin_arg(name, x)),
        Data::TypedConst(c) if c.ty().kind().is_complex() => take(c.value())
            .and_then(|p| TypedConst::new(&part_ty(c.ty().kind()), &p))
            .map(Data::TypedConst)
            .ok_or_else(|| invalid_builtin_arg(name, x)),
        Data::Regular(v) if v.kind().is_complex() => {
            let (re, im) = v.as_complex();
            let value = if builtin == Builtin::Imag { im } else { re };
            Ok(Data::Regular(RtValue::float_of(&part_ty(v.kind()), value)))
        }
        _ => Err(invalid_builtin_arg(name, x)),
    }
}

// new, make and append

/// Upper bound on the storage slots one evaluation step may allocate.
const MAX_STORAGE_SLOTS: u64 = 1 << 24;

/// Check that `count` zero values of `elem` fit the allocation budget.
pub fn ensure_storage(elem: &Type, count: usize) -> IntResult<()> {
    let slots = u64::try_from(count)
        .unwrap_or(u64::MAX)
        .saturating_mul(elem.storage_slots());
    if slots <= MAX_STORAGE_SLOTS {
        return Ok(());
    }
    Err(if count == 1 {
        too_large(elem)
    } else {
        too_large(&format!("[{count}]{elem}"))
    })
}

fn size_arg(arg: &Value, what: &'static str) -> IntResult<usize> {
    let Value::Data(d) = arg else {
        return Err(invalid_size(what, arg));
    };
    d.as_int()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| invalid_size(what, d))
}

fn make(args: &[Value]) -> IntResult<Data> {
    let Some((ty, sizes)) = args.split_first().filter(|_| args.len() <= 3) else {
        return Err(argument_count(&Builtin::Make, &"1 to 3", args.len()));
    };
    let Value::Type(ty) = ty else {
        return Err(not_type(ty));
    };
    let sizes = sizes
        .iter()
        .zip(["size", "capacity"])
        .map(|(arg, what)| size_arg(arg, what))
        .collect::<IntResult<Vec<usize>>>()?;

    let value = match ty.kind() {
        Kind::Slice => {
            let len = sizes.first().copied().unwrap_or(0);
            let cap = sizes.get(1).copied().unwrap_or(len);
            if len > cap {
                return Err(len_larger_than_cap(len, cap));
            }
            let elem = ty.elem().cloned().unwrap_or_else(Type::empty_interface);
            ensure_storage(&elem, cap)?;
            RtValue::make_slice(ty, len, cap)
        }
        Kind::Map | Kind::Chan if sizes.len() > 1 => {
            return Err(argument_count(&Builtin::Make, &"1 or 2", args.len()));
        }
        // The size hint of a map is checked but has no effect.
        Kind::Map => RtValue::make_map(ty),
        Kind::Chan => {
            let cap = sizes.first().copied().unwrap_or(0);
            let elem = ty.elem().cloned().unwrap_or_else(Type::empty_interface);
            ensure_storage(&elem, cap)?;
            RtValue::make_chan(ty, cap)
        }
        _ => return Err(cannot_make(ty)),
    };
    Ok(Data::Regular(value))
}

/// Bytes of a string operand spread into `append([]byte, s...)`.
fn string_bytes(x: &Data) -> Option<Vec<u8>> {
    match x {
        Data::Regular(v) if v.kind() == Kind::String => Some(v.as_bytes().to_vec()),
        Data::UntypedConst(Constant::Str(bytes)) => Some(bytes.to_vec()),
        Data::TypedConst(c) => match c.value() {
            Constant::Str(bytes) => Some(bytes.to_vec()),
            _ => None,
        },
        _ => None,
    }
}

fn append(args: &[Data], ellipsis: bool) -> IntResult<Data> {
    let Some((first, rest)) = args.split_first() else {
        return Err(argument_count(&Builtin::Append, &"at least 1", 0));
    };
    let slice = match first {
        Data::Regular(v) if v.kind() == Kind::Slice => v,
        _ => return Err(invalid_builtin_arg("append", first)),
    };
    let Some(elem) = slice.ty().elem().cloned() else {
        return Err(invalid_builtin_arg("append", first));
    };

    let values: Vec<RtValue> = if ellipsis {
        let [spread] = rest else {
            return Err(argument_count(&Builtin::Append, &"2 with ...", args.len()));
        };
        match string_bytes(spread).filter(|_| slice.ty().is_byte_slice()) {
            Some(bytes) => bytes
                .iter()
                .map(|&b| RtValue::uint_of(&elem, u64::from(b)))
                .collect(),
            None => {
                let target = Type::slice_of(elem);
                let spread = convert::assign(spread, &target, "argument to append")?;
                (0..spread.len()).map(|i| spread.index(i)).collect()
            }
        }
    } else {
        rest.iter()
            .map(|x| convert::assign(x, &elem, "argument to append"))
            .collect::<IntResult<_>>()?
    };
    Ok(Data::Regular(slice.append(&values)))
}
