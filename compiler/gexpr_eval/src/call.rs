//! Calls of function values and selector resolution.
//!
//! Selecting on a value probes, in order: a method of a pointer, a field
//! of the (once dereferenced) struct, then a method of that value. An
//! interface dispatches to its dynamic value's method. Only one level of
//! indirection is followed. Selecting on a type yields a method expression
//! taking the receiver as its first argument.

use gexpr_rt::{Kind, Method, NativeFn, RtValue, Signature, Type};

use crate::convert::assign;
use crate::data::Data;
use crate::errors::{
    argument_count, host_error, invalid_ellipsis, invalid_selector, nil_dereference, not_callable,
    result_count, undefined, undefined_selector, unsupported, IntResult,
};
use crate::value::Value;

/// Call the function value `f`. `callee` is the source text of the
/// called expression, used in messages.
pub fn call_function(f: &RtValue, args: &[Data], ellipsis: bool, callee: &str) -> IntResult<Data> {
    let Some(sig) = f.ty().signature().filter(|_| f.kind() == Kind::Func) else {
        return Err(not_callable(&Data::Regular(f.clone())));
    };
    let values = bind_arguments(sig, args, ellipsis, callee)?;

    if sig.results.len() != 1 {
        return Err(result_count(&callee, sig.results.len()));
    }
    let mut results = f.call(&values).map_err(|message| host_error(&callee, message))?;
    if results.len() != 1 {
        return Err(result_count(&callee, results.len()));
    }
    Ok(Data::Regular(results.swap_remove(0)))
}

fn bind_arguments(
    sig: &Signature,
    args: &[Data],
    ellipsis: bool,
    callee: &str,
) -> IntResult<Vec<RtValue>> {
    let context = format!("argument to {callee}");
    let params = &sig.params;

    if ellipsis && !sig.variadic {
        return Err(invalid_ellipsis(&callee));
    }
    // With `...` the final argument is passed as the slice itself.
    if ellipsis || !sig.variadic {
        if args.len() != params.len() {
            return Err(argument_count(&callee, &params.len(), args.len()));
        }
        return args
            .iter()
            .zip(params)
            .map(|(arg, ty)| assign(arg, ty, &context))
            .collect();
    }

    let Some((slice_ty, fixed)) = params.split_last() else {
        return Err(invalid_ellipsis(&callee));
    };
    if args.len() < fixed.len() {
        let want = format!("at least {}", fixed.len());
        return Err(argument_count(&callee, &want, args.len()));
    }
    let (fixed_args, rest) = args.split_at(fixed.len());
    let mut values = fixed_args
        .iter()
        .zip(fixed)
        .map(|(arg, ty)| assign(arg, ty, &context))
        .collect::<IntResult<Vec<_>>>()?;
    let elem = slice_ty.elem().cloned().unwrap_or_else(Type::empty_interface);
    let packed = rest
        .iter()
        .map(|arg| assign(arg, &elem, &context))
        .collect::<IntResult<Vec<_>>>()?;
    values.push(RtValue::slice_from(slice_ty, &packed));
    Ok(values)
}

/// Resolve `x.name`. `receiver` is the source text of `x`.
pub fn select(x: &Value, name: &str, receiver: &str) -> IntResult<Value> {
    match x {
        Value::Namespace(members) => members
            .get(name)
            .cloned()
            .ok_or_else(|| undefined(&format!("{receiver}.{name}"))),
        Value::Data(Data::Regular(v)) => select_regular(v, name, receiver).map(Value::regular),
        Value::Type(ty) => method_expression(ty, name, receiver).map(Value::regular),
        other => Err(invalid_selector(other, name)),
    }
}

fn select_regular(v: &RtValue, name: &str, receiver: &str) -> IntResult<RtValue> {
    let target = if v.kind() == Kind::Ptr {
        if let Some(method) = v.ty().method_by_name(name) {
            return bind_method(v, method);
        }
        v.elem().ok_or_else(nil_dereference)?
    } else {
        v.clone()
    };
    if target.kind() == Kind::Struct {
        if let Some((path, _)) = target.ty().field_by_name(name) {
            return Ok(target.field_by_path(&path));
        }
    }
    if target.kind() == Kind::Interface && target.ty().interface_method(name).is_some() {
        let dynamic = target.elem().ok_or_else(nil_dereference)?;
        if let Some(method) = dynamic.ty().method_by_name(name) {
            return bind_method(&dynamic, method);
        }
    }
    if let Some(method) = target.ty().method_by_name(name) {
        return bind_method(&target, method);
    }
    Err(undefined_selector(&receiver, name))
}

/// Method value: `method` with its receiver fixed to `v`. A value-receiver
/// method reached through a pointer receives a copy of the pointee.
fn bind_method(v: &RtValue, method: &Method) -> IntResult<RtValue> {
    let recv = if v.kind() == Kind::Ptr && !method.pointer_receiver {
        v.elem().ok_or_else(nil_dereference)?.copied()
    } else {
        v.copied()
    };
    let func = method.func.clone();
    let bound = NativeFn::new(move |args| {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(recv.clone());
        full.extend_from_slice(args);
        func.call(&full)
    });
    Ok(RtValue::func(&Type::func_of(method.sig.clone()), bound))
}

/// `T.name`: a function whose first parameter is the receiver.
fn method_expression(ty: &Type, name: &str, receiver: &str) -> IntResult<RtValue> {
    if ty.kind() == Kind::Interface {
        return Err(unsupported("method expression on an interface type"));
    }
    let Some(method) = ty.method_by_name(name) else {
        return Err(undefined_selector(&receiver, name));
    };
    let deref = ty.kind() == Kind::Ptr && !method.pointer_receiver;
    let func = method.func.clone();
    let unbound = NativeFn::new(move |args| {
        let Some((recv, rest)) = args.split_first() else {
            return Err("missing receiver".to_string());
        };
        let recv = if deref {
            recv.elem().ok_or_else(|| nil_dereference().kind.to_string())?
        } else {
            recv.clone()
        };
        let mut full = Vec::with_capacity(args.len());
        full.push(recv);
        full.extend_from_slice(rest);
        func.call(&full)
    });

    let mut params = Vec::with_capacity(method.sig.params.len() + 1);
    params.push(ty.clone());
    params.extend(method.sig.params.iter().cloned());
    let sig = Signature::new(params, method.sig.results.clone(), method.sig.variadic);
    Ok(RtValue::func(&Type::func_of(sig), unbound))
}
