//! Composite literals: `T{...}` for struct, array, slice and map types.

use gexpr_ir::{ArrayLen, Expr, ExprKind, Span};
use gexpr_rt::{Kind, RtValue, Type};
use rustc_hash::FxHashSet;

use super::{EvalResult, Interpreter};
use crate::builtins::ensure_storage;
use crate::convert::assign;
use crate::data::Data;
use crate::errors::{
    duplicate_index, duplicate_literal_field, invalid_composite_type, invalid_field_name,
    invalid_literal_index, literal_index_out_of_bounds, missing_key, mixed_struct_literal, runtime,
    struct_value_count, unexported_field, unknown_field,
};

fn is_keyed(elt: &Expr) -> bool {
    matches!(elt.kind, ExprKind::KeyValue { .. })
}

impl Interpreter<'_> {
    pub(super) fn eval_composite(&self, ty: &Expr, elts: &[Expr], span: Span) -> EvalResult<RtValue> {
        // `[...]T` takes its length from the elements.
        if let ExprKind::ArrayType {
            len: ArrayLen::Ellipsis,
            elem,
        } = &ty.unparen().kind
        {
            let elem = self.eval_type(elem)?;
            let (values, len) = self.eval_sequence(elts, &elem, None)?;
            return Ok(RtValue::array_from(&Type::array_of(len, elem), &values));
        }

        let ty_value = self.eval_type(ty)?;
        if matches!(ty_value.kind(), Kind::Struct | Kind::Array) {
            ensure_storage(&ty_value, 1).map_err(|e| e.at(ty.span))?;
        }
        match ty_value.kind() {
            Kind::Struct => self.eval_struct_literal(&ty_value, elts, span),
            Kind::Array => {
                let elem = ty_value.elem().cloned().unwrap_or_else(Type::empty_interface);
                let (values, _) = self.eval_sequence(elts, &elem, ty_value.array_len())?;
                Ok(RtValue::array_from(&ty_value, &values))
            }
            Kind::Slice => {
                let elem = ty_value.elem().cloned().unwrap_or_else(Type::empty_interface);
                let (values, _) = self.eval_sequence(elts, &elem, None)?;
                Ok(RtValue::slice_from(&ty_value, &values))
            }
            Kind::Map => self.eval_map_literal(&ty_value, elts, span),
            _ => Err(invalid_composite_type(&ty_value).at(ty.span)),
        }
    }

    fn eval_struct_literal(&self, ty: &Type, elts: &[Expr], span: Span) -> EvalResult<RtValue> {
        let fields = ty.fields();
        let keyed = elts.first().is_some_and(is_keyed);
        if let Some(elt) = elts.iter().find(|elt| is_keyed(elt) != keyed) {
            return Err(mixed_struct_literal().at(elt.span));
        }

        let mut values: Vec<RtValue> = fields.iter().map(|f| RtValue::zero(&f.ty)).collect();
        if !keyed {
            if !elts.is_empty() && elts.len() != fields.len() {
                return Err(struct_value_count(ty, fields.len(), elts.len()).at(span));
            }
            for ((elt, field), slot) in elts.iter().zip(fields).zip(values.iter_mut()) {
                if !field.is_exported() {
                    return Err(unexported_field(&field.name, ty).at(elt.span));
                }
                let value = self.eval_data(elt)?;
                *slot = assign(&value, &field.ty, "struct literal").map_err(|e| e.at(elt.span))?;
            }
            return Ok(RtValue::struct_from(ty, &values));
        }

        let mut seen = FxHashSet::default();
        for elt in elts {
            let ExprKind::KeyValue { key, value } = &elt.kind else {
                return Err(mixed_struct_literal().at(elt.span));
            };
            let ExprKind::Ident(name) = &key.kind else {
                return Err(invalid_field_name(&self.text(key)).at(key.span));
            };
            let Some(i) = fields.iter().position(|f| &f.name == name) else {
                return Err(unknown_field(name, ty).at(key.span));
            };
            if !fields[i].is_exported() {
                return Err(unexported_field(name, ty).at(key.span));
            }
            if !seen.insert(i) {
                return Err(duplicate_literal_field(name).at(key.span));
            }
            let data = self.eval_data(value)?;
            values[i] = assign(&data, &fields[i].ty, "struct literal").map_err(|e| e.at(value.span))?;
        }
        Ok(RtValue::struct_from(ty, &values))
    }

    /// Elements of an array or slice literal, placed at their (explicit or
    /// running) index. Returns the values with gaps zeroed and the
    /// literal's length.
    fn eval_sequence(
        &self,
        elts: &[Expr],
        elem: &Type,
        bound: Option<usize>,
    ) -> EvalResult<(Vec<RtValue>, usize)> {
        let mut placed: Vec<(usize, RtValue)> = Vec::with_capacity(elts.len());
        let mut seen = FxHashSet::default();
        let mut next = 0;
        let mut len = 0;
        for elt in elts {
            let (index, value) = match &elt.kind {
                ExprKind::KeyValue { key, value } => (self.eval_literal_index(key)?, value.as_ref()),
                _ => (next, elt),
            };
            if let Some(bound) = bound.filter(|&bound| index >= bound) {
                return Err(literal_index_out_of_bounds(index, bound).at(elt.span));
            }
            ensure_storage(elem, index.saturating_add(1)).map_err(|e| e.at(elt.span))?;
            if !seen.insert(index) {
                return Err(duplicate_index(index).at(elt.span));
            }
            let data = self.eval_data(value)?;
            let value = assign(&data, elem, "array or slice literal").map_err(|e| e.at(value.span))?;
            placed.push((index, value));
            next = index + 1;
            len = len.max(next);
        }

        let mut values: Vec<RtValue> = (0..len).map(|_| RtValue::zero(elem)).collect();
        for (index, value) in placed {
            values[index] = value;
        }
        Ok((values, len))
    }

    /// Explicit index of an array or slice element: a non-negative
    /// constant representable as `int`.
    fn eval_literal_index(&self, key: &Expr) -> EvalResult<usize> {
        let data = self.eval_data(key)?;
        let index = match &data {
            Data::UntypedConst(c) => c.representable(Kind::Int).and_then(|c| c.to_i64()),
            Data::TypedConst(c) if c.ty() == &Type::int() => c.value().to_i64(),
            _ => None,
        };
        index
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| invalid_literal_index(&data).at(key.span))
    }

    fn eval_map_literal(&self, ty: &Type, elts: &[Expr], span: Span) -> EvalResult<RtValue> {
        let (Some(key_ty), Some(elem_ty)) = (ty.key(), ty.elem()) else {
            return Err(invalid_composite_type(ty).at(span));
        };
        let mut entries = Vec::with_capacity(elts.len());
        for elt in elts {
            let ExprKind::KeyValue { key, value } = &elt.kind else {
                return Err(missing_key().at(elt.span));
            };
            let k = self.eval_data(key)?;
            let k = assign(&k, key_ty, "map literal").map_err(|e| e.at(key.span))?;
            let v = self.eval_data(value)?;
            let v = assign(&v, elem_ty, "map literal").map_err(|e| e.at(value.span))?;
            entries.push((k, v));
        }
        RtValue::map_from(ty, entries).map_err(|message| runtime(message).at(span))
    }
}
