//! Evaluation of type expressions to runtime [`Type`] descriptors.

use gexpr_ir::{ArrayLen, ChanDirSyntax, Expr, ExprKind, FieldDecl, FuncTypeExpr};
use gexpr_rt::{ChanDir, Field, Signature, Type};
use rustc_hash::FxHashSet;

use super::{EvalResult, Interpreter};
use crate::data::Data;
use crate::errors::{
    duplicate_field, ellipsis_array_outside_literal, invalid_array_len, invalid_map_key,
    unsupported, variadic_position, IntError,
};

impl Interpreter<'_> {
    pub(super) fn eval_type_expr(&self, expr: &Expr) -> EvalResult<Type> {
        let at = |e: IntError| e.at(expr.span);
        match &expr.kind {
            ExprKind::ArrayType { len, elem } => {
                let elem = self.eval_type(elem)?;
                match len {
                    ArrayLen::Slice => Ok(Type::slice_of(elem)),
                    ArrayLen::Ellipsis => Err(at(ellipsis_array_outside_literal())),
                    ArrayLen::Fixed(len) => Ok(Type::array_of(self.eval_array_len(len)?, elem)),
                }
            }
            ExprKind::MapType { key, value } => {
                let key = self.eval_type(key)?;
                let value = self.eval_type(value)?;
                if !key.comparable() {
                    return Err(at(invalid_map_key(&key)));
                }
                Ok(Type::map_of(key, value))
            }
            ExprKind::ChanType { dir, elem } => {
                let dir = match dir {
                    ChanDirSyntax::Both => ChanDir::BOTH,
                    ChanDirSyntax::Send => ChanDir::SEND,
                    ChanDirSyntax::Recv => ChanDir::RECV,
                };
                Ok(Type::chan_of(dir, self.eval_type(elem)?))
            }
            ExprKind::FuncType(func) => self.eval_signature(func).map(Type::func_of),
            ExprKind::StructType(fields) => self.eval_struct_type(fields).map(Type::struct_of),
            ExprKind::InterfaceType(methods) if methods.is_empty() => Ok(Type::empty_interface()),
            ExprKind::InterfaceType(_) => Err(at(unsupported("non-empty interface literal"))),
            _ => self.eval_type(expr),
        }
    }

    /// Length of `[N]T`: a non-negative integer constant.
    fn eval_array_len(&self, len: &Expr) -> EvalResult<usize> {
        let value = self.eval_data(len)?;
        let n = match &value {
            Data::UntypedConst(c) => c.to_i64(),
            Data::TypedConst(c) if c.ty().kind().is_integer() => c.value().to_i64(),
            _ => None,
        };
        n.and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid_array_len(&value).at(len.span))
    }

    fn eval_signature(&self, func: &FuncTypeExpr) -> EvalResult<Signature> {
        let mut params = Vec::with_capacity(func.params.len());
        let mut variadic = false;
        for (i, param) in func.params.iter().enumerate() {
            let ty = self.eval_type(&param.ty)?;
            if param.variadic {
                if i + 1 != func.params.len() {
                    return Err(variadic_position().at(param.ty.span));
                }
                variadic = true;
                params.push(Type::slice_of(ty));
            } else {
                params.push(ty);
            }
        }
        let mut results = Vec::with_capacity(func.results.len());
        for result in &func.results {
            if result.variadic {
                return Err(variadic_position().at(result.ty.span));
            }
            results.push(self.eval_type(&result.ty)?);
        }
        Ok(Signature::new(params, results, variadic))
    }

    fn eval_struct_type(&self, decls: &[FieldDecl]) -> EvalResult<Vec<Field>> {
        let mut fields = Vec::new();
        let mut seen = FxHashSet::default();
        for decl in decls {
            let ty = self.eval_type(&decl.ty)?;
            let tag = decl
                .tag
                .as_deref()
                .map(|tag| String::from_utf8_lossy(tag).into_owned())
                .unwrap_or_default();
            let declared: Vec<Field> = if decl.names.is_empty() {
                vec![Field::embedded(ty)]
            } else {
                decl.names
                    .iter()
                    .map(|name| Field::new(name.name.clone(), ty.clone()))
                    .collect()
            };
            for field in declared {
                // Blank fields never collide.
                if field.name != "_" && !seen.insert(field.name.clone()) {
                    return Err(duplicate_field(&field.name).at(decl.span));
                }
                fields.push(field.with_tag(tag.clone()));
            }
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use gexpr_parse::parse_expr;
    use gexpr_rt::Kind;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::environment::Identifiers;
    use crate::errors::ErrorKind;
    use crate::value::Value;

    fn eval_type(src: &str) -> Result<Type, ErrorKind> {
        let Ok(expr) = parse_expr(src) else {
            panic!("{src} parses");
        };
        let env = Identifiers::new();
        match Interpreter::new(&env, src).eval(&expr) {
            Ok(Value::Type(ty)) => Ok(ty),
            Ok(other) => panic!("{src} is {other}, not a type"),
            Err(e) => Err(e.kind),
        }
    }

    #[test]
    fn array_length_from_constant_expression() {
        assert_eq!(eval_type("[2*3]int"), Ok(Type::array_of(6, Type::int())));
        assert_eq!(eval_type("[int8(4)]bool"), Ok(Type::array_of(4, Type::bool())));
    }

    #[test]
    fn array_length_must_be_a_non_negative_integer() {
        assert!(matches!(eval_type("[-1]int"), Err(ErrorKind::InvalidArrayLen { .. })));
        assert!(matches!(eval_type("[1.5]int"), Err(ErrorKind::InvalidArrayLen { .. })));
        assert_eq!(eval_type("[...]int"), Err(ErrorKind::EllipsisArrayOutsideLiteral));
    }

    #[test]
    fn variadic_parameter_becomes_a_slice() {
        let Ok(ty) = eval_type("func(string, ...int) bool") else {
            panic!("valid func type");
        };
        let Some(sig) = ty.signature() else {
            panic!("func type has a signature");
        };
        assert!(sig.variadic);
        assert_eq!(sig.params, vec![Type::string(), Type::slice_of(Type::int())]);
        assert_eq!(sig.results, vec![Type::bool()]);
    }

    #[test]
    fn struct_fields_and_tags() {
        let Ok(ty) = eval_type("struct{A, B int; C string `json:\"c\"`}") else {
            panic!("valid struct type");
        };
        let names: Vec<&str> = ty.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(ty.fields()[2].tag, "json:\"c\"");
        assert_eq!(ty.kind(), Kind::Struct);
    }

    #[test]
    fn duplicate_struct_field_fails() {
        assert_eq!(
            eval_type("struct{A int; A string}"),
            Err(ErrorKind::DuplicateField {
                field: "A".to_string()
            })
        );
    }

    #[test]
    fn map_key_must_be_comparable() {
        assert!(matches!(eval_type("map[[]int]bool"), Err(ErrorKind::InvalidMapKey { .. })));
        assert_eq!(
            eval_type("map[string]int"),
            Ok(Type::map_of(Type::string(), Type::int()))
        );
    }

    #[test]
    fn interface_literals() {
        assert_eq!(eval_type("interface{}"), Ok(Type::empty_interface()));
        assert!(matches!(
            eval_type("interface{ M() }"),
            Err(ErrorKind::Unsupported { .. })
        ));
    }
}
