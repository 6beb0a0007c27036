//! Result of evaluating any expression node.

use std::fmt;
use std::sync::Arc;

use gexpr_rt::{Constant, RtValue, Type};
use rustc_hash::FxHashMap;

use crate::builtins::Builtin;
use crate::data::{Data, TypedConst};

/// Members of a namespace synthesized from dotted identifiers.
pub type Namespace = Arc<FxHashMap<String, Value>>;

/// An expression denotes a value, a type, a built-in function or a
/// namespace. Only the first can be the final result of a well-formed
/// expression; the others are consumed by calls, conversions and
/// selectors.
#[derive(Clone, Debug)]
pub enum Value {
    Data(Data),
    Type(Type),
    Builtin(Builtin),
    Namespace(Namespace),
}

impl Value {
    pub fn nil() -> Self {
        Value::Data(Data::Nil)
    }

    pub fn regular(value: RtValue) -> Self {
        Value::Data(Data::Regular(value))
    }

    pub fn untyped_const(value: Constant) -> Self {
        Value::Data(Data::UntypedConst(value))
    }

    pub fn typed_const(value: TypedConst) -> Self {
        Value::Data(Data::TypedConst(value))
    }

    pub fn untyped_bool(value: bool) -> Self {
        Value::Data(Data::UntypedBool(value))
    }

    // Accessors. Each one panics on any other variant.

    pub fn data(&self) -> &Data {
        match self {
            Value::Data(d) => d,
            other => panic!("Value::data called on {}", other.kind_name()),
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Value::Type(t) => t,
            other => panic!("Value::ty called on {}", other.kind_name()),
        }
    }

    pub fn builtin(&self) -> Builtin {
        match self {
            Value::Builtin(b) => *b,
            other => panic!("Value::builtin called on {}", other.kind_name()),
        }
    }

    pub fn namespace(&self) -> &FxHashMap<String, Value> {
        match self {
            Value::Namespace(members) => members,
            other => panic!("Value::namespace called on {}", other.kind_name()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Data(_) => "data",
            Value::Type(_) => "type",
            Value::Builtin(_) => "built-in function",
            Value::Namespace(_) => "namespace",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Data(d) => write!(f, "{d}"),
            Value::Type(t) => write!(f, "type value {t}"),
            Value::Builtin(b) => write!(f, "built-in function value {b}"),
            Value::Namespace(members) => {
                let mut names: Vec<&str> = members.keys().map(String::as_str).collect();
                names.sort_unstable();
                write!(f, "namespace (exports: {})", names.join(" "))
            }
        }
    }
}

impl From<Data> for Value {
    fn from(data: Data) -> Self {
        Value::Data(data)
    }
}

impl From<RtValue> for Value {
    fn from(value: RtValue) -> Self {
        Value::regular(value)
    }
}

impl From<Type> for Value {
    fn from(ty: Type) -> Self {
        Value::Type(ty)
    }
}

impl From<TypedConst> for Value {
    fn from(value: TypedConst) -> Self {
        Value::typed_const(value)
    }
}
