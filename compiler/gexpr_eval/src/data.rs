//! The value of an expression in the ordinary sense.
//!
//! Go's operator and conversion rules depend on whether an operand is a
//! constant and whether it has a type yet, so [`Data`] keeps those apart:
//! a live runtime value, an exact untyped constant, an exact constant
//! bound to a basic type, the untyped result of a comparison, or `nil`.

use std::fmt;

use gexpr_rt::{Constant, RtValue, Type};

#[derive(Clone, Debug)]
pub enum Data {
    /// Untyped `nil`.
    Nil,
    Regular(RtValue),
    UntypedConst(Constant),
    TypedConst(TypedConst),
    /// Result of a comparison. Behaves like an untyped boolean constant
    /// in operators, but is never folded as one.
    UntypedBool(bool),
}

/// Constant bound to a basic type. The value is always representable in
/// the type; the materialized runtime value is kept alongside.
#[derive(Clone, Debug)]
pub struct TypedConst {
    value: Constant,
    regular: RtValue,
}

impl TypedConst {
    /// Bind `value` to basic type `ty`. `None` when `ty` is not basic or
    /// the value does not fit it.
    pub fn new(ty: &Type, value: &Constant) -> Option<TypedConst> {
        let value = value.representable(ty.kind())?;
        let regular = value.materialize(ty)?;
        Some(TypedConst { value, regular })
    }

    /// Read a runtime result of constant arithmetic back as a constant.
    /// `None` when the result has no exact value (an infinite float).
    pub(crate) fn from_regular(regular: RtValue) -> Option<TypedConst> {
        let value = Constant::from_value(&regular)?;
        Some(TypedConst { value, regular })
    }

    pub fn ty(&self) -> &Type {
        self.regular.ty()
    }

    pub fn value(&self) -> &Constant {
        &self.value
    }

    /// The constant as a runtime value of its type.
    pub fn regular(&self) -> &RtValue {
        &self.regular
    }
}

impl PartialEq for TypedConst {
    fn eq(&self, other: &Self) -> bool {
        self.ty() == other.ty() && self.value == other.value
    }
}

impl Data {
    pub fn regular(&self) -> &RtValue {
        match self {
            Data::Regular(v) => v,
            other => panic!("Data::regular called on {}", other.kind_name()),
        }
    }

    pub fn untyped_const(&self) -> &Constant {
        match self {
            Data::UntypedConst(c) => c,
            other => panic!("Data::untyped_const called on {}", other.kind_name()),
        }
    }

    pub fn typed_const(&self) -> &TypedConst {
        match self {
            Data::TypedConst(c) => c,
            other => panic!("Data::typed_const called on {}", other.kind_name()),
        }
    }

    pub fn untyped_bool(&self) -> bool {
        match self {
            Data::UntypedBool(b) => *b,
            other => panic!("Data::untyped_bool called on {}", other.kind_name()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Data::Nil => "nil",
            Data::Regular(_) => "regular value",
            Data::UntypedConst(_) => "untyped constant",
            Data::TypedConst(_) => "typed constant",
            Data::UntypedBool(_) => "untyped boolean",
        }
    }

    /// Untyped operands: constants and comparison results.
    pub fn is_untyped(&self) -> bool {
        matches!(self, Data::UntypedConst(_) | Data::UntypedBool(_))
    }

    /// Type as it would be written in a diagnostic.
    pub fn deep_type(&self) -> String {
        match self {
            Data::Nil => "untyped nil".to_string(),
            Data::Regular(v) => v.ty().to_string(),
            Data::UntypedConst(c) => format!("untyped {} constant", c.kind_name()),
            Data::TypedConst(c) => format!("{} constant", c.ty()),
            Data::UntypedBool(_) => "untyped bool".to_string(),
        }
    }

    pub fn deep_value(&self) -> String {
        match self {
            Data::Nil => "nil".to_string(),
            Data::Regular(v) => v.to_string(),
            Data::UntypedConst(c) => c.to_string(),
            Data::TypedConst(c) => c.value().to_string(),
            Data::UntypedBool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Nil => f.write_str("untyped nil"),
            _ => write!(f, "{} (type {})", self.deep_value(), self.deep_type()),
        }
    }
}

impl From<RtValue> for Data {
    fn from(value: RtValue) -> Self {
        Data::Regular(value)
    }
}

impl From<Constant> for Data {
    fn from(value: Constant) -> Self {
        Data::UntypedConst(value)
    }
}

impl From<TypedConst> for Data {
    fn from(value: TypedConst) -> Self {
        Data::TypedConst(value)
    }
}
