//! Projection of runtime values into plain host data.

use crate::value::{Repr, RtValue};

/// A runtime value with every handle unwrapped: pointers and interfaces
/// are followed, containers become owned vectors. Values with no data
/// representation (functions, channels) are [`NativeValue::Opaque`].
#[derive(Clone, Debug, PartialEq)]
pub enum NativeValue {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(f64, f64),
    String(String),
    List(Vec<NativeValue>),
    Map(Vec<(NativeValue, NativeValue)>),
    Struct(Vec<(String, NativeValue)>),
    /// Type name of a value that cannot be unwrapped.
    Opaque(String),
}

impl RtValue {
    pub fn to_native(&self) -> NativeValue {
        let repr = self.repr().clone();
        match repr {
            Repr::Bool(b) => NativeValue::Bool(b),
            Repr::Int(i) => NativeValue::Int(i),
            Repr::Uint(u) => NativeValue::Uint(u),
            Repr::Float(f) => NativeValue::Float(f),
            Repr::Complex(re, im) => NativeValue::Complex(re, im),
            Repr::Str(bytes) => NativeValue::String(String::from_utf8_lossy(&bytes).into_owned()),
            Repr::Array(_) | Repr::Slice(Some(_)) => {
                NativeValue::List((0..self.len()).map(|i| self.index(i).to_native()).collect())
            }
            Repr::Struct(_) => NativeValue::Struct(
                self.ty()
                    .fields()
                    .iter()
                    .enumerate()
                    .map(|(i, field)| (field.name.clone(), self.field(i).to_native()))
                    .collect(),
            ),
            Repr::Map(Some(_)) => NativeValue::Map(
                self.map_entries()
                    .iter()
                    .map(|(k, v)| (k.to_native(), v.to_native()))
                    .collect(),
            ),
            Repr::Ptr(Some(_)) | Repr::Interface(Some(_)) => {
                self.elem().map_or(NativeValue::Nil, |inner| inner.to_native())
            }
            Repr::Chan(Some(_)) | Repr::Func(Some(_)) => NativeValue::Opaque(self.ty().to_string()),
            Repr::Slice(None)
            | Repr::Map(None)
            | Repr::Chan(None)
            | Repr::Func(None)
            | Repr::Ptr(None)
            | Repr::Interface(None) => NativeValue::Nil,
        }
    }
}
