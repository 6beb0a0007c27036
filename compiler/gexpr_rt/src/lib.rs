//! Runtime model for the gexpr evaluator.
//!
//! The evaluator never touches host values directly. Everything it knows
//! about a value comes from probing a [`Type`] descriptor and reading or
//! writing through an [`RtValue`] handle; constants live in the separate
//! arbitrary-precision [`Constant`] model until they are bound to a type.

mod constant;
mod convert;
mod native;
mod num;
mod types;
mod value;

pub use constant::{ConstError, Constant};
pub use native::NativeValue;
pub use num::{int_bounds, wrap_signed, wrap_unsigned};
pub use types::{
    ChanDir, Field, FieldPath, InterfaceMethod, Kind, Method, Shape, Signature, Type,
};
pub use value::{ChanStore, MapStore, NativeFn, NativeResult, Repr, RtValue, SliceRef, Slot};
