//! Runtime assignment and conversion of values.

use crate::num::{wrap_signed, wrap_unsigned};
use crate::types::{Kind, Type};
use crate::value::{RtValue, Repr};

impl RtValue {
    /// Implicit assignment to `target`: a copy of this value viewed as
    /// `target`, boxed when `target` is an interface. `None` when the
    /// value's type is not assignable to `target`.
    pub fn assign_to(&self, target: &Type) -> Option<RtValue> {
        if !self.ty().assignable_to(target) {
            return None;
        }
        Some(if target.kind() == Kind::Interface {
            RtValue::boxed(target, self)
        } else {
            self.copied().retyped(target.clone())
        })
    }

    /// Explicit conversion `T(x)`. `None` when the conversion is not
    /// permitted between the two types.
    pub fn convert(&self, target: &Type) -> Option<RtValue> {
        let from = self.ty();
        if !from.convertible_to(target) {
            return None;
        }
        if target.kind() == Kind::Interface {
            return Some(RtValue::boxed(target, self));
        }
        let to = target.kind();
        let converted = match (from.kind(), to) {
            (f, t) if is_real(f) && is_real(t) => convert_real(self, target),
            (f, t) if f.is_complex() && t.is_complex() => {
                let (re, im) = self.as_complex();
                RtValue::complex_of(target, re, im)
            }
            (f, Kind::String) if f.is_integer() => {
                let code = self.as_i128().and_then(|c| u32::try_from(c).ok());
                let ch = code.and_then(char::from_u32).unwrap_or(char::REPLACEMENT_CHARACTER);
                RtValue::string_of(target, ch.to_string().as_bytes())
            }
            (Kind::Slice, Kind::String) if from.is_byte_slice() => {
                let bytes: Vec<u8> = (0..self.len())
                    .map(|i| low_byte(self.index(i).as_u64()))
                    .collect();
                RtValue::string_of(target, &bytes)
            }
            (Kind::Slice, Kind::String) if from.is_rune_slice() => {
                let text: String = (0..self.len())
                    .map(|i| rune_to_char(self.index(i).as_i64()))
                    .collect();
                RtValue::string_of(target, text.as_bytes())
            }
            (Kind::String, Kind::Slice) if target.is_byte_slice() => {
                let elem = target.elem()?;
                let elems: Vec<RtValue> = self
                    .as_bytes()
                    .iter()
                    .map(|&b| RtValue::uint_of(elem, u64::from(b)))
                    .collect();
                RtValue::slice_from(target, &elems)
            }
            (Kind::String, Kind::Slice) => {
                let elem = target.elem()?;
                let elems: Vec<RtValue> = self
                    .as_string_lossy()
                    .chars()
                    .map(|c| RtValue::int_of(elem, i64::from(u32::from(c))))
                    .collect();
                RtValue::slice_from(target, &elems)
            }
            _ => self.copied().retyped(target.clone()),
        };
        Some(converted)
    }
}

fn is_real(kind: Kind) -> bool {
    kind.is_integer() || kind.is_float()
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "numeric conversion truncates and rounds like the host runtime"
)]
fn convert_real(value: &RtValue, target: &Type) -> RtValue {
    let to = target.kind();
    let repr = value.repr().clone();
    let wide: Result<i128, f64> = match repr {
        Repr::Int(i) => Ok(i128::from(i)),
        Repr::Uint(u) => Ok(i128::from(u)),
        Repr::Float(f) => Err(f),
        _ => Ok(0),
    };
    match wide {
        Ok(i) if to.is_float() => RtValue::float_of(target, i as f64),
        Err(f) if to.is_float() => RtValue::float_of(target, f),
        Ok(i) => integer_of(target, i),
        Err(f) => integer_of(target, f.trunc() as i128),
    }
}

fn integer_of(target: &Type, value: i128) -> RtValue {
    let kind = target.kind();
    if kind.is_signed_int() {
        RtValue::int_of(target, wrap_signed(value, kind.bits()))
    } else {
        RtValue::uint_of(target, wrap_unsigned(value, kind.bits()))
    }
}

#[expect(clippy::cast_possible_truncation, reason = "bytes are stored in a u64")]
fn low_byte(value: u64) -> u8 {
    value as u8
}

fn rune_to_char(rune: i64) -> char {
    u32::try_from(rune)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
