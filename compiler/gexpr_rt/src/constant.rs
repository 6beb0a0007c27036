//! Arbitrary-precision constants.
//!
//! Integers are unbounded, floats are exact rationals and complex numbers
//! are pairs of rationals, so constant arithmetic never loses precision.
//! Precision is only given up when a constant is bound to a concrete type
//! ([`Constant::representable`]) and even then the result is checked: an
//! integer that does not fit, or a float that rounds to infinity, is
//! rejected rather than clamped.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use gexpr_ir::{BinaryOp, Literal, UnaryOp};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Num, One, Signed, ToPrimitive, Zero};

use crate::num::int_bounds;
use crate::types::{Kind, Type};
use crate::value::{round_float, RtValue, Repr};

/// Largest left shift accepted on an untyped constant.
const MAX_SHIFT: u64 = 1074;

/// Largest decimal exponent accepted in a float literal.
const MAX_EXPONENT: u32 = 10_000;

#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Bool(bool),
    Str(Arc<[u8]>),
    Int(BigInt),
    Float(BigRational),
    Complex(BigRational, BigRational),
}

/// Failure of a constant operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConstError {
    #[error("malformed constant literal {0}")]
    Malformed(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("operator {op} not defined on {operand} (untyped {kind} constant)")]
    OperatorNotDefined {
        op: &'static str,
        operand: String,
        kind: &'static str,
    },
    #[error("invalid operation: mismatched constant kinds {left} and {right}")]
    MismatchedKinds {
        left: &'static str,
        right: &'static str,
    },
    #[error("invalid shift of {0}: shifted operand must be an integer")]
    NonIntegerShift(String),
    #[error("shift count {0} too large")]
    ShiftTooLarge(u64),
}

/// Numeric rank used for kind promotion: int < float < complex.
fn rank(c: &Constant) -> Option<u8> {
    match c {
        Constant::Int(_) => Some(0),
        Constant::Float(_) => Some(1),
        Constant::Complex(..) => Some(2),
        Constant::Bool(_) | Constant::Str(_) => None,
    }
}

fn to_rational(c: &Constant) -> BigRational {
    match c {
        Constant::Int(i) => BigRational::from_integer(i.clone()),
        Constant::Float(r) | Constant::Complex(r, _) => r.clone(),
        Constant::Bool(_) | Constant::Str(_) => BigRational::zero(),
    }
}

fn to_complex(c: &Constant) -> (BigRational, BigRational) {
    match c {
        Constant::Complex(re, im) => (re.clone(), im.clone()),
        other => (to_rational(other), BigRational::zero()),
    }
}

impl Constant {
    pub fn int(value: impl Into<BigInt>) -> Constant {
        Constant::Int(value.into())
    }

    pub fn string(bytes: &[u8]) -> Constant {
        Constant::Str(Arc::from(bytes))
    }

    /// Exact rational for a finite `f64`.
    pub fn float(value: f64) -> Option<Constant> {
        BigRational::from_float(value).map(Constant::Float)
    }

    /// Parse a literal as written in source.
    pub fn from_literal(lit: &Literal) -> Result<Constant, ConstError> {
        match lit {
            Literal::Int(text) => parse_int(text).map(Constant::Int),
            Literal::Float(text) => parse_decimal(text).map(Constant::Float),
            Literal::Imag(text) => {
                let body = text.strip_suffix('i').unwrap_or(text);
                let has_prefix = matches!(body.get(..2), Some("0x" | "0X" | "0o" | "0O" | "0b" | "0B"));
                let im = if has_prefix {
                    parse_int(body).map(BigRational::from_integer)?
                } else {
                    parse_decimal(body)?
                };
                Ok(Constant::Complex(BigRational::zero(), im))
            }
            Literal::Char(code) => Ok(Constant::Int(BigInt::from(*code))),
            Literal::String(bytes) => Ok(Constant::string(bytes)),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Constant::Bool(_) => "bool",
            Constant::Str(_) => "string",
            Constant::Int(_) => "int",
            Constant::Float(_) => "float",
            Constant::Complex(..) => "complex",
        }
    }

    /// Type an untyped constant takes when no other type is implied.
    pub fn default_type(&self) -> Type {
        match self {
            Constant::Bool(_) => Type::bool(),
            Constant::Str(_) => Type::string(),
            Constant::Int(_) => Type::int(),
            Constant::Float(_) => Type::float64(),
            Constant::Complex(..) => Type::complex128(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        rank(self).is_some()
    }

    /// Exact integer value, if the constant is numerically integral.
    pub fn to_int(&self) -> Option<BigInt> {
        match self {
            Constant::Int(i) => Some(i.clone()),
            Constant::Float(r) => r.is_integer().then(|| r.to_integer()),
            Constant::Complex(re, im) => {
                (im.is_zero() && re.is_integer()).then(|| re.to_integer())
            }
            Constant::Bool(_) | Constant::Str(_) => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_int()?.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.to_int()?.to_u64()
    }

    /// Real part of a numeric constant.
    pub fn real(&self) -> Option<Constant> {
        match self {
            Constant::Complex(re, _) => Some(Constant::Float(re.clone())),
            Constant::Int(_) | Constant::Float(_) => Some(self.clone()),
            Constant::Bool(_) | Constant::Str(_) => None,
        }
    }

    /// Imaginary part of a numeric constant.
    pub fn imag(&self) -> Option<Constant> {
        match self {
            Constant::Complex(_, im) => Some(Constant::Float(im.clone())),
            Constant::Int(_) => Some(Constant::Int(BigInt::zero())),
            Constant::Float(_) => Some(Constant::Float(BigRational::zero())),
            Constant::Bool(_) | Constant::Str(_) => None,
        }
    }

    /// `complex(re, im)` of two real constants.
    pub fn complex(re: &Constant, im: &Constant) -> Option<Constant> {
        let real = |c: &Constant| match c {
            Constant::Int(_) | Constant::Float(_) => Some(to_rational(c)),
            Constant::Complex(r, i) if i.is_zero() => Some(r.clone()),
            _ => None,
        };
        Some(Constant::Complex(real(re)?, real(im)?))
    }

    // Operators

    pub fn unary(op: UnaryOp, x: &Constant) -> Result<Constant, ConstError> {
        let undefined = || ConstError::OperatorNotDefined {
            op: op.as_symbol(),
            operand: x.to_string(),
            kind: x.kind_name(),
        };
        match (op, x) {
            (UnaryOp::Pos, c) if c.is_numeric() => Ok(c.clone()),
            (UnaryOp::Neg, Constant::Int(i)) => Ok(Constant::Int(-i)),
            (UnaryOp::Neg, Constant::Float(r)) => Ok(Constant::Float(-r)),
            (UnaryOp::Neg, Constant::Complex(re, im)) => Ok(Constant::Complex(-re, -im)),
            (UnaryOp::BitNot, Constant::Int(i)) => Ok(Constant::Int(!i)),
            (UnaryOp::Not, Constant::Bool(b)) => Ok(Constant::Bool(!b)),
            _ => Err(undefined()),
        }
    }

    /// Arithmetic, bitwise and logical operators. Comparisons go through
    /// [`Constant::compare`] and shifts through [`Constant::shift`].
    pub fn binary(x: &Constant, op: BinaryOp, y: &Constant) -> Result<Constant, ConstError> {
        let undefined = || ConstError::OperatorNotDefined {
            op: op.as_symbol(),
            operand: x.to_string(),
            kind: x.kind_name(),
        };
        match (x, y) {
            (Constant::Bool(a), Constant::Bool(b)) => match op {
                BinaryOp::LogicalAnd => Ok(Constant::Bool(*a && *b)),
                BinaryOp::LogicalOr => Ok(Constant::Bool(*a || *b)),
                _ => Err(undefined()),
            },
            (Constant::Str(a), Constant::Str(b)) => match op {
                BinaryOp::Add => {
                    let mut joined = Vec::with_capacity(a.len() + b.len());
                    joined.extend_from_slice(a);
                    joined.extend_from_slice(b);
                    Ok(Constant::string(&joined))
                }
                _ => Err(undefined()),
            },
            _ => {
                let (Some(rx), Some(ry)) = (rank(x), rank(y)) else {
                    return Err(ConstError::MismatchedKinds {
                        left: x.kind_name(),
                        right: y.kind_name(),
                    });
                };
                match rx.max(ry) {
                    0 => int_binary(x, op, y).ok_or_else(undefined)?,
                    1 => float_binary(&to_rational(x), op, &to_rational(y)).ok_or_else(undefined)?,
                    _ => complex_binary(&to_complex(x), op, &to_complex(y)).ok_or_else(undefined)?,
                }
            }
        }
    }

    /// `x << count` / `x >> count`. The shifted operand must be integral.
    pub fn shift(x: &Constant, op: BinaryOp, count: u64) -> Result<Constant, ConstError> {
        let value = x
            .to_int()
            .ok_or_else(|| ConstError::NonIntegerShift(x.to_string()))?;
        match op {
            BinaryOp::Shl => {
                if count > MAX_SHIFT {
                    return Err(ConstError::ShiftTooLarge(count));
                }
                Ok(Constant::Int(value << count))
            }
            BinaryOp::Shr => {
                let shifted = if count > u64::from(u32::MAX) {
                    if value.is_negative() {
                        BigInt::from(-1)
                    } else {
                        BigInt::zero()
                    }
                } else {
                    value >> count
                };
                Ok(Constant::Int(shifted))
            }
            _ => Err(ConstError::OperatorNotDefined {
                op: op.as_symbol(),
                operand: x.to_string(),
                kind: x.kind_name(),
            }),
        }
    }

    /// Comparison operators.
    pub fn compare(x: &Constant, op: BinaryOp, y: &Constant) -> Result<bool, ConstError> {
        let undefined = || ConstError::OperatorNotDefined {
            op: op.as_symbol(),
            operand: x.to_string(),
            kind: x.kind_name(),
        };
        let ordering = match (x, y) {
            (Constant::Bool(a), Constant::Bool(b)) => {
                return match op {
                    BinaryOp::Eq => Ok(a == b),
                    BinaryOp::NotEq => Ok(a != b),
                    _ => Err(undefined()),
                };
            }
            (Constant::Str(a), Constant::Str(b)) => a.cmp(b),
            _ => match (rank(x), rank(y)) {
                (Some(2), Some(_)) | (Some(_), Some(2)) => {
                    let equal = to_complex(x) == to_complex(y);
                    return match op {
                        BinaryOp::Eq => Ok(equal),
                        BinaryOp::NotEq => Ok(!equal),
                        _ => Err(undefined()),
                    };
                }
                (Some(_), Some(_)) => to_rational(x).cmp(&to_rational(y)),
                _ => {
                    return Err(ConstError::MismatchedKinds {
                        left: x.kind_name(),
                        right: y.kind_name(),
                    })
                }
            },
        };
        match op {
            BinaryOp::Eq => Ok(ordering == Ordering::Equal),
            BinaryOp::NotEq => Ok(ordering != Ordering::Equal),
            BinaryOp::Lt => Ok(ordering == Ordering::Less),
            BinaryOp::LtEq => Ok(ordering != Ordering::Greater),
            BinaryOp::Gt => Ok(ordering == Ordering::Greater),
            BinaryOp::GtEq => Ok(ordering != Ordering::Less),
            _ => Err(undefined()),
        }
    }

    // Binding to types

    /// The constant as a value of basic kind `kind`, rounded for float
    /// kinds. `None` when it cannot be represented: wrong kind, integer
    /// out of range, non-integral value for an integer kind, or a float
    /// overflowing to infinity.
    pub fn representable(&self, kind: Kind) -> Option<Constant> {
        match kind {
            Kind::Bool => matches!(self, Constant::Bool(_)).then(|| self.clone()),
            Kind::String => matches!(self, Constant::Str(_)).then(|| self.clone()),
            k if k.is_integer() => {
                let value = self.to_int()?;
                let (min, max) = int_bounds(k.is_signed_int(), k.bits());
                let fits = value >= BigInt::from(min) && value <= BigInt::from(max);
                fits.then_some(Constant::Int(value))
            }
            k if k.is_float() => {
                let value = match self {
                    Constant::Complex(re, im) if im.is_zero() => re.clone(),
                    Constant::Complex(..) => return None,
                    c if c.is_numeric() => to_rational(c),
                    _ => return None,
                };
                round_rational(k, &value).map(Constant::Float)
            }
            k if k.is_complex() => {
                if !self.is_numeric() {
                    return None;
                }
                let part = if k == Kind::Complex64 {
                    Kind::Float32
                } else {
                    Kind::Float64
                };
                let (re, im) = to_complex(self);
                Some(Constant::Complex(
                    round_rational(part, &re)?,
                    round_rational(part, &im)?,
                ))
            }
            _ => None,
        }
    }

    /// Explicit constant conversion to basic kind `kind`. Adds the
    /// integer-to-string rule to [`Constant::representable`]: a code point
    /// becomes its UTF-8 encoding, invalid code points become U+FFFD.
    pub fn convert(&self, kind: Kind) -> Option<Constant> {
        if kind == Kind::String {
            if let Constant::Int(i) = self {
                let ch = i
                    .to_u32()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                return Some(Constant::string(ch.to_string().as_bytes()));
            }
        }
        self.representable(kind)
    }

    /// Materialize the constant as a runtime value of basic type `ty`.
    pub fn materialize(&self, ty: &Type) -> Option<RtValue> {
        let kind = ty.kind();
        let value = self.representable(kind)?;
        Some(match value {
            Constant::Bool(b) => RtValue::bool_of(ty, b),
            Constant::Str(bytes) => RtValue::string_of(ty, &bytes),
            Constant::Int(i) if kind.is_signed_int() => RtValue::int_of(ty, i.to_i64()?),
            Constant::Int(i) => RtValue::uint_of(ty, i.to_u64()?),
            Constant::Float(r) => RtValue::float_of(ty, r.to_f64()?),
            Constant::Complex(re, im) => RtValue::complex_of(ty, re.to_f64()?, im.to_f64()?),
        })
    }

    /// Read a runtime value of basic kind back as a constant.
    pub fn from_value(value: &RtValue) -> Option<Constant> {
        let repr = value.repr().clone();
        match repr {
            Repr::Bool(b) => Some(Constant::Bool(b)),
            Repr::Int(i) => Some(Constant::int(i)),
            Repr::Uint(u) => Some(Constant::int(u)),
            Repr::Float(f) => Constant::float(f),
            Repr::Complex(re, im) => Some(Constant::Complex(
                BigRational::from_float(re)?,
                BigRational::from_float(im)?,
            )),
            Repr::Str(bytes) => Some(Constant::Str(bytes)),
            _ => None,
        }
    }
}

fn int_binary(x: &Constant, op: BinaryOp, y: &Constant) -> Option<Result<Constant, ConstError>> {
    let (Constant::Int(a), Constant::Int(b)) = (x, y) else {
        return None;
    };
    let divisor_zero = matches!(op, BinaryOp::Div | BinaryOp::Rem) && b.is_zero();
    if divisor_zero {
        return Some(Err(ConstError::DivisionByZero));
    }
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        BinaryOp::AndNot => a & !b,
        _ => return None,
    };
    Some(Ok(Constant::Int(value)))
}

fn float_binary(
    a: &BigRational,
    op: BinaryOp,
    b: &BigRational,
) -> Option<Result<Constant, ConstError>> {
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div if b.is_zero() => return Some(Err(ConstError::DivisionByZero)),
        BinaryOp::Div => a / b,
        _ => return None,
    };
    Some(Ok(Constant::Float(value)))
}

fn complex_binary(
    (ar, ai): &(BigRational, BigRational),
    op: BinaryOp,
    (br, bi): &(BigRational, BigRational),
) -> Option<Result<Constant, ConstError>> {
    let (re, im) = match op {
        BinaryOp::Add => (ar + br, ai + bi),
        BinaryOp::Sub => (ar - br, ai - bi),
        BinaryOp::Mul => (ar * br - ai * bi, ar * bi + ai * br),
        BinaryOp::Div => {
            let denom = br * br + bi * bi;
            if denom.is_zero() {
                return Some(Err(ConstError::DivisionByZero));
            }
            ((ar * br + ai * bi) / &denom, (ai * br - ar * bi) / &denom)
        }
        _ => return None,
    };
    Some(Ok(Constant::Complex(re, im)))
}

/// Round a rational to the precision of float kind `kind`; `None` when
/// the rounded value is not finite.
fn round_rational(kind: Kind, value: &BigRational) -> Option<BigRational> {
    let rounded = round_float(kind, value.to_f64()?);
    if !rounded.is_finite() {
        return None;
    }
    BigRational::from_float(rounded)
}

fn parse_int(text: &str) -> Result<BigInt, ConstError> {
    let malformed = || ConstError::Malformed(text.to_string());
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let (radix, body) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
        _ => (10, digits.as_str()),
    };
    if body.is_empty() {
        return Err(malformed());
    }
    BigInt::from_str_radix(body, radix).map_err(|_| malformed())
}

/// Decimal literal (`1.5`, `.5e3`, `1e-9`, `012`) as an exact rational.
fn parse_decimal(text: &str) -> Result<BigRational, ConstError> {
    let malformed = || ConstError::Malformed(text.to_string());
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let (mantissa, exponent) = match cleaned.find(|c| c == 'e' || c == 'E') {
        Some(at) => {
            let exp: i64 = cleaned[at + 1..].parse().map_err(|_| malformed())?;
            (&cleaned[..at], exp)
        }
        None => (cleaned.as_str(), 0),
    };
    let (whole, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{whole}{frac}");
    if digits.is_empty() {
        return Err(malformed());
    }
    let numer = BigInt::from_str_radix(&digits, 10).map_err(|_| malformed())?;
    let frac_len = i64::try_from(frac.len()).map_err(|_| malformed())?;
    let scale = exponent - frac_len;
    let magnitude = u32::try_from(scale.unsigned_abs())
        .ok()
        .filter(|&m| m <= MAX_EXPONENT)
        .ok_or_else(malformed)?;
    let power = num_traits::pow(BigInt::from(10), magnitude as usize);
    Ok(if scale >= 0 {
        BigRational::from_integer(numer * power)
    } else {
        BigRational::new(numer, power)
    })
}

fn write_rational(f: &mut fmt::Formatter<'_>, r: &BigRational) -> fmt::Result {
    if r.is_integer() {
        write!(f, "{}", r.numer())
    } else if let Some(exact) = short_decimal(r) {
        f.write_str(&exact)
    } else {
        write!(f, "{}/{}", r.numer(), r.denom())
    }
}

/// Decimal text for rationals whose denominator divides a small power of
/// ten (`0.25`, `-1.5`).
fn short_decimal(r: &BigRational) -> Option<String> {
    let ten = BigInt::from(10);
    let mut scale = BigInt::one();
    for places in 1..=18usize {
        scale *= &ten;
        if (&scale % r.denom()).is_zero() {
            let scaled = (r.numer() * &scale) / r.denom();
            let sign = if scaled.is_negative() { "-" } else { "" };
            let digits = scaled.abs().to_string();
            let padded = format!("{digits:0>width$}", width = places + 1);
            let (int_part, frac_part) = padded.split_at(padded.len() - places);
            return Some(format!("{sign}{int_part}.{frac_part}"));
        }
    }
    None
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(b) => write!(f, "{b}"),
            Constant::Str(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Constant::Int(i) => write!(f, "{i}"),
            Constant::Float(r) => write_rational(f, r),
            Constant::Complex(re, im) => {
                f.write_str("(")?;
                write_rational(f, re)?;
                f.write_str(" + ")?;
                write_rational(f, im)?;
                f.write_str("i)")
            }
        }
    }
}

#[cfg(test)]
mod tests;
