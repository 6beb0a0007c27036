use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn lit_int(text: &str) -> Result<Constant, ConstError> {
    Constant::from_literal(&Literal::Int(text.to_string()))
}

fn lit_float(text: &str) -> Result<Constant, ConstError> {
    Constant::from_literal(&Literal::Float(text.to_string()))
}

fn ratio(n: i64, d: i64) -> Constant {
    Constant::Float(BigRational::new(BigInt::from(n), BigInt::from(d)))
}

// Literals

#[test]
fn integer_literal_forms() {
    let cases = [
        ("42", 42),
        ("1_000", 1000),
        ("0x_Ff", 255),
        ("0o17", 15),
        ("017", 15),
        ("0b101", 5),
        ("0", 0),
    ];
    for (text, value) in cases {
        assert_eq!(lit_int(text), Ok(Constant::int(value)), "{text}");
    }
    assert!(lit_int("09").is_err());
}

#[test]
fn float_literals_are_exact() {
    assert_eq!(lit_float("1.5"), Ok(ratio(3, 2)));
    assert_eq!(lit_float(".25"), Ok(ratio(1, 4)));
    assert_eq!(lit_float("1e3"), Ok(ratio(1000, 1)));
    assert_eq!(lit_float("2.5e-1"), Ok(ratio(1, 4)));
    assert_eq!(lit_float("1."), Ok(ratio(1, 1)));
}

#[test]
fn imaginary_and_rune_literals() {
    let imag = Constant::from_literal(&Literal::Imag("2.5i".to_string()));
    assert_eq!(
        imag,
        Ok(Constant::Complex(BigRational::zero(), BigRational::new(5.into(), 2.into())))
    );
    let legacy = Constant::from_literal(&Literal::Imag("012i".to_string()));
    assert_eq!(
        legacy,
        Ok(Constant::Complex(BigRational::zero(), BigRational::from_integer(12.into())))
    );
    assert_eq!(Constant::from_literal(&Literal::Char(u32::from('a'))), Ok(Constant::int(97)));
}

// Arithmetic

#[test]
fn untyped_integer_division_truncates() {
    let q = Constant::binary(&Constant::int(7), BinaryOp::Div, &Constant::int(-2));
    assert_eq!(q, Ok(Constant::int(-3)));
    let r = Constant::binary(&Constant::int(-7), BinaryOp::Rem, &Constant::int(2));
    assert_eq!(r, Ok(Constant::int(-1)));
}

#[test]
fn promotion_to_float_and_complex() {
    let half = Constant::binary(&Constant::int(1), BinaryOp::Div, &ratio(2, 1));
    assert_eq!(half, Ok(ratio(1, 2)));
    let imag_unit = Constant::Complex(BigRational::zero(), BigRational::one());
    let squared = Constant::binary(&imag_unit, BinaryOp::Mul, &imag_unit);
    assert_eq!(
        squared,
        Ok(Constant::Complex(BigRational::from_integer((-1).into()), BigRational::zero()))
    );
}

#[test]
fn division_by_zero() {
    for divisor in [Constant::int(0), ratio(0, 1)] {
        let result = Constant::binary(&Constant::int(1), BinaryOp::Div, &divisor);
        assert_eq!(result, Err(ConstError::DivisionByZero));
    }
    assert_eq!(
        Constant::binary(&Constant::int(1), BinaryOp::Rem, &Constant::int(0)),
        Err(ConstError::DivisionByZero)
    );
}

#[test]
fn bitwise_on_negative_integers() {
    let and_not = Constant::binary(&Constant::int(-1), BinaryOp::AndNot, &Constant::int(6));
    assert_eq!(and_not, Ok(Constant::int(-7)));
    assert_eq!(Constant::unary(UnaryOp::BitNot, &Constant::int(5)), Ok(Constant::int(-6)));
}

#[test]
fn operator_applicability() {
    assert!(Constant::binary(&ratio(1, 2), BinaryOp::Rem, &ratio(1, 3)).is_err());
    assert!(Constant::binary(&Constant::string(b"a"), BinaryOp::Sub, &Constant::string(b"b")).is_err());
    assert!(matches!(
        Constant::binary(&Constant::string(b"a"), BinaryOp::Add, &Constant::int(1)),
        Err(ConstError::MismatchedKinds { .. })
    ));
    assert_eq!(
        Constant::binary(&Constant::string(b"ab"), BinaryOp::Add, &Constant::string(b"c")),
        Ok(Constant::string(b"abc"))
    );
    assert!(Constant::unary(UnaryOp::Not, &Constant::int(1)).is_err());
    assert!(Constant::unary(UnaryOp::BitNot, &ratio(1, 2)).is_err());
}

#[test]
fn shifts() {
    assert_eq!(Constant::shift(&Constant::int(1), BinaryOp::Shl, 100), Ok(Constant::int(BigInt::one() << 100u32)));
    assert_eq!(Constant::shift(&ratio(4, 1), BinaryOp::Shr, 1), Ok(Constant::int(2)));
    assert_eq!(Constant::shift(&Constant::int(-8), BinaryOp::Shr, 1), Ok(Constant::int(-4)));
    assert!(Constant::shift(&ratio(1, 2), BinaryOp::Shl, 1).is_err());
    assert_eq!(
        Constant::shift(&Constant::int(1), BinaryOp::Shl, 5000),
        Err(ConstError::ShiftTooLarge(5000))
    );
}

#[test]
fn comparisons() {
    assert_eq!(Constant::compare(&Constant::int(1), BinaryOp::Lt, &ratio(3, 2)), Ok(true));
    assert_eq!(
        Constant::compare(&Constant::string(b"abc"), BinaryOp::GtEq, &Constant::string(b"abd")),
        Ok(false)
    );
    assert_eq!(
        Constant::compare(&Constant::Bool(true), BinaryOp::NotEq, &Constant::Bool(false)),
        Ok(true)
    );
    assert!(Constant::compare(&Constant::Bool(true), BinaryOp::Lt, &Constant::Bool(false)).is_err());
    let c = Constant::Complex(BigRational::one(), BigRational::one());
    assert_eq!(Constant::compare(&c, BinaryOp::Eq, &c), Ok(true));
    assert!(Constant::compare(&c, BinaryOp::Lt, &c).is_err());
}

// Binding to types

#[test]
fn representability() {
    assert_eq!(Constant::int(127).representable(Kind::Int8), Some(Constant::int(127)));
    assert_eq!(Constant::int(128).representable(Kind::Int8), None);
    assert_eq!(Constant::int(-1).representable(Kind::Uint), None);
    assert_eq!(ratio(4, 2).representable(Kind::Int), Some(Constant::int(2)));
    assert_eq!(ratio(3, 2).representable(Kind::Int), None);
    assert_eq!(Constant::int(1).representable(Kind::String), None);
    assert_eq!(Constant::string(b"x").representable(Kind::String), Some(Constant::string(b"x")));
    assert!(Constant::int(1).representable(Kind::Complex64).is_some());
    let huge = Constant::shift(&Constant::int(1), BinaryOp::Shl, 1000);
    assert_eq!(huge.map(|h| h.representable(Kind::Float32)), Ok(None));
}

#[test]
fn float_representation_is_rounded() {
    let tenth = ratio(1, 10);
    let Some(Constant::Float(rounded)) = tenth.representable(Kind::Float32) else {
        panic!("0.1 is representable as float32");
    };
    assert_ne!(rounded, BigRational::new(1.into(), 10.into()));
    assert_eq!(rounded.to_f64(), Some(f64::from(0.1f32)));
}

#[test]
fn integer_to_string_conversion() {
    assert_eq!(Constant::int(0x4e16).convert(Kind::String), Some(Constant::string("世".as_bytes())));
    assert_eq!(
        Constant::int(-1).convert(Kind::String),
        Some(Constant::string("\u{FFFD}".as_bytes()))
    );
    assert_eq!(Constant::int(65).representable(Kind::String), None);
}

#[test]
fn materialize_and_read_back() {
    let value = Constant::int(-5).materialize(&Type::int16());
    assert_eq!(value.as_ref().map(RtValue::as_i64), Some(-5));
    assert_eq!(value.as_ref().and_then(Constant::from_value), Some(Constant::int(-5)));
    assert!(Constant::int(300).materialize(&Type::uint8()).is_none());
    let s = Constant::string(b"hi").materialize(&Type::named("Name", &Type::string()));
    assert_eq!(s.map(|s| s.ty().to_string()), Some("Name".to_string()));
}

#[test]
fn default_types() {
    assert_eq!(Constant::int(1).default_type(), Type::int());
    assert_eq!(ratio(1, 2).default_type(), Type::float64());
    assert_eq!(Constant::Bool(true).default_type(), Type::bool());
    assert_eq!(Constant::complex(&Constant::int(1), &Constant::int(2)).map(|c| c.default_type()), Some(Type::complex128()));
}

#[test]
fn display() {
    assert_eq!(Constant::int(-12).to_string(), "-12");
    assert_eq!(ratio(-3, 2).to_string(), "-1.5");
    assert_eq!(ratio(1, 3).to_string(), "1/3");
    assert_eq!(ratio(1, 40).to_string(), "0.025");
    assert_eq!(Constant::string(b"a\"b").to_string(), "\"a\\\"b\"");
}

proptest! {
    #[test]
    fn untyped_addition_is_exact(a in any::<i64>(), b in any::<i64>()) {
        let sum = Constant::binary(&Constant::int(a), BinaryOp::Add, &Constant::int(b));
        prop_assert_eq!(sum, Ok(Constant::int(i128::from(a) + i128::from(b))));
    }

    #[test]
    fn representable_round_trips_through_materialize(v in any::<i16>()) {
        let c = Constant::int(v);
        let value = c.materialize(&Type::int16());
        prop_assert_eq!(value.as_ref().and_then(Constant::from_value), c.representable(Kind::Int16));
    }
}
