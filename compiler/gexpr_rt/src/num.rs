//! Fixed-width integer helpers.

/// Wrap `value` to a signed integer of `bits` width (two's complement).
#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is sign-extended from `bits` first, so it fits in i64"
)]
pub fn wrap_signed(value: i128, bits: u32) -> i64 {
    let shift = 128 - bits.clamp(1, 64);
    ((value << shift) >> shift) as i64
}

/// Wrap `value` to an unsigned integer of `bits` width.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "truncation to the low bits is the wrapping being performed"
)]
pub fn wrap_unsigned(value: i128, bits: u32) -> u64 {
    let low = value as u64;
    if bits >= 64 {
        low
    } else {
        low & ((1u64 << bits) - 1)
    }
}

/// Inclusive bounds of an integer kind of `bits` width.
pub fn int_bounds(signed: bool, bits: u32) -> (i128, i128) {
    let bits = bits.clamp(1, 64);
    if signed {
        (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
    } else {
        (0, (1i128 << bits) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{int_bounds, wrap_signed, wrap_unsigned};
    use pretty_assertions::assert_eq;

    #[test]
    fn signed_wraps_to_width() {
        assert_eq!(wrap_signed(128, 8), -128);
        assert_eq!(wrap_signed(-129, 8), 127);
        assert_eq!(wrap_signed(255, 8), -1);
        assert_eq!(wrap_signed(i128::from(i64::MAX) + 1, 64), i64::MIN);
        assert_eq!(wrap_signed(40_000, 16), 40_000 - 65_536);
    }

    #[test]
    fn unsigned_wraps_to_width() {
        assert_eq!(wrap_unsigned(256, 8), 0);
        assert_eq!(wrap_unsigned(-1, 8), 255);
        assert_eq!(wrap_unsigned(-1, 64), u64::MAX);
        assert_eq!(wrap_unsigned(70_000, 16), 70_000 - 65_536);
    }

    #[test]
    fn bounds() {
        assert_eq!(int_bounds(true, 8), (-128, 127));
        assert_eq!(int_bounds(false, 8), (0, 255));
        assert_eq!(int_bounds(false, 64), (0, i128::from(u64::MAX)));
        assert_eq!(int_bounds(true, 64), (i128::from(i64::MIN), i128::from(i64::MAX)));
    }
}
