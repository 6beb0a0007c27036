//! Escape processing for rune and interpreted string literals.
//!
//! Byte escapes (`\x41`, `\101`) produce a single raw byte inside strings,
//! so string literals cook to bytes rather than `String`.

use std::str::Chars;

use crate::lex_error::LexErrorKind;

/// Which quote delimits the literal; decides whether `\'` or `\"` is legal.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Quote {
    Rune,
    String,
}

enum Decoded {
    Byte(u8),
    Char(char),
}

fn take_digits(chars: &mut Chars<'_>, count: usize, radix: u32) -> Result<u32, LexErrorKind> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or(LexErrorKind::UnknownEscape)?;
        value = value * radix + digit;
    }
    Ok(value)
}

/// Decode the escape following a backslash.
fn decode_escape(chars: &mut Chars<'_>, quote: Quote) -> Result<Decoded, LexErrorKind> {
    let c = chars.next().ok_or(LexErrorKind::UnknownEscape)?;
    let simple = match c {
        'a' => Some('\u{7}'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{b}'),
        '\\' => Some('\\'),
        '\'' if quote == Quote::Rune => Some('\''),
        '"' if quote == Quote::String => Some('"'),
        _ => None,
    };
    if let Some(ch) = simple {
        return Ok(Decoded::Char(ch));
    }
    match c {
        '0'..='7' => {
            let rest = take_digits(chars, 2, 8)?;
            let value = (c as u32 - '0' as u32) * 64 + rest;
            u8::try_from(value)
                .map(Decoded::Byte)
                .map_err(|_| LexErrorKind::OctalOutOfRange)
        }
        'x' => {
            let value = take_digits(chars, 2, 16)?;
            u8::try_from(value)
                .map(Decoded::Byte)
                .map_err(|_| LexErrorKind::UnknownEscape)
        }
        'u' | 'U' => {
            let width = if c == 'u' { 4 } else { 8 };
            let value = take_digits(chars, width, 16)?;
            char::from_u32(value)
                .map(Decoded::Char)
                .ok_or(LexErrorKind::InvalidCodePoint)
        }
        _ => Err(LexErrorKind::UnknownEscape),
    }
}

/// Cook the content between the quotes of a rune literal.
pub(crate) fn unquote_rune(content: &str) -> Result<u32, LexErrorKind> {
    let mut chars = content.chars();
    let value = match chars.next() {
        None => return Err(LexErrorKind::EmptyRune),
        Some('\\') => match decode_escape(&mut chars, Quote::Rune)? {
            Decoded::Byte(b) => u32::from(b),
            Decoded::Char(c) => c as u32,
        },
        Some(c) => c as u32,
    };
    if chars.next().is_some() {
        return Err(LexErrorKind::MultiCharRune);
    }
    Ok(value)
}

/// Cook the content between the quotes of an interpreted string literal.
pub(crate) fn unquote_string(content: &str) -> Result<Vec<u8>, LexErrorKind> {
    if !content.contains('\\') {
        return Ok(content.as_bytes().to_vec());
    }
    let mut out = Vec::with_capacity(content.len());
    let mut chars = content.chars();
    let mut buf = [0u8; 4];
    while let Some(c) = chars.next() {
        if c == '\\' {
            match decode_escape(&mut chars, Quote::String)? {
                Decoded::Byte(b) => out.push(b),
                Decoded::Char(ch) => out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes()),
            }
        } else {
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    Ok(out)
}

/// Raw strings drop carriage returns and keep everything else verbatim.
pub(crate) fn unquote_raw(content: &str) -> Vec<u8> {
    content.bytes().filter(|&b| b != b'\r').collect()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_escapes() {
        assert_eq!(unquote_string(r"a\tb\n").unwrap(), b"a\tb\n".to_vec());
        assert_eq!(unquote_string(r#"\"q\""#).unwrap(), b"\"q\"".to_vec());
    }

    #[test]
    fn byte_escapes_are_raw_bytes() {
        assert_eq!(unquote_string(r"\xff\101").unwrap(), vec![0xff, b'A']);
    }

    #[test]
    fn unicode_escapes_encode_utf8() {
        assert_eq!(unquote_string(r"é").unwrap(), "é".as_bytes().to_vec());
        assert_eq!(unquote_rune(r"\U0001F600").unwrap(), 0x1F600);
    }

    #[test]
    fn quote_escapes_depend_on_literal() {
        assert_eq!(unquote_rune(r"\'").unwrap(), u32::from(b'\''));
        assert_eq!(unquote_rune(r#"\""#), Err(LexErrorKind::UnknownEscape));
        assert_eq!(unquote_string(r"\'"), Err(LexErrorKind::UnknownEscape));
    }

    #[test]
    fn rune_errors() {
        assert_eq!(unquote_rune(""), Err(LexErrorKind::EmptyRune));
        assert_eq!(unquote_rune("ab"), Err(LexErrorKind::MultiCharRune));
        assert_eq!(unquote_rune(r"\400"), Err(LexErrorKind::OctalOutOfRange));
        assert_eq!(unquote_rune(r"\ud800"), Err(LexErrorKind::InvalidCodePoint));
    }

    #[test]
    fn raw_strings_drop_carriage_returns() {
        assert_eq!(unquote_raw("a\r\nb\\n"), b"a\nb\\n".to_vec());
    }
}
