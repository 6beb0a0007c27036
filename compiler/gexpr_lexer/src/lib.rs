//! Lexer for gexpr expressions using logos.
//!
//! Produces a [`TokenList`] terminated by EOF plus any [`LexError`]s. Bad
//! input becomes a [`TokenKind::Error`] token so the parser can still point
//! at the offending span.

mod cook_escape;
mod lex_error;

use gexpr_ir::{Span, Token, TokenKind, TokenList};
use logos::Logos;

pub use lex_error::{LexError, LexErrorKind};

/// Raw token from logos, before literal cooking.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[token("chan")]
    Chan,
    #[token("func")]
    Func,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("struct")]
    Struct,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AmpCaret,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<-")]
    Arrow,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("!")]
    Bang,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    Float,

    #[regex(r"[0-9][0-9_]*i")]
    #[regex(r"0[xX][0-9a-fA-F_]+i")]
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?i")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+i")]
    Imag,

    #[regex(r"'([^'\\\n]|\\'|\\[^'\n]+)'")]
    Char,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,

    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,
}

/// Tokens plus every error found while lexing.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

/// Lex an expression source.
pub fn lex(source: &str) -> LexOutput {
    let mut output = LexOutput::default();
    let Ok(eof) = u32::try_from(source.len()) else {
        output
            .errors
            .push(LexError::new(LexErrorKind::SourceTooLarge, Span::DUMMY));
        output.tokens.push(Token::new(TokenKind::Eof, Span::DUMMY));
        return output;
    };

    let mut logos = RawToken::lexer(source);
    while let Some(result) = logos.next() {
        let range = logos.span();
        let span = Span::try_from_range(range.clone()).unwrap_or(Span::point(eof));
        let slice = logos.slice();
        let kind = match result {
            Ok(RawToken::LineComment | RawToken::BlockComment) => continue,
            Ok(raw) => match cook(raw, slice) {
                Ok(kind) => kind,
                Err(kind) => {
                    output.errors.push(LexError::new(kind, span));
                    TokenKind::Error
                }
            },
            Err(()) => {
                let bad = source[range].chars().next().unwrap_or('\0');
                let kind = match bad {
                    '\'' => LexErrorKind::UnterminatedRune,
                    '"' | '`' => LexErrorKind::UnterminatedString,
                    c => LexErrorKind::InvalidChar(c),
                };
                output.errors.push(LexError::new(kind, span));
                TokenKind::Error
            }
        };
        output.tokens.push(Token::new(kind, span));
    }
    output.tokens.push(Token::new(TokenKind::Eof, Span::point(eof)));
    output
}

/// Turn a raw token into a [`TokenKind`], cooking literal payloads.
fn cook(raw: RawToken, slice: &str) -> Result<TokenKind, LexErrorKind> {
    Ok(match raw {
        RawToken::Int => TokenKind::Int(check_separators(slice)?),
        RawToken::Float => TokenKind::Float(check_separators(slice)?),
        RawToken::Imag => TokenKind::Imag(check_separators(slice)?),
        RawToken::Char => TokenKind::Char(cook_escape::unquote_rune(&slice[1..slice.len() - 1])?),
        RawToken::String => {
            TokenKind::String(cook_escape::unquote_string(&slice[1..slice.len() - 1])?)
        }
        RawToken::RawString => TokenKind::String(cook_escape::unquote_raw(&slice[1..slice.len() - 1])),
        RawToken::Ident => TokenKind::Ident(slice.to_string()),
        RawToken::Chan => TokenKind::Chan,
        RawToken::Func => TokenKind::Func,
        RawToken::Interface => TokenKind::Interface,
        RawToken::Map => TokenKind::Map,
        RawToken::Struct => TokenKind::Struct,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::AmpCaret => TokenKind::AmpCaret,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Bang => TokenKind::Bang,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::LineComment | RawToken::BlockComment => TokenKind::Error,
    })
}

/// Every `_` in a number must sit between two digits (or after a base prefix).
fn check_separators(text: &str) -> Result<String, LexErrorKind> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let prev_ok = i > 0
            && (bytes[i - 1].is_ascii_hexdigit()
                || (i == 2 && bytes[0] == b'0' && bytes[1].is_ascii_alphabetic()));
        let next_ok = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit);
        if !prev_ok || !next_ok {
            return Err(LexErrorKind::BadDigitSeparator);
        }
    }
    Ok(text.to_string())
}
