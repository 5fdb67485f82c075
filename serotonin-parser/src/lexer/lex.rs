//! A lexer for serotonin implemented using [`logos`](https://crates.io/crates/logos).
//!
//! Since the language is so simple a lexer can almost completely parse it.
//! The only things left to the parser are nested quotations and attaching
//! macro inputs to their macro names.
use std::ops::Range;

use lasso::Rodeo;
use logos::Logos;
use num::{BigInt, ToPrimitive};

use crate::{Span, Token};

use super::{
    token::{TokenData, TokenKind},
    TokenizerError,
};

/// The set of characters a Brainfuck block may contain.
pub const BF_INSTRUCTIONS: &str = "+-<>[].,";

pub fn lex(input: &str, file_id: usize, rodeo: &mut Rodeo) -> (Vec<Token>, Vec<TokenizerError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (kind, range) in TokenKind::lexer(input).spanned() {
        let slice = &input[range.clone()];

        match create_token(kind, range, slice, file_id, rodeo) {
            Ok(token) => tokens.push(token),
            Err(error) => errors.push(error),
        }
    }

    (tokens, errors)
}

fn create_token(
    kind: TokenKind,
    range: Range<usize>,
    slice: &str,
    file_id: usize,
    rodeo: &mut Rodeo,
) -> Result<Token, TokenizerError> {
    let span = Span::from_range(range, file_id);

    let data: TokenData = match kind {
        TokenKind::Error => return Err(unknown_token(slice, span)),
        TokenKind::Integer => TokenData::Byte(lex_integer(slice, span)?),
        TokenKind::HexInteger => TokenData::Byte(lex_hex(slice, span)?),
        TokenKind::String => {
            no_newlines(slice, span)?;
            let slice = &unescape(slice, span)?;
            ascii_only(slice, span)?;

            TokenData::String(rodeo.get_or_intern(slice))
        }
        TokenKind::Char => TokenData::Byte(lex_char(trim(slice), span)?),
        TokenKind::Brainfuck => {
            let cleaned = lex_brainfuck(trim(slice), span)?;

            TokenData::String(rodeo.get_or_intern(&cleaned))
        }
        // Macro inputs are passed to their handler verbatim
        TokenKind::MacroInput => TokenData::String(rodeo.get_or_intern(trim(slice))),
        TokenKind::NamedByte | TokenKind::NamedQuotation | TokenKind::Identifier => {
            TokenData::String(rodeo.get_or_intern(slice))
        }
        _ => TokenData::None,
    };

    Ok(Token::new(kind, span, rodeo.get_or_intern(slice), data))
}

/// An `Error` token is almost always the opening character of an
/// unterminated delimited token.
fn unknown_token(slice: &str, span: Span) -> TokenizerError {
    match slice.chars().next() {
        Some('"') => TokenizerError::UnterminatedString(span),
        Some('\'') => TokenizerError::UnterminatedChar(span),
        Some('`') => TokenizerError::UnterminatedBrainfuck(span),
        Some('{') => TokenizerError::UnterminatedBrace(span),
        _ => TokenizerError::UnknownToken(span),
    }
}

/// Parses an integer that matches "[+-]?[0-9]+"
fn lex_integer(slice: &str, span: Span) -> Result<u8, TokenizerError> {
    // We cannot represent negative numbers. Suggest the additive inverse instead
    if let Some(rest) = slice.strip_prefix('-') {
        let inner = Span::new(span.start() + 1, span.end(), span.file_id());
        return match lex_integer(rest, inner) {
            Ok(magnitude) => {
                let n = if magnitude == 0 {
                    0
                } else {
                    (256 - magnitude as i16) as u8
                };

                Err(TokenizerError::NegativeInteger(span, n))
            }
            Err(TokenizerError::LargeInteger(_, n)) => Err(TokenizerError::LargeInteger(span, n)),
            Err(e) => Err(e),
        };
    }

    let slice = slice.strip_prefix('+').unwrap_or(slice);

    match slice.parse::<u8>() {
        Ok(n) => Ok(n),
        Err(_) => {
            // Too large: we can only store a single byte
            match BigInt::parse_bytes(slice.as_bytes(), 10) {
                Some(b) => {
                    let remainder: BigInt = b % 256;
                    Err(TokenizerError::LargeInteger(
                        span,
                        remainder.to_u8().unwrap(),
                    ))
                }
                None => Err(TokenizerError::ICEValidIntegerFailed(span)),
            }
        }
    }
}

/// Parses a hex integer that matches "[+-]?0[xX][0-9a-fA-F]+"
fn lex_hex(slice: &str, span: Span) -> Result<u8, TokenizerError> {
    // We cannot represent negative numbers. Suggest the additive inverse instead
    if let Some(rest) = slice.strip_prefix('-') {
        let inner = Span::new(span.start() + 1, span.end(), span.file_id());
        return match lex_hex(rest, inner) {
            Ok(magnitude) => {
                let n = if magnitude == 0 {
                    0
                } else {
                    (256 - magnitude as i16) as u8
                };

                Err(TokenizerError::NegativeHex(span, n))
            }
            Err(TokenizerError::LargeHex(_, n)) => Err(TokenizerError::LargeHex(span, n)),
            Err(e) => Err(e),
        };
    }

    let slice = slice.strip_prefix('+').unwrap_or(slice);
    let slice = &slice[2..]; // trim "0x" or "0X"

    match u8::from_str_radix(slice, 16) {
        Ok(n) => Ok(n),
        Err(_) => match BigInt::parse_bytes(slice.as_bytes(), 16) {
            Some(b) => {
                let remainder: BigInt = b % 256;
                Err(TokenizerError::LargeHex(span, remainder.to_u8().unwrap()))
            }
            None => Err(TokenizerError::ICEValidHexFailed(span)),
        },
    }
}

/// Decodes the contents of a character literal. Escapes are decoded by
/// hand: unlike strings, single quoted text is taken literally by
/// snailquote.
fn lex_char(content: &str, span: Span) -> Result<u8, TokenizerError> {
    if content.is_empty() {
        return Err(TokenizerError::EmptyCharLiteral(span));
    }

    if let Some(escape) = content.strip_prefix('\\') {
        return match escape {
            "n" => Ok(b'\n'),
            "r" => Ok(b'\r'),
            "t" => Ok(b'\t'),
            "0" => Ok(0),
            "\\" => Ok(b'\\'),
            "'" => Ok(b'\''),
            "\"" => Ok(b'"'),
            _ => match escape.strip_prefix('x') {
                Some(hex) if hex.len() == 2 => u8::from_str_radix(hex, 16)
                    .map_err(|_| TokenizerError::InvalidCharEscape(span)),
                _ => Err(TokenizerError::InvalidCharEscape(span)),
            },
        };
    }

    let mut bytes = content.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b), None) if b.is_ascii() => Ok(b),
        _ => Err(TokenizerError::WideCharLiteral(span)),
    }
}

/// Validates a Brainfuck block and strips the whitespace out of it.
fn lex_brainfuck(content: &str, span: Span) -> Result<String, TokenizerError> {
    for c in content.chars() {
        if !BF_INSTRUCTIONS.contains(c) && !c.is_whitespace() {
            return Err(TokenizerError::InvalidBrainfuck(span, c));
        }
    }

    Ok(content.chars().filter(|c| !c.is_whitespace()).collect())
}

/// Trim the delimiters off a String, Char, Brainfuck, or MacroInput slice
fn trim(slice: &str) -> &str {
    debug_assert!(slice.len() >= 2);
    &slice[1..slice.len() - 1]
}

/// Validate a string does not contain any newlines
fn no_newlines(slice: &str, span: Span) -> Result<(), TokenizerError> {
    match slice
        .char_indices()
        .find_map(|(i, c)| if c == '\n' { Some(i) } else { None })
    {
        Some(i) => {
            let newline = Span::new(span.start() + i, span.start() + i + 1, span.file_id());
            Err(TokenizerError::NewlineInString(span, newline))
        }
        None => Ok(()),
    }
}

/// Unescape a string using the snailquote crate
fn unescape(slice: &str, span: Span) -> Result<String, TokenizerError> {
    snailquote::unescape(slice)
        .map_err(|e| TokenizerError::InvalidEscapeSequence(span, e.to_string()))
}

/// Validate a string only contains ascii characters
fn ascii_only(slice: &str, span: Span) -> Result<(), TokenizerError> {
    for (i, c) in slice.chars().enumerate() {
        if !c.is_ascii() {
            let char = Span::new(span.start() + i, span.start() + i, span.file_id());
            return Err(TokenizerError::NonAsciiString(span, char));
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use lasso::Rodeo;
    use logos::Logos;
    use proptest::prelude::*;

    use crate::{
        lexer::{
            lex::{lex, lex_char, lex_integer},
            token::{TokenData, TokenKind},
            TokenizerError,
        },
        Span,
    };

    proptest! {
        // Verifies integers can be parsed any size, and optionally signed
        #[test]
        fn test_integer(s in "[+-]?[0-9]+") {
            let mut lexer = TokenKind::lexer(&s);
            assert_eq!(lexer.next(), Some(TokenKind::Integer));
            assert_eq!(lexer.next(), None);
        }

        // Negative integers should tokenize but will emit an error
        #[test]
        fn test_negative_integer(s in "-[0-9]{1,2}") {
            let mut lexer = TokenKind::lexer(&s);
            assert_eq!(lexer.next(), Some(TokenKind::Integer));
            let span = Span::from_range(lexer.span(), 0);
            let slice = lexer.slice();
            assert_eq!(lexer.next(), None);

            let err = lex_integer(slice, span).unwrap_err();
            assert!(matches!(err, TokenizerError::NegativeInteger(..)));
        }

        // Large integers should tokenize but will emit an error with the value mod 256
        #[test]
        fn test_large_integer(n in 256u64..100_000) {
            let s = n.to_string();
            let span = Span::new(0, s.len(), 0);

            let err = lex_integer(&s, span).unwrap_err();
            let TokenizerError::LargeInteger(_, modulo) = err else {
                panic!("Expected a large integer error");
            };
            assert_eq!(modulo, (n % 256) as u8);
        }

        // Verifies hex can be parsed any size, and optionally signed
        #[test]
        fn test_hex(s in "[+-]?0[xX][0-9a-fA-F]+") {
            let mut lexer = TokenKind::lexer(&s);
            assert_eq!(lexer.next(), Some(TokenKind::HexInteger));
            assert_eq!(lexer.next(), None);
        }
    }

    #[test]
    fn test_char_literals() {
        let span = Span::new(0, 0, 0);

        assert_eq!(lex_char("y", span), Ok(b'y'));
        assert_eq!(lex_char("\\n", span), Ok(b'\n'));
        assert_eq!(lex_char("\\t", span), Ok(b'\t'));
        assert_eq!(lex_char("\\\\", span), Ok(b'\\'));
        assert_eq!(lex_char("\\'", span), Ok(b'\''));
        assert_eq!(lex_char("\\\"", span), Ok(b'"'));
        assert_eq!(lex_char("\\0", span), Ok(0));
        assert_eq!(lex_char("\\x41", span), Ok(b'A'));

        assert!(matches!(
            lex_char("", span),
            Err(TokenizerError::EmptyCharLiteral(_))
        ));
        assert!(matches!(
            lex_char("ab", span),
            Err(TokenizerError::WideCharLiteral(_))
        ));
        assert!(matches!(
            lex_char("\\q", span),
            Err(TokenizerError::InvalidCharEscape(_))
        ));
    }

    #[test]
    fn test_brainfuck_whitespace() {
        let mut rodeo = Rodeo::default();
        let (tokens, errors) = lex("`[ -  ] <`", 0, &mut rodeo);

        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        let spur = tokens[0].data().unwrap_string();
        assert_eq!(rodeo.resolve(&spur), "[-]<");
    }

    #[test]
    fn test_brainfuck_invalid() {
        let mut rodeo = Rodeo::default();
        let (_, errors) = lex("`[-]x`", 0, &mut rodeo);

        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            TokenizerError::InvalidBrainfuck(_, 'x')
        ));
    }

    #[test]
    fn test_definition_stream() {
        let mut rodeo = Rodeo::default();
        let (tokens, errors) = lex("main == 2 0x10 'a' \"hi\" pop; # comment", 0, &mut rodeo);

        assert!(errors.is_empty());
        let kinds: Vec<_> = tokens
            .iter()
            .map(|t| t.kind())
            .filter(|k| !k.is_trivia())
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Substitution,
                TokenKind::Integer,
                TokenKind::HexInteger,
                TokenKind::Char,
                TokenKind::String,
                TokenKind::Identifier,
                TokenKind::Semicolon,
            ]
        );

        assert_eq!(tokens[4].data(), &TokenData::Byte(2));
        assert_eq!(tokens[6].data(), &TokenData::Byte(0x10));
        assert_eq!(tokens[8].data(), &TokenData::Byte(b'a'));
    }

    #[test]
    fn test_unterminated_string() {
        let mut rodeo = Rodeo::default();
        let (_, errors) = lex("\"abc", 0, &mut rodeo);

        assert!(errors
            .iter()
            .any(|e| matches!(e, TokenizerError::UnterminatedString(_))));
    }
}
