use lasso::{Rodeo, Spur};
use logos::Logos;

use crate::Span;

/// A lexed token: its kind, source span, interned text, and any payload
/// the lexer decoded (byte value, unescaped string).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    span: Span,
    spur: Spur,
    data: TokenData,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, spur: Spur, data: TokenData) -> Self {
        Self {
            kind,
            span,
            spur,
            data,
        }
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    #[inline]
    pub fn spur(&self) -> Spur {
        self.spur
    }

    #[inline]
    pub fn data(&self) -> &TokenData {
        &self.data
    }

    pub fn text<'a>(&self, rodeo: &'a Rodeo) -> &'a str {
        rodeo.resolve(&self.spur)
    }
}

/// A token emitted by the lexer.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    #[error]
    Error,

    #[regex(r"[ \t\n\f\r]+")]
    Whitespace,

    // Comments start with a # and go to the end of the line
    #[regex(r"#[^\r\n]*")]
    Comment,

    // Keywords
    #[token("IMPORT")]
    ImportKW,

    // ---- Atoms ----
    // Decimal integer
    #[regex(r"[+-]?[0-9]+", priority = 2)]
    Integer,

    // Hexadecimal integer
    #[regex(r"[+-]?0[xX][0-9a-fA-F]+")]
    HexInteger,

    // String with " "
    #[regex(r#""[^"]*""#)]
    String,

    // Character literal with ' '
    #[regex(r"'[^']*'")]
    Char,

    // Brainfuck block. Backticks with any characters inside. No escaping.
    #[regex(r"`[^`]*`")]
    Brainfuck,

    // Macro input. { } with any characters inside (including newlines). No escaping.
    #[regex(r"\{[^}]*\}")]
    MacroInput,

    // ---- Identifiers ----
    // Almost anything can be an identifier
    // - Identifiers can not start with a digit because that would more closely match a number
    #[regex(r#"[^ \t\n\f\r;#@\?\(\)\[\]\{\}`'"\d][^ \t\n\f\r;#@\?\(\)\[\]\{\}`'"]*"#)]
    Identifier,

    // Single lowercase letter
    #[regex(r"[a-z]", priority = 2)]
    NamedByte,

    // Single uppercase letter
    #[regex(r"[A-Z]", priority = 2)]
    NamedQuotation,

    // Ignored input byte
    #[token("@")]
    UnnamedByte,

    // Ignored input quotation
    #[token("?")]
    UnnamedQuotation,

    // ---- Symbols ----
    #[token("==")]
    Substitution,

    #[token("==?")]
    Generation,

    #[token("==!")]
    Execution,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(";")]
    Semicolon,
}

impl TokenKind {
    /// The tokens that can appear within the body of a definition or a
    /// quotation.
    pub const fn atomics() -> &'static [TokenKind] {
        &[
            TokenKind::Integer,
            TokenKind::HexInteger,
            TokenKind::String,
            TokenKind::Char,
            TokenKind::MacroInput,
            TokenKind::NamedByte,
            TokenKind::NamedQuotation,
            TokenKind::Identifier,
            TokenKind::Brainfuck,
        ]
    }

    pub fn is_atomic(&self) -> bool {
        Self::atomics().contains(self)
    }

    /// The tokens the parser (mostly) ignores.
    pub const fn trivia() -> &'static [TokenKind] {
        &[TokenKind::Whitespace, TokenKind::Comment]
    }

    pub fn is_trivia(&self) -> bool {
        Self::trivia().contains(self)
    }
}

/// Some tokens carry additional information: a decoded byte or an
/// interned string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenData {
    None,
    Byte(u8),
    String(Spur),
}

impl TokenData {
    pub fn is_none(&self) -> bool {
        matches!(self, TokenData::None)
    }

    pub fn is_byte(&self) -> bool {
        matches!(self, TokenData::Byte(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, TokenData::String(_))
    }

    pub fn unwrap_byte(&self) -> u8 {
        match self {
            TokenData::Byte(b) => *b,
            _ => panic!("Called TokenData::unwrap_byte on a non-byte"),
        }
    }

    pub fn unwrap_string(&self) -> Spur {
        match self {
            TokenData::String(s) => *s,
            _ => panic!("Called TokenData::unwrap_string on a non-string"),
        }
    }
}
