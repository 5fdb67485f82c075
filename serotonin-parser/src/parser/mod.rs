mod definition;
mod errors;
mod module;
mod stack;

use lasso::{Rodeo, Spur};

use crate::{ast::Definition, ast::Module, Span, Token, TokenKind};

pub use errors::{Expectations, ParseError};

/// Parses a module from a list of tokens.
pub fn parse_module(
    tokens: &[Token],
    file_id: usize,
    name: Spur,
    rodeo: &Rodeo,
) -> Result<Module, ParseError> {
    let mut parser = Parser::new(tokens, file_id, rodeo);
    parser.parse_module(name)
}

/// Parses a single definition. This is helpful for testing.
pub fn parse_definition(tokens: &[Token], rodeo: &Rodeo) -> Result<Definition, ParseError> {
    let mut parser = Parser::new(tokens, 0, rodeo);
    parser.parse_definition()
}

pub(crate) struct Parser<'a> {
    tokens: &'a [Token],
    rodeo: &'a Rodeo,
    index: usize,
    // The start of the current token in the source code
    source_index: usize,
    file_id: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token], file_id: usize, rodeo: &'a Rodeo) -> Self {
        Self {
            tokens,
            rodeo,
            index: 0,
            source_index: 0,
            file_id,
        }
    }

    /// Returns the next token without consuming it
    pub(crate) fn peek(&self) -> Option<Token> {
        self.tokens.get(self.index).cloned()
    }

    /// Returns true if the next token is the given kind
    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek().map(|t| t.kind() == kind).unwrap_or(false)
    }

    /// Returns the next token and consumes it
    pub(crate) fn next(&mut self) -> Option<Token> {
        let next = self.peek()?;
        self.index += 1;
        self.source_index = next.span().end();
        Some(next)
    }

    /// An empty span at the point the parser has consumed up to
    pub(crate) fn eof_span(&self) -> Span {
        Span::new(self.source_index, self.source_index, self.file_id)
    }

    /// Consumes the next token if it matches the expected token
    ///
    /// Errors if the next token was not the expected token
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let next = self.next().ok_or(ParseError::UnexpectedEOF {
            eof: self.eof_span(),
            expected: Expectations::Exactly(kind),
        })?;

        if next.kind() == kind {
            Ok(next)
        } else {
            Err(ParseError::UnexpectedToken {
                found: next,
                expected: Expectations::Exactly(kind),
            })
        }
    }

    /// Consumes the next token if one of the given tokens matches
    pub(crate) fn expect_one_of(&mut self, kinds: &[TokenKind]) -> Result<Token, ParseError> {
        let next = self.next().ok_or(ParseError::UnexpectedEOF {
            eof: self.eof_span(),
            expected: Expectations::OneOf(kinds.to_vec()),
        })?;

        if kinds.contains(&next.kind()) {
            Ok(next)
        } else {
            Err(ParseError::UnexpectedToken {
                found: next,
                expected: Expectations::OneOf(kinds.to_vec()),
            })
        }
    }

    /// Skip all trivia tokens
    pub(crate) fn skip_trivia(&mut self) {
        while let Some(next) = self.peek() {
            if !next.kind().is_trivia() {
                break;
            }

            self.next().unwrap();
        }
    }
}
