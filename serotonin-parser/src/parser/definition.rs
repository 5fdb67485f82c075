use std::rc::Rc;

use crate::{
    ast::{Definition, DefinitionKind, Expression},
    Span, TokenKind,
};

use super::{
    errors::{Expectations, ParseError},
    Parser,
};

impl<'a> Parser<'a> {
    /// `head (stack)? kind body ;`
    pub(crate) fn parse_definition(&mut self) -> Result<Definition, ParseError> {
        self.skip_trivia();

        // Single letter heads would collide with stack pattern names
        let name_token = self.expect_one_of(&[
            TokenKind::Identifier,
            TokenKind::NamedByte,
            TokenKind::NamedQuotation,
        ])?;
        if name_token.kind() != TokenKind::Identifier {
            return Err(ParseError::ReservedName {
                span: name_token.span(),
            });
        }

        self.skip_trivia();
        let stack = if self.peek_is(TokenKind::LParen) {
            Some(self.parse_stack()?)
        } else {
            None
        };

        self.skip_trivia();
        let kind_token = self.expect_one_of(&[
            TokenKind::Substitution,
            TokenKind::Generation,
            TokenKind::Execution,
        ])?;
        let kind = match kind_token.kind() {
            TokenKind::Substitution => DefinitionKind::Substitution,
            TokenKind::Generation => DefinitionKind::Generation,
            TokenKind::Execution => DefinitionKind::Execution,
            _ => unreachable!(),
        };

        let (body, semicolon) = self.parse_body()?;

        Ok(Definition {
            name: name_token.spur(),
            name_span: name_token.span(),
            stack,
            kind,
            body,
            span: Span::merge(name_token.span(), semicolon),
        })
    }

    /// Terms up to (and including) the closing semicolon. The body may be
    /// empty.
    fn parse_body(&mut self) -> Result<(Vec<Expression>, Span), ParseError> {
        let mut body = Vec::new();

        loop {
            self.skip_trivia();

            match self.peek() {
                None => {
                    return Err(ParseError::UnexpectedEOF {
                        eof: self.eof_span(),
                        expected: Expectations::Exactly(TokenKind::Semicolon),
                    })
                }
                Some(t) if t.kind() == TokenKind::Semicolon => {
                    let semicolon = self.next().unwrap();
                    return Ok((body, semicolon.span()));
                }
                Some(_) => body.push(self.parse_term()?),
            }
        }
    }

    /// A single term: an atom or a quotation.
    pub(crate) fn parse_term(&mut self) -> Result<Expression, ParseError> {
        let expected = Expectations::OneOf(
            TokenKind::atomics()
                .iter()
                .copied()
                .chain([TokenKind::LBracket])
                .collect(),
        );

        let token = match self.peek() {
            Some(token) => token,
            None => {
                return Err(ParseError::UnexpectedEOF {
                    eof: self.eof_span(),
                    expected,
                })
            }
        };

        match token.kind() {
            TokenKind::Integer | TokenKind::HexInteger => {
                let token = self.next().unwrap();
                Ok(Expression::Byte(token.data().unwrap_byte(), token.span()))
            }
            TokenKind::Char => {
                let token = self.next().unwrap();
                Ok(Expression::Char(token.data().unwrap_byte(), token.span()))
            }
            TokenKind::String => {
                let token = self.next().unwrap();
                let spur = token.data().unwrap_string();
                let bytes = self.rodeo.resolve(&spur).bytes().collect();
                Ok(Expression::Str(bytes, token.span()))
            }
            TokenKind::Brainfuck => {
                let token = self.next().unwrap();
                let spur = token.data().unwrap_string();
                Ok(Expression::Brainfuck(
                    self.rodeo.resolve(&spur).to_string(),
                    token.span(),
                ))
            }
            TokenKind::NamedByte | TokenKind::NamedQuotation | TokenKind::Identifier => {
                let token = self.next().unwrap();
                Ok(Expression::Call(token.spur(), token.span()))
            }
            TokenKind::MacroInput => {
                let input = self.next().unwrap();
                self.skip_trivia();

                // The macro name is an identifier with a trailing `!`
                match self.peek() {
                    Some(t)
                        if t.kind() == TokenKind::Identifier
                            && self.rodeo.resolve(&t.spur()).ends_with('!') =>
                    {
                        let name = self.next().unwrap();
                        Ok(Expression::Macro {
                            name: name.spur(),
                            input: input.data().unwrap_string(),
                            span: Span::merge(input.span(), name.span()),
                        })
                    }
                    Some(t) => Err(ParseError::ExpectedMacroName { span: t.span() }),
                    None => Err(ParseError::ExpectedMacroName { span: input.span() }),
                }
            }
            TokenKind::LBracket => {
                let (terms, span) = self.parse_quotation()?;
                Ok(Expression::Quotation(terms, span))
            }
            _ => Err(ParseError::UnexpectedToken {
                found: token,
                expected,
            }),
        }
    }

    /// `[ terms ]`
    pub(crate) fn parse_quotation(&mut self) -> Result<(Rc<Vec<Expression>>, Span), ParseError> {
        let open = self.expect(TokenKind::LBracket)?;
        let mut terms = Vec::new();

        loop {
            self.skip_trivia();

            match self.peek() {
                None => {
                    return Err(ParseError::UnclosedQuotation { open: open.span() });
                }
                Some(t) if t.kind() == TokenKind::RBracket => {
                    let close = self.next().unwrap();
                    return Ok((Rc::new(terms), Span::merge(open.span(), close.span())));
                }
                Some(_) => terms.push(self.parse_term()?),
            }
        }
    }
}
