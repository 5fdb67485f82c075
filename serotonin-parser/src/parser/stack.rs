use crate::{ast::StackArg, TokenKind};

use super::{
    errors::{Expectations, ParseError},
    Parser,
};

impl<'a> Parser<'a> {
    /// `( stack args )`
    pub(crate) fn parse_stack(&mut self) -> Result<Vec<StackArg>, ParseError> {
        self.expect(TokenKind::LParen)?;

        let expected = Expectations::OneOf(vec![
            TokenKind::NamedByte,
            TokenKind::NamedQuotation,
            TokenKind::UnnamedByte,
            TokenKind::UnnamedQuotation,
            TokenKind::Integer,
            TokenKind::HexInteger,
            TokenKind::LBracket,
            TokenKind::RParen,
        ]);

        let mut args = Vec::new();
        loop {
            self.skip_trivia();

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
                TokenKind::RParen => {
                    self.next().unwrap();
                    return Ok(args);
                }
                TokenKind::NamedByte => {
                    let token = self.next().unwrap();
                    args.push(StackArg::NamedByte(token.spur(), token.span()));
                }
                TokenKind::NamedQuotation => {
                    let token = self.next().unwrap();
                    args.push(StackArg::NamedQuotation(token.spur(), token.span()));
                }
                TokenKind::UnnamedByte => {
                    let token = self.next().unwrap();
                    args.push(StackArg::UnnamedByte(token.span()));
                }
                TokenKind::UnnamedQuotation => {
                    let token = self.next().unwrap();
                    args.push(StackArg::UnnamedQuotation(token.span()));
                }
                TokenKind::Integer | TokenKind::HexInteger => {
                    let token = self.next().unwrap();
                    args.push(StackArg::Byte(token.data().unwrap_byte(), token.span()));
                }
                TokenKind::LBracket => {
                    let (terms, span) = self.parse_quotation()?;
                    args.push(StackArg::Quotation(terms, span));
                }
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        found: token,
                        expected,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lasso::Rodeo;

    use crate::{ast::StackArg, lex, parser::Parser};

    fn parse_stack(input: &str) -> Vec<StackArg> {
        let mut rodeo = Rodeo::default();
        let (tokens, errors) = lex(input, 0, &mut rodeo);
        assert!(errors.is_empty(), "{:?}", errors);

        let mut parser = Parser::new(&tokens, 0, &rodeo);
        parser.parse_stack().unwrap()
    }

    #[test]
    fn test_named_bytes() {
        let args = parse_stack("(a b c)");

        assert_eq!(args.len(), 3);
        assert!(args
            .iter()
            .all(|arg| matches!(arg, StackArg::NamedByte(_, _))));
    }

    // A stack with every type of stack arg
    #[test]
    fn test_stack_args() {
        let args = parse_stack("(a 0 @ S [true] ?)");

        assert_eq!(args.len(), 6);
        assert!(matches!(args[0], StackArg::NamedByte(_, _)));
        assert!(matches!(args[1], StackArg::Byte(0, _)));
        assert!(matches!(args[2], StackArg::UnnamedByte(_)));
        assert!(matches!(args[3], StackArg::NamedQuotation(_, _)));
        assert!(matches!(args[4], StackArg::Quotation(_, _)));
        assert!(matches!(args[5], StackArg::UnnamedQuotation(_)));
    }

    #[test]
    fn test_empty_stack() {
        assert!(parse_stack("()").is_empty());
    }
}
