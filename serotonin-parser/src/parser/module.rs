use lasso::Spur;

use crate::{ast::Module, Span, TokenKind};

use super::{Parser, ParseError};

impl<'a> Parser<'a> {
    pub(crate) fn parse_module(&mut self, name: Spur) -> Result<Module, ParseError> {
        let mut imports = Vec::new();
        let mut definitions = Vec::new();

        loop {
            self.skip_trivia();

            match self.peek() {
                None => break,
                Some(t) if t.kind() == TokenKind::ImportKW => {
                    imports.extend(self.parse_imports()?);
                }
                Some(_) => definitions.push(self.parse_definition()?),
            }
        }

        Ok(Module {
            name,
            imports,
            definitions,
        })
    }

    /// `IMPORT name name … ;`
    fn parse_imports(&mut self) -> Result<Vec<(Spur, Span)>, ParseError> {
        self.expect(TokenKind::ImportKW)?;

        let mut imports = Vec::new();
        loop {
            self.skip_trivia();

            if self.peek_is(TokenKind::Semicolon) {
                self.next().unwrap();
                return Ok(imports);
            }

            let token = self.expect(TokenKind::Identifier)?;
            imports.push((token.spur(), token.span()));
        }
    }
}
