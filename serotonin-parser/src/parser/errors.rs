use std::fmt;

use codespan_reporting::diagnostic::Diagnostic;
use colored::Colorize;

use crate::{Span, Token, TokenKind};

/// What the parser would have accepted at the point of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectations {
    Exactly(TokenKind),
    OneOf(Vec<TokenKind>),
    Named(&'static str),
}

impl fmt::Display for Expectations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectations::Exactly(kind) => write!(f, "expected {:?}", kind),
            Expectations::OneOf(kinds) => {
                write!(f, "expected one of ")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", kind)?;
                }
                Ok(())
            }
            Expectations::Named(name) => write!(f, "expected {}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedToken {
        found: Token,
        expected: Expectations,
    },
    UnexpectedEOF {
        eof: Span,
        expected: Expectations,
    },
    UnclosedQuotation {
        open: Span,
    },
    ReservedName {
        span: Span,
    },
    ExpectedMacroName {
        span: Span,
    },
}

impl ParseError {
    pub fn code(&self) -> &'static str {
        use ParseError::*;

        match self {
            UnexpectedToken { .. } => "E101",
            UnexpectedEOF { .. } => "E102",
            UnclosedQuotation { .. } => "E103",
            ReservedName { .. } => "E104",
            ExpectedMacroName { .. } => "E105",
        }
    }

    pub fn message(&self) -> &'static str {
        use ParseError::*;

        match self {
            UnexpectedToken { .. } => "Unexpected token.",
            UnexpectedEOF { .. } => "Unexpected end of file.",
            UnclosedQuotation { .. } => "Unclosed quotation.",
            ReservedName { .. } => "Reserved name.",
            ExpectedMacroName { .. } => "Expected a macro name.",
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic<usize> {
        let (code, message) = (self.code(), self.message());

        match self {
            ParseError::UnexpectedToken { found, expected } => Diagnostic::error()
                .with_labels(vec![found.span().primary_label(expected.to_string())]),
            ParseError::UnexpectedEOF { eof, expected } => {
                Diagnostic::error().with_labels(vec![eof.primary_label(expected.to_string())])
            }
            ParseError::UnclosedQuotation { open } => Diagnostic::error().with_labels(vec![
                open.primary_label(format!("This {} is never closed", "[".red()))
            ]),
            ParseError::ReservedName { span } => Diagnostic::error().with_labels(vec![
                span.primary_label("Single character names matching 'a'..'z' and 'A'..'Z' are reserved")
            ]),
            ParseError::ExpectedMacroName { span } => Diagnostic::error().with_labels(vec![
                span.primary_label(format!("Macro inputs must be followed by a name like {}", "autoperm!".yellow()))
            ]),
        }
        .with_message(message)
        .with_code(code)
    }
}

impl From<ParseError> for Diagnostic<usize> {
    fn from(err: ParseError) -> Self {
        err.into_diagnostic()
    }
}
