use codespan_reporting::diagnostic::Diagnostic;
use colored::Colorize;

use crate::Span;

const ICE_NOTE: &str =
    "This is a compiler error and should not have happened. Please report this bug.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    NegativeInteger(Span, u8),
    LargeInteger(Span, u8),
    NegativeHex(Span, u8),
    LargeHex(Span, u8),
    ICEValidIntegerFailed(Span),
    ICEValidHexFailed(Span),
    InvalidEscapeSequence(Span, String),
    NewlineInString(Span, Span),
    NonAsciiString(Span, Span),
    EmptyCharLiteral(Span),
    WideCharLiteral(Span),
    InvalidCharEscape(Span),
    InvalidBrainfuck(Span, char),
    UnterminatedString(Span),
    UnterminatedChar(Span),
    UnterminatedBrainfuck(Span),
    UnterminatedBrace(Span),
    UnknownToken(Span),
}

impl TokenizerError {
    pub fn code(&self) -> &'static str {
        use TokenizerError::*;

        match self {
            NegativeInteger(_, _) => "E001",
            LargeInteger(_, _) => "E002",
            NegativeHex(_, _) => "E003",
            LargeHex(_, _) => "E004",
            ICEValidIntegerFailed(_) => "I005",
            ICEValidHexFailed(_) => "I006",
            InvalidEscapeSequence(_, _) => "E007",
            NewlineInString(_, _) => "E008",
            NonAsciiString(_, _) => "E009",
            EmptyCharLiteral(_) => "E010",
            WideCharLiteral(_) => "E011",
            InvalidCharEscape(_) => "E012",
            InvalidBrainfuck(_, _) => "E013",
            UnterminatedString(_) => "E014",
            UnterminatedChar(_) => "E015",
            UnterminatedBrainfuck(_) => "E016",
            UnterminatedBrace(_) => "E017",
            UnknownToken(_) => "E018",
        }
    }

    pub fn message(&self) -> &'static str {
        use TokenizerError::*;

        match self {
            NegativeInteger(_, _) | NegativeHex(_, _) => {
                "Invalid byte: Negative numbers are not supported"
            }
            LargeInteger(_, _) | LargeHex(_, _) => {
                "Invalid byte: Number is too large to store in a byte"
            }
            ICEValidIntegerFailed(_) => {
                "Internal Compiler Error: Failed to parse an integer string that should have succeeded"
            }
            ICEValidHexFailed(_) => {
                "Internal Compiler Error: Failed to parse a hex string that should have succeeded"
            }
            InvalidEscapeSequence(_, _) => "Invalid escape sequence in string.",
            NewlineInString(_, _) => "Newlines are not allowed in strings.",
            NonAsciiString(_, _) => "Non-ASCII characters are not allowed in strings.",
            EmptyCharLiteral(_) => "Character literals must contain a character.",
            WideCharLiteral(_) => "Character literals must be a single byte.",
            InvalidCharEscape(_) => "Invalid escape sequence in character literal.",
            InvalidBrainfuck(_, _) => "Brainfuck blocks may only contain `+-<>[].,`.",
            UnterminatedString(_) => "Unterminated string.",
            UnterminatedChar(_) => "Unterminated character literal.",
            UnterminatedBrainfuck(_) => "Unterminated Brainfuck block.",
            UnterminatedBrace(_) => "Unterminated macro input.",
            UnknownToken(_) => "Unknown token.",
        }
    }
}

impl From<TokenizerError> for Diagnostic<usize> {
    fn from(err: TokenizerError) -> Self {
        use TokenizerError::*;

        // message & code are handled by the respective methods
        match err.clone() {
            NegativeInteger(span, inverse) | NegativeHex(span, inverse) => Diagnostic::error()
                .with_labels(vec![span.primary_label(format!(
                    "Consider using the arithmetic inverse instead: {}",
                    inverse.to_string().yellow()
                ))]),
            LargeInteger(span, modulo) | LargeHex(span, modulo) => Diagnostic::error()
                .with_labels(vec![span.primary_label(format!(
                    "Consider reducing modulo 256 instead: {}",
                    modulo.to_string().yellow()
                ))]),
            ICEValidIntegerFailed(span) => Diagnostic::error()
                .with_notes(vec![ICE_NOTE.to_string()])
                .with_labels(vec![span.primary_label(
                    "Failed to parse an integer string that should have succeeded",
                )]),
            ICEValidHexFailed(span) => Diagnostic::error()
                .with_notes(vec![ICE_NOTE.to_string()])
                .with_labels(vec![
                    span.primary_label("Failed to parse a hex string that should have succeeded")
                ]),
            InvalidEscapeSequence(span, e) => {
                Diagnostic::error().with_labels(vec![span.primary_label(e)])
            }
            NewlineInString(span, newline) => Diagnostic::error().with_labels(vec![
                span.primary_label(format!("Consider using {} instead", "\\n".yellow())),
                newline.secondary_label("This newline"),
            ]),
            NonAsciiString(span, char) => Diagnostic::error().with_labels(vec![
                span.primary_label("Strings with non-ascii characters are not yet supported"),
                char.secondary_label("This character"),
            ]),
            EmptyCharLiteral(span) => {
                Diagnostic::error().with_labels(vec![span.primary_label("Empty character literal")])
            }
            WideCharLiteral(span) => Diagnostic::error().with_labels(vec![
                span.primary_label("More than one byte between the quotes")
            ]),
            InvalidCharEscape(span) => Diagnostic::error().with_labels(vec![span.primary_label(
                format!(
                    "Supported escapes are {}",
                    "\\n \\t \\\\ \\' \\\" \\0 \\xHH".yellow()
                ),
            )]),
            InvalidBrainfuck(span, c) => Diagnostic::error().with_labels(vec![span.primary_label(
                format!("{} is not a Brainfuck instruction", c.to_string().red()),
            )]),
            UnterminatedString(span) => Diagnostic::error()
                .with_labels(vec![span.primary_label("Expected a closing `\"`")]),
            UnterminatedChar(span) => {
                Diagnostic::error().with_labels(vec![span.primary_label("Expected a closing `'`")])
            }
            UnterminatedBrainfuck(span) => {
                Diagnostic::error().with_labels(vec![span.primary_label("Expected a closing backtick")])
            }
            UnterminatedBrace(span) => {
                Diagnostic::error().with_labels(vec![span.primary_label("Expected a closing `}`")])
            }
            UnknownToken(span) => {
                Diagnostic::error().with_labels(vec![span.primary_label("Unknown token")])
            }
        }
        .with_message(err.message())
        .with_code(err.code())
    }
}
