use std::path::PathBuf;

use codespan_reporting::diagnostic::Diagnostic;
use colored::Colorize;

use serotonin_parser::Span;

use crate::bf;

/// Everything that can go wrong after parsing. All of these are fatal to
/// the compilation; nothing is recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A name with no rules at all
    Undefined { name: String, span: Span },
    /// A single-letter name not bound by the rule's stack pattern
    UnboundVariable { name: String, span: Span },
    /// Candidates exist but none matched the values at the site
    NoMatch {
        name: String,
        arity: usize,
        observed: String,
        span: Span,
    },
    /// A pattern wanted more values than the site had, and there was no
    /// generic fallback
    ArityInsufficient {
        name: String,
        wanted: usize,
        available: usize,
        span: Span,
    },
    NoMain,
    MainHasStack { span: Span },
    /// The rewriting driver ran out of its step budget
    ReductionOverflow { budget: u64, span: Span },
    /// A staged program was not valid Brainfuck
    StagedParse { message: String, span: Span },
    /// A staged program ran out of its instruction budget
    StagedTimeout { budget: u64, span: Span },
    /// A staged program moved left of the tape
    TapeUnderflow { span: Span },
    MacroUnknown { name: String, span: Span },
    MacroError {
        name: String,
        message: String,
        span: Span,
    },
    UnresolvedImport {
        name: String,
        searched: Vec<PathBuf>,
        span: Span,
    },
    CircularImport { cycle: String, span: Span },
}

impl CompileError {
    /// Wraps an interpreter failure with the span of the staged site.
    pub(crate) fn staged(err: bf::Error, budget: u64, span: Span) -> Self {
        match err {
            bf::Error::UnbalancedBracket { .. } => CompileError::StagedParse {
                message: err.to_string(),
                span,
            },
            bf::Error::TapeUnderflow => CompileError::TapeUnderflow { span },
            bf::Error::StepLimit { .. } => CompileError::StagedTimeout { budget, span },
        }
    }

    pub fn code(&self) -> &'static str {
        use CompileError::*;

        match self {
            Undefined { .. } => "E201",
            UnboundVariable { .. } => "E202",
            NoMatch { .. } => "E203",
            ArityInsufficient { .. } => "E204",
            NoMain => "E205",
            MainHasStack { .. } => "E206",
            ReductionOverflow { .. } => "E207",
            StagedParse { .. } => "E208",
            StagedTimeout { .. } => "E209",
            TapeUnderflow { .. } => "E210",
            MacroUnknown { .. } => "E211",
            MacroError { .. } => "E212",
            UnresolvedImport { .. } => "E213",
            CircularImport { .. } => "E214",
        }
    }

    pub fn message(&self) -> String {
        use CompileError::*;

        match self {
            Undefined { name, .. } => format!("{} is not defined.", name.red()),
            UnboundVariable { name, .. } => format!(
                "{} is not bound by this definition's stack pattern.",
                name.red()
            ),
            NoMatch { name, .. } => {
                format!("No definition of {} matches this call site.", name.red())
            }
            ArityInsufficient { name, wanted, available, .. } => format!(
                "{} wants {} values but only {} are available.",
                name.red(),
                wanted,
                available
            ),
            NoMain => format!("No {} definition was found.", "main".red()),
            MainHasStack { .. } => {
                format!("The {} definition must have no stack pattern.", "main".red())
            }
            ReductionOverflow { budget, .. } => {
                format!("Rewriting did not finish within {} steps.", budget)
            }
            StagedParse { .. } => "A compile-time program is not valid Brainfuck.".to_string(),
            StagedTimeout { budget, .. } => format!(
                "A compile-time program did not finish within {} instructions.",
                budget
            ),
            TapeUnderflow { .. } => {
                "A compile-time program moved left of the tape.".to_string()
            }
            MacroUnknown { name, .. } => format!("Unknown macro {}.", name.red()),
            MacroError { name, .. } => format!("The {} macro failed.", name.red()),
            UnresolvedImport { name, .. } => {
                format!("Could not find the module {}.", name.green())
            }
            CircularImport { .. } => "Circular import detected.".to_string(),
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic<usize> {
        let (code, message) = (self.code(), self.message());

        match self {
            CompileError::Undefined { span, .. } => {
                Diagnostic::error().with_labels(vec![span.primary_label("Not defined anywhere in scope")])
            }
            CompileError::UnboundVariable { span, .. } => Diagnostic::error().with_labels(vec![
                span.primary_label("Single letters refer to stack pattern names"),
            ]),
            CompileError::NoMatch { observed, span, arity, .. } => {
                Diagnostic::error().with_labels(vec![span.primary_label(format!(
                    "No pattern of {} value(s) matches the stack here: {}",
                    arity, observed
                ))])
            }
            CompileError::ArityInsufficient { span, .. } => Diagnostic::error()
                .with_labels(vec![span.primary_label("Not enough values to the left of this call")]),
            CompileError::NoMain => Diagnostic::error().with_notes(vec![
                "Every program needs a `main == …;` definition.".to_string(),
            ]),
            CompileError::MainHasStack { span } => Diagnostic::error()
                .with_labels(vec![span.primary_label("main takes no arguments")]),
            CompileError::ReductionOverflow { span, .. } => Diagnostic::error().with_labels(vec![
                span.primary_label("Rewriting stopped here"),
            ]).with_notes(vec![
                "Raise the limit with --max-steps if the program is expected to be this large.".to_string(),
            ]),
            CompileError::StagedParse { message, span } => {
                Diagnostic::error().with_labels(vec![span.primary_label(message)])
            }
            CompileError::StagedTimeout { span, .. } => Diagnostic::error().with_labels(vec![
                span.primary_label("While evaluating this call at compile time"),
            ]).with_notes(vec![
                "Raise the limit with --staged-limit if the program is expected to run this long.".to_string(),
            ]),
            CompileError::TapeUnderflow { span } => Diagnostic::error().with_labels(vec![
                span.primary_label("While evaluating this call at compile time"),
            ]),
            CompileError::MacroUnknown { span, .. } => Diagnostic::error().with_labels(vec![
                span.primary_label(format!("Only {} is supported", "autoperm!".yellow())),
            ]),
            CompileError::MacroError { message, span, .. } => {
                Diagnostic::error().with_labels(vec![span.primary_label(message)])
            }
            CompileError::UnresolvedImport { searched, span, .. } => {
                let mut notes = vec!["Searched:".to_string()];
                notes.extend(searched.iter().map(|p| format!("  {}", p.display())));
                notes.push("  <embedded libraries>".to_string());

                Diagnostic::error()
                    .with_labels(vec![span.primary_label("Imported here")])
                    .with_notes(notes)
            }
            CompileError::CircularImport { cycle, span } => Diagnostic::error()
                .with_labels(vec![span.primary_label(cycle)]),
        }
        .with_message(message)
        .with_code(code)
    }
}

impl From<CompileError> for Diagnostic<usize> {
    fn from(err: CompileError) -> Self {
        err.into_diagnostic()
    }
}
