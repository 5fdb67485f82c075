//! The serotonin abstract syntax tree.
//!
//! The tree is deliberately small: a module is imports plus definitions,
//! a definition is a head, an optional stack pattern, a rewrite kind, and
//! a body of expressions. The compiler rewrites these expressions
//! directly, so everything here is cheap to clone (`Rc` bodies, interned
//! names).
use std::rc::Rc;

use lasso::{Rodeo, Spur};

use crate::Span;

#[derive(Debug, Clone)]
pub struct Module {
    pub name: Spur,
    pub imports: Vec<(Spur, Span)>,
    pub definitions: Vec<Definition>,
}

/// A single rewrite rule: `head (stack)? kind body ;`
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: Spur,
    pub name_span: Span,
    pub stack: Option<Vec<StackArg>>,
    pub kind: DefinitionKind,
    pub body: Vec<Expression>,
    pub span: Span,
}

impl Definition {
    pub fn stack_args(&self) -> &[StackArg] {
        self.stack.as_deref().unwrap_or_default()
    }
}

/// How a rule rewrites its call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    // `==`: the body is spliced in place of the site.
    // ```
    // swap (a b) == b a;
    // ```
    // means 10 5 swap is replaced with 5 10
    Substitution,
    // `==?`: the body is compiled and run at compile time; its output is
    // spliced back in as Brainfuck text.
    // For example: read 10 + compiles to `,>++++++++++[-<+>]<` when `,++++++++++` would suffice.
    // To create these rules we write programs that _output_ brainfuck:
    // ```
    // + (b) ==? '+' b dupn spop;
    // ```
    // 10 + is replaced by `++++++++++`
    Generation,
    // `==!`: like `==?` but the output bytes are data, not code.
    // ```
    // * (a b) ==! a b * pop;
    // ```
    // 10 20 * is replaced by 200
    Execution,
}

/// One formal parameter of a stack pattern.
#[derive(Debug, Clone)]
pub enum StackArg {
    // Lowercase letter
    NamedByte(Spur, Span),
    // @
    UnnamedByte(Span),
    // Number
    Byte(u8, Span),
    // Capital letter
    NamedQuotation(Spur, Span),
    // ?
    UnnamedQuotation(Span),
    // A literal quotation, matched structurally
    Quotation(Rc<Vec<Expression>>, Span),
}

impl StackArg {
    pub fn span(&self) -> Span {
        match self {
            StackArg::NamedByte(_, span)
            | StackArg::UnnamedByte(span)
            | StackArg::Byte(_, span)
            | StackArg::NamedQuotation(_, span)
            | StackArg::UnnamedQuotation(span)
            | StackArg::Quotation(_, span) => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expression {
    /// An integer literal
    Byte(u8, Span),
    /// A character literal. A byte that remembers its source shape.
    Char(u8, Span),
    /// A string literal, kept as raw bytes
    Str(Vec<u8>, Span),
    /// A verbatim Brainfuck fragment. The only terminal form.
    Brainfuck(String, Span),
    /// An unresolved reference to a rule
    Call(Spur, Span),
    /// A bracketed sub-program
    Quotation(Rc<Vec<Expression>>, Span),
    /// A macro invocation: `{ input } name!`
    Macro {
        name: Spur,
        input: Spur,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Byte(_, span)
            | Expression::Char(_, span)
            | Expression::Str(_, span)
            | Expression::Brainfuck(_, span)
            | Expression::Call(_, span)
            | Expression::Quotation(_, span)
            | Expression::Macro { span, .. } => *span,
        }
    }

    /// Structural equality, ignoring spans. This is what exact-quotation
    /// stack patterns compare with: the parser has already removed
    /// comments and whitespace, so two quotations written the same way
    /// compare equal no matter where they appear.
    pub fn structural_eq(&self, other: &Expression) -> bool {
        match (self, other) {
            (Expression::Byte(a, _), Expression::Byte(b, _))
            | (Expression::Char(a, _), Expression::Char(b, _))
            | (Expression::Byte(a, _), Expression::Char(b, _))
            | (Expression::Char(a, _), Expression::Byte(b, _)) => a == b,
            (Expression::Str(a, _), Expression::Str(b, _)) => a == b,
            (Expression::Brainfuck(a, _), Expression::Brainfuck(b, _)) => a == b,
            (Expression::Call(a, _), Expression::Call(b, _)) => a == b,
            (Expression::Quotation(a, _), Expression::Quotation(b, _)) => {
                structural_eq_all(a, b)
            }
            (
                Expression::Macro { name, input, .. },
                Expression::Macro {
                    name: other_name,
                    input: other_input,
                    ..
                },
            ) => name == other_name && input == other_input,
            _ => false,
        }
    }

    /// Renders the expression the way it was written.
    pub fn render(&self, rodeo: &Rodeo) -> String {
        match self {
            Expression::Byte(b, _) => b.to_string(),
            Expression::Char(b, _) => {
                if b.is_ascii_graphic() {
                    format!("'{}'", *b as char)
                } else {
                    format!("'\\x{:02x}'", b)
                }
            }
            Expression::Str(bytes, _) => {
                format!("\"{}\"", String::from_utf8_lossy(bytes))
            }
            Expression::Brainfuck(code, _) => format!("`{}`", code),
            Expression::Call(name, _) => rodeo.resolve(name).to_string(),
            Expression::Quotation(terms, _) => {
                let body = terms
                    .iter()
                    .map(|e| e.render(rodeo))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("[{}]", body)
            }
            Expression::Macro { name, input, .. } => {
                format!("{{{}}} {}", rodeo.resolve(input), rodeo.resolve(name))
            }
        }
    }
}

/// Structural equality over whole bodies.
pub fn structural_eq_all(a: &[Expression], b: &[Expression]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.structural_eq(y))
}
