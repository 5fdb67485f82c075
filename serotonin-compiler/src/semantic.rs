//! Checks that run after the table is built and before reduction.
//!
//! - every single-letter name in a body must be bound by the rule's
//!   stack pattern (lowercase for bytes, uppercase for quotations)
//! - every other called name must have at least one rule
//! - every macro name must have a registered handler
//! - `main` must exist and must have no stack pattern

use std::collections::HashSet;

use codespan_reporting::diagnostic::Diagnostic;
use lasso::{Rodeo, Spur};

use serotonin_parser::ast::{Expression, StackArg};

use crate::{errors::CompileError, macros, table::RuleTable};

pub(crate) fn check(table: &RuleTable, rodeo: &Rodeo) -> Vec<Diagnostic<usize>> {
    let mut diagnostics = Vec::new();

    for rule in table.iter() {
        let mut bytes: HashSet<Spur> = HashSet::new();
        let mut quotations: HashSet<Spur> = HashSet::new();

        for arg in &rule.stack {
            match arg {
                StackArg::NamedByte(name, _) => {
                    bytes.insert(*name);
                }
                StackArg::NamedQuotation(name, _) => {
                    quotations.insert(*name);
                }
                _ => {}
            }
        }

        check_body(
            &rule.body,
            table,
            rodeo,
            &bytes,
            &quotations,
            &mut diagnostics,
        );
    }

    match rodeo.get("main").and_then(|main| table.candidates(main)) {
        None => diagnostics.push(CompileError::NoMain.into_diagnostic()),
        Some(ids) => {
            for &id in ids {
                let rule = table.rule(id);
                if !rule.stack.is_empty() {
                    diagnostics
                        .push(CompileError::MainHasStack { span: rule.span }.into_diagnostic());
                }
            }
        }
    }

    diagnostics
}

fn check_body(
    body: &[Expression],
    table: &RuleTable,
    rodeo: &Rodeo,
    bytes: &HashSet<Spur>,
    quotations: &HashSet<Spur>,
    diagnostics: &mut Vec<Diagnostic<usize>>,
) {
    for expr in body {
        match expr {
            Expression::Call(name, span) => {
                let text = rodeo.resolve(name);

                // Single letters refer to stack pattern names
                if text.len() == 1 {
                    let c = text.chars().next().unwrap();

                    if c.is_ascii_lowercase() {
                        if !bytes.contains(name) {
                            diagnostics.push(
                                CompileError::UnboundVariable {
                                    name: text.to_string(),
                                    span: *span,
                                }
                                .into_diagnostic(),
                            );
                        }
                        continue;
                    }

                    if c.is_ascii_uppercase() {
                        if !quotations.contains(name) {
                            diagnostics.push(
                                CompileError::UnboundVariable {
                                    name: text.to_string(),
                                    span: *span,
                                }
                                .into_diagnostic(),
                            );
                        }
                        continue;
                    }
                }

                if !table.contains(*name) {
                    diagnostics.push(
                        CompileError::Undefined {
                            name: text.to_string(),
                            span: *span,
                        }
                        .into_diagnostic(),
                    );
                }
            }
            Expression::Quotation(terms, _) => {
                check_body(terms, table, rodeo, bytes, quotations, diagnostics)
            }
            Expression::Macro { name, span, .. } => {
                let text = rodeo.resolve(name);
                if !macros::is_registered(text) {
                    diagnostics.push(
                        CompileError::MacroUnknown {
                            name: text.to_string(),
                            span: *span,
                        }
                        .into_diagnostic(),
                    );
                }
            }
            _ => {}
        }
    }
}
