//! The rewriting driver.
//!
//! Reduction keeps two structures: a value stack of fully-reduced terms
//! and a work queue of terms still to process. Terms are taken
//! left-to-right, so by the time a call is reached everything to its
//! left is already a value and patterns can be matched against the top
//! of the stack directly.
//!
//! A rule that is currently being compiled is never a candidate for its
//! own call sites. This is what lets a staged rule like
//! `* (a b) ==! a b * pop;` reach the generic `*` from inside its own
//! body instead of recursing forever.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use either::Either;
use lasso::{Rodeo, Spur};

use serotonin_parser::ast::{DefinitionKind, Expression, StackArg};
use serotonin_parser::Span;

use crate::{
    bf,
    config::Config,
    emit,
    errors::CompileError,
    macros, mangle,
    table::{Rule, RuleId, RuleTable},
};

/// A fully-reduced term on the value stack.
#[derive(Debug, Clone)]
pub(crate) enum Value {
    /// A known byte
    Byte(u8, Span),
    /// A quotation, annotated with the Brainfuck its body compiles to
    Quotation {
        terms: Rc<Vec<Expression>>,
        code: String,
        span: Span,
    },
    /// An opaque Brainfuck fragment. Opaque code satisfies no pattern.
    Code(String, Span),
}

impl Value {
    pub(crate) fn render(&self, rodeo: &Rodeo) -> String {
        match self {
            Value::Byte(b, _) => b.to_string(),
            Value::Quotation { terms, .. } => {
                let body = terms
                    .iter()
                    .map(|t| t.render(rodeo))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("[{}]", body)
            }
            Value::Code(code, _) => format!("`{}`", code),
        }
    }

    fn to_exact_arg(&self) -> StackArg {
        match self {
            Value::Byte(b, span) => StackArg::Byte(*b, *span),
            Value::Quotation { terms, span, .. } => StackArg::Quotation(terms.clone(), *span),
            Value::Code(_, _) => unreachable!("opaque code never matches a stack pattern"),
        }
    }
}

// Work queue bookkeeping. `Finish` retires a rule from the in-progress
// set once everything it spliced in has been processed.
#[derive(Debug, Clone)]
enum Message {
    Finish(RuleId),
}

type Bindings = HashMap<Spur, Value>;
type Work = Vec<Either<Expression, Message>>;

pub(crate) struct Generator<'a> {
    pub(crate) table: RuleTable,
    rodeo: &'a mut Rodeo,
    config: &'a Config,
    /// canonical (head, inputs) -> the specialised rule it resolved to
    cache: HashMap<(Spur, Vec<u8>), RuleId>,
    building: HashSet<RuleId>,
    steps: u64,
}

impl<'a> Generator<'a> {
    pub(crate) fn new(table: RuleTable, rodeo: &'a mut Rodeo, config: &'a Config) -> Self {
        Self {
            table,
            rodeo,
            config,
            cache: HashMap::new(),
            building: HashSet::new(),
            steps: 0,
        }
    }

    /// Reduces `main` to a single Brainfuck program.
    pub(crate) fn compile_main(&mut self) -> Result<String, CompileError> {
        let main = self.rodeo.get_or_intern("main");
        let span = self
            .table
            .candidates(main)
            .and_then(|ids| ids.last().copied())
            .map(|id| self.table.rule(id).span)
            .unwrap_or_default();

        let values = self.reduce(&[Expression::Call(main, span)])?;
        Ok(emit::concat(&values))
    }

    /// Reduces a term sequence to values. Recursive: quotation bodies and
    /// staged rule bodies reduce in their own fresh context, sharing the
    /// table, cache, in-progress set, and step budget.
    pub(crate) fn reduce(&mut self, terms: &[Expression]) -> Result<Vec<Value>, CompileError> {
        let mut work: Work = terms.iter().rev().cloned().map(Either::Left).collect();
        let mut stack: Vec<Value> = Vec::new();

        while let Some(item) = work.pop() {
            let expr = match item {
                Either::Right(Message::Finish(id)) => {
                    self.building.remove(&id);
                    continue;
                }
                Either::Left(expr) => expr,
            };

            self.steps += 1;
            if self.steps > self.config.max_steps {
                return Err(CompileError::ReductionOverflow {
                    budget: self.config.max_steps,
                    span: expr.span(),
                });
            }

            match expr {
                Expression::Byte(b, span) | Expression::Char(b, span) => {
                    stack.push(Value::Byte(b, span))
                }
                // A string pushes a zero stopper and then its bytes in
                // reverse, leaving the first character on top so the
                // string words print it forward.
                Expression::Str(bytes, span) => {
                    stack.push(Value::Byte(0, span));
                    for b in bytes.iter().rev() {
                        stack.push(Value::Byte(*b, span));
                    }
                }
                Expression::Brainfuck(code, span) => stack.push(Value::Code(code, span)),
                Expression::Quotation(terms, span) => {
                    let values = self.reduce(&terms)?;
                    let code = emit::concat(&values);
                    stack.push(Value::Quotation { terms, code, span });
                }
                Expression::Macro { name, input, span } => {
                    let expansion = macros::expand(self.rodeo, name, input, span)?;
                    work.extend(expansion.into_iter().rev().map(Either::Left));
                }
                Expression::Call(name, span) => {
                    self.call(name, span, &mut stack, &mut work)?;
                }
            }
        }

        Ok(stack)
    }

    /// Selects and applies a rule at a call site.
    fn call(
        &mut self,
        name: Spur,
        span: Span,
        stack: &mut Vec<Value>,
        work: &mut Work,
    ) -> Result<(), CompileError> {
        let ids = match self.table.candidates(name) {
            Some(ids) => ids.to_vec(),
            None => {
                return Err(CompileError::Undefined {
                    name: self.rodeo.resolve(&name).to_string(),
                    span,
                })
            }
        };

        // Later definitions are preferred; the first match wins.
        let mut starved: Option<usize> = None;
        let mut max_arity = 0;
        let mut selected: Option<(RuleId, DefinitionKind, Vec<Expression>, usize, Bindings)> = None;

        for &id in ids.iter().rev() {
            if self.building.contains(&id) {
                continue;
            }

            let rule = self.table.rule(id);
            let arity = rule.arity();
            max_arity = max_arity.max(arity);

            if stack.len() < arity {
                starved = Some(starved.map_or(arity, |w| w.max(arity)));
                continue;
            }

            if let Some(bindings) = match_stack(&rule.stack, &stack[stack.len() - arity..]) {
                selected = Some((id, rule.kind, rule.body.clone(), arity, bindings));
                break;
            }
        }

        match selected {
            Some((id, kind, body, arity, bindings)) => {
                self.apply(id, name, span, kind, body, arity, bindings, stack, work)
            }
            None => match starved {
                Some(wanted) => Err(CompileError::ArityInsufficient {
                    name: self.rodeo.resolve(&name).to_string(),
                    wanted,
                    available: stack.len(),
                    span,
                }),
                None => {
                    let shown = &stack[stack.len().saturating_sub(3)..];
                    let observed = if shown.is_empty() {
                        "<empty stack>".to_string()
                    } else {
                        shown
                            .iter()
                            .map(|v| v.render(self.rodeo))
                            .collect::<Vec<_>>()
                            .join(" ")
                    };

                    Err(CompileError::NoMatch {
                        name: self.rodeo.resolve(&name).to_string(),
                        arity: max_arity,
                        observed,
                        span,
                    })
                }
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn apply(
        &mut self,
        id: RuleId,
        name: Spur,
        span: Span,
        kind: DefinitionKind,
        body: Vec<Expression>,
        arity: usize,
        bindings: Bindings,
        stack: &mut Vec<Value>,
        work: &mut Work,
    ) -> Result<(), CompileError> {
        let base = stack.len() - arity;

        match kind {
            DefinitionKind::Substitution => {
                stack.truncate(base);

                self.building.insert(id);
                work.push(Either::Right(Message::Finish(id)));

                let body = substitute(&bindings, &body, false);
                work.extend(body.into_iter().rev().map(Either::Left));
                Ok(())
            }
            DefinitionKind::Generation | DefinitionKind::Execution => {
                let inputs: Vec<Value> = stack[base..].to_vec();
                let key = (name, mangle::canonical(&inputs));

                // A second call with identical inputs resolves through
                // the specialisation it registered the first time.
                if let Some(&cached) = self.cache.get(&key) {
                    let replacement = self.table.rule(cached).body.clone();
                    stack.truncate(base);
                    work.extend(replacement.into_iter().rev().map(Either::Left));
                    return Ok(());
                }

                // Reduce the body with bindings in place, emit it as one
                // program, and run it on the embedded interpreter.
                self.building.insert(id);
                let staged = substitute(&bindings, &body, true);
                let reduced = self.reduce(&staged);
                self.building.remove(&id);

                let program = emit::concat(&reduced?);
                let output = bf::execute(&program, &[], self.config.staged_step_limit)
                    .map_err(|e| {
                        CompileError::staged(e, self.config.staged_step_limit, span)
                    })?;

                // `==?` output is Brainfuck text; `==!` output is data
                let replacement: Vec<Expression> = match kind {
                    DefinitionKind::Generation => {
                        let code: String = output.iter().map(|&b| b as char).collect();
                        vec![Expression::Brainfuck(code, span)]
                    }
                    DefinitionKind::Execution => output
                        .iter()
                        .map(|&b| Expression::Byte(b, span))
                        .collect(),
                    DefinitionKind::Substitution => unreachable!(),
                };

                let mangled = mangle::mangled(self.rodeo, name, &key.1);
                let specialised = self.table.insert(Rule {
                    head: mangled,
                    stack: inputs.iter().map(Value::to_exact_arg).collect(),
                    kind: DefinitionKind::Substitution,
                    body: replacement.clone(),
                    span,
                });
                self.cache.insert(key, specialised);

                stack.truncate(base);
                work.extend(replacement.into_iter().rev().map(Either::Left));
                Ok(())
            }
        }
    }
}

/// Matches a stack pattern against the values directly left of a call.
/// `args[i]` lines up with `values[i]`, so the rightmost pattern entry is
/// the top of the stack. Reusing a letter is an equality constraint.
fn match_stack(args: &[StackArg], values: &[Value]) -> Option<Bindings> {
    debug_assert_eq!(args.len(), values.len());

    let mut bindings = Bindings::new();

    for (arg, value) in args.iter().zip(values.iter()) {
        match (arg, value) {
            (StackArg::NamedByte(name, _), Value::Byte(b, _)) => {
                match bindings.get(name) {
                    Some(Value::Byte(bound, _)) if bound == b => {}
                    Some(_) => return None,
                    None => {
                        bindings.insert(*name, value.clone());
                    }
                }
            }
            (StackArg::UnnamedByte(_), Value::Byte(_, _)) => {}
            (StackArg::Byte(expected, _), Value::Byte(b, _)) => {
                if expected != b {
                    return None;
                }
            }
            (StackArg::NamedQuotation(name, _), Value::Quotation { code, .. }) => {
                match bindings.get(name) {
                    Some(Value::Quotation { code: bound, .. }) if bound == code => {}
                    Some(_) => return None,
                    None => {
                        bindings.insert(*name, value.clone());
                    }
                }
            }
            (StackArg::UnnamedQuotation(_), Value::Quotation { .. }) => {}
            (StackArg::Quotation(pattern, _), Value::Quotation { terms, .. }) => {
                if !serotonin_parser::ast::structural_eq_all(pattern, terms) {
                    return None;
                }
            }
            _ => return None,
        }
    }

    Some(bindings)
}

/// Replaces bound names in a rule body. Bound bytes become byte terms.
/// Bound quotations stay quotations in substitution bodies; in staged
/// bodies they become strings of their compiled Brainfuck, which is how a
/// generation rule gets its arguments as printable text.
fn substitute(bindings: &Bindings, body: &[Expression], staged: bool) -> Vec<Expression> {
    if bindings.is_empty() {
        return body.to_vec();
    }

    body.iter()
        .map(|expr| substitute_one(bindings, expr, staged))
        .collect()
}

fn substitute_one(bindings: &Bindings, expr: &Expression, staged: bool) -> Expression {
    match expr {
        Expression::Call(name, span) => match bindings.get(name) {
            Some(Value::Byte(b, _)) => Expression::Byte(*b, *span),
            Some(Value::Quotation { terms, code, .. }) => {
                if staged {
                    Expression::Str(code.bytes().collect(), *span)
                } else {
                    Expression::Quotation(terms.clone(), *span)
                }
            }
            Some(Value::Code(_, _)) | None => expr.clone(),
        },
        Expression::Quotation(terms, span) => {
            Expression::Quotation(Rc::new(substitute(bindings, terms, staged)), *span)
        }
        _ => expr.clone(),
    }
}
