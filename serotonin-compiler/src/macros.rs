//! The macro dispatcher.
//!
//! Macros are native functions over the raw text between braces. The
//! registry is a closed set: adding a macro means rebuilding the
//! compiler. The handler interface `(&str, Span) -> Result<Vec<Expression>, String>`
//! is the only extension point.

use lasso::Rodeo;
use serotonin_parser::ast::Expression;
use serotonin_parser::Span;

use crate::errors::CompileError;

type Handler = fn(&str, Span) -> Result<Vec<Expression>, String>;

fn lookup(name: &str) -> Option<Handler> {
    match name {
        "autoperm!" => Some(autoperm),
        _ => None,
    }
}

/// Expands `{ input } name!` into the terms that replace the site.
pub(crate) fn expand(
    rodeo: &Rodeo,
    name: lasso::Spur,
    input: lasso::Spur,
    span: Span,
) -> Result<Vec<Expression>, CompileError> {
    let name = rodeo.resolve(&name);

    let handler = lookup(name).ok_or_else(|| CompileError::MacroUnknown {
        name: name.to_string(),
        span,
    })?;

    handler(rodeo.resolve(&input), span).map_err(|message| CompileError::MacroError {
        name: name.to_string(),
        message,
        span,
    })
}

/// Returns true if `name!` has a registered handler.
pub(crate) fn is_registered(name: &str) -> bool {
    lookup(name).is_some()
}

/// Generates an optimal stack-shuffling Brainfuck block from a stack
/// effect diagram like `a b c -- b c a`.
///
/// The inputs sit on the top of the stack with the pointer on the last
/// one. Each input is first moved into a scratch cell above anything the
/// outputs will touch, then dealt from there onto its output positions
/// (an input used twice is dealt twice), and the pointer finishes on the
/// new top of stack. The scratch cells end cleared, so the block contains
/// only `+ - < > [ ]` and never touches the output streams.
fn autoperm(input: &str, span: Span) -> Result<Vec<Expression>, String> {
    let (inputs, outputs) = parse_effect(input)?;

    let n = inputs.len() as isize;
    let m = outputs.len() as isize;
    // the scratch region starts above both the inputs and the outputs
    let scratch = n.max(m);

    let mut code = String::new();
    // cell offsets are relative to the first input at 1; the pointer
    // starts on the last input
    let mut cursor = n;

    // move every input into its scratch cell
    for i in 1..=n {
        goto(&mut cursor, i, &mut code);
        code.push_str("[-");
        goto(&mut cursor, scratch + i, &mut code);
        code.push('+');
        goto(&mut cursor, i, &mut code);
        code.push(']');
    }

    // deal each scratch cell onto the output positions that name it
    for (i, name) in inputs.iter().enumerate() {
        let cell = scratch + i as isize + 1;

        goto(&mut cursor, cell, &mut code);
        code.push_str("[-");
        for (j, output) in outputs.iter().enumerate() {
            if output == name {
                goto(&mut cursor, j as isize + 1, &mut code);
                code.push('+');
            }
        }
        goto(&mut cursor, cell, &mut code);
        code.push(']');
    }

    goto(&mut cursor, m, &mut code);

    Ok(vec![Expression::Brainfuck(code, span)])
}

fn parse_effect(input: &str) -> Result<(Vec<&str>, Vec<&str>), String> {
    let (before, after) = input
        .split_once("--")
        .ok_or_else(|| "expected a stack effect diagram like `a b -- b a`".to_string())?;

    let inputs: Vec<&str> = before.split_whitespace().collect();
    let outputs: Vec<&str> = after.split_whitespace().collect();

    for (i, name) in inputs.iter().enumerate() {
        if inputs[..i].contains(name) {
            return Err(format!("the input {} is named twice", name));
        }
    }

    for name in &outputs {
        if !inputs.contains(name) {
            return Err(format!("the output {} is not one of the inputs", name));
        }
    }

    Ok((inputs, outputs))
}

fn goto(cursor: &mut isize, target: isize, code: &mut String) {
    while *cursor < target {
        code.push('>');
        *cursor += 1;
    }
    while *cursor > target {
        code.push('<');
        *cursor -= 1;
    }
}

#[cfg(test)]
mod test {
    use serotonin_parser::ast::Expression;
    use serotonin_parser::Span;

    use crate::bf;

    use super::{autoperm, parse_effect};

    // Lays `values` out as a stack, runs the shuffle, and reads the
    // stack back (printing from the top down).
    fn shuffle(diagram: &str, values: &[u8], results: usize) -> Vec<u8> {
        let terms = autoperm(diagram, Span::default()).unwrap();
        let Expression::Brainfuck(code, _) = &terms[0] else {
            panic!("autoperm must expand to a Brainfuck block");
        };

        let mut program = String::new();
        for value in values {
            program.push('>');
            program.push_str(&"+".repeat(*value as usize));
        }
        program.push_str(code);
        program.push_str(&".<".repeat(results));

        bf::execute(&program, &[], 1_000_000).unwrap()
    }

    #[test]
    fn only_shuffling_instructions() {
        let terms = autoperm("a b c -- b c a", Span::default()).unwrap();
        let Expression::Brainfuck(code, _) = &terms[0] else {
            panic!("autoperm must expand to a Brainfuck block");
        };

        assert!(code.chars().all(|c| "+-<>[]".contains(c)));
    }

    #[test]
    fn swap() {
        // a=3 b=1 -- top is read first
        assert_eq!(shuffle("a b -- b a", &[3, 1], 2), vec![3, 1]);
    }

    #[test]
    fn rot() {
        assert_eq!(shuffle("a b c -- b c a", &[1, 2, 3], 3), vec![1, 3, 2]);
    }

    #[test]
    fn dup_and_drop() {
        assert_eq!(shuffle("a -- a a", &[9], 2), vec![9, 9]);
        assert_eq!(shuffle("a b -- b", &[5, 7], 1), vec![7]);
    }

    #[test]
    fn more_outputs_than_inputs() {
        assert_eq!(shuffle("a -- a a a", &[2], 3), vec![2, 2, 2]);
    }

    #[test]
    fn empty_diagram() {
        let terms = autoperm("--", Span::default()).unwrap();
        assert!(matches!(&terms[0], Expression::Brainfuck(code, _) if code.is_empty()));
    }

    #[test]
    fn rejects_bad_diagrams() {
        assert!(parse_effect("a b c").is_err());
        assert!(parse_effect("a a -- a").is_err());
        assert!(parse_effect("a -- a b").is_err());
    }
}
