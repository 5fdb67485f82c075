//! Turns a fully-reduced value sequence into Brainfuck text.

use crate::gen::Value;

/// Concatenates the compiled form of every value, in order.
pub(crate) fn concat(values: &[Value]) -> String {
    let mut out = String::new();
    for value in values {
        compiled(value, &mut out);
    }
    out
}

// A byte is pushed by moving onto a fresh cell and incrementing it into
// place. Everything else already is Brainfuck text.
fn compiled(value: &Value, out: &mut String) {
    match value {
        Value::Byte(n, _) => {
            out.push('>');
            for _ in 0..*n {
                out.push('+');
            }
        }
        Value::Quotation { code, .. } => out.push_str(code),
        Value::Code(code, _) => out.push_str(code),
    }
}

/// Optimizes generated Brainfuck code by removing neighboring pairs that
/// cancel out ("><", "<>", "+-", "-+"). Removing a pair can expose a new
/// pair, which the single pass below still catches because it works
/// against the already-rewritten prefix.
pub fn optimize(bf: &str) -> String {
    let mut acc: Vec<char> = Vec::with_capacity(bf.len());

    for c in bf.chars() {
        match (acc.last(), c) {
            (Some('>'), '<') | (Some('<'), '>') | (Some('+'), '-') | (Some('-'), '+') => {
                acc.pop();
            }
            _ => acc.push(c),
        }
    }

    acc.iter().collect()
}
