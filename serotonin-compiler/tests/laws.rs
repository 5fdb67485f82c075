//! The laws the compiler promises: determinism, terminal purity,
//! preference ordering, staged semantics, quotation compilation, and the
//! error paths.

use serotonin_compiler::{bf, compile_str, Config};

const MAX_ITERATIONS: u64 = 50_000_000;

fn compile(code: &str) -> String {
    match compile_str("test", code, &Config::default()) {
        Ok(code) => code,
        Err(errors) => panic!("Compilation failed: {:#?}", errors),
    }
}

fn run(code: &str) -> Vec<u8> {
    bf::execute(&compile(code), &[], MAX_ITERATIONS).unwrap()
}

fn error_code(source: &str, config: &Config) -> String {
    let errors = compile_str("test", source, config).unwrap_err();
    errors[0].code.clone().unwrap_or_default()
}

#[test]
fn determinism() {
    let source = "IMPORT std; main == 3 5 2 + * pop \"Hi\" sprint 10 dup + pop;";

    assert_eq!(compile(source), compile(source));
}

#[test]
fn terminal_purity() {
    for source in [
        "IMPORT std; main == 2 2 + pop;",
        "IMPORT std; main == \"Hi\" sprint;",
        "IMPORT std; main == 'y' [true] [print] while;",
        "IMPORT std; main == 1 2 3 rot 3 popn;",
    ] {
        let code = compile(source);
        assert!(
            code.chars().all(|c| "+-<>[].,".contains(c)),
            "{} compiled to {}",
            source,
            code
        );
    }
}

#[test]
fn preference_ordering() {
    // both rules match; the later one wins
    assert_eq!(run("IMPORT std; num == 1; num == 2; main == num pop;"), vec![2]);
}

#[test]
fn exec_substitutes_data() {
    // the bytes an `==!` rule splices in are the staged program's output
    assert_eq!(
        run("IMPORT std; three ==! 1 2 3 3 popn; main == three + + pop;"),
        vec![6]
    );
}

#[test]
fn gen_substitutes_code() {
    // the staged program prints a single `.`; treated as program text it
    // prints the 5 underneath. Were it treated as data, nothing would be
    // printed at all.
    assert_eq!(
        run("IMPORT std; emit ==? '.' pop; main == 5 emit drop;"),
        vec![5]
    );
}

#[test]
fn gen_empty_output_is_empty_code() {
    assert_eq!(run("IMPORT std; nothing ==? ; main == nothing 5 pop;"), vec![5]);
}

// Compiling `[ B ] apply` with `apply (Q) ==? Q sprint` emits exactly
// the code that B alone would compile to.
#[test]
fn quotation_compilation() {
    let quoted = compile("IMPORT std; apply (Q) ==? Q sprint; main == [5 print pop] apply;");
    let plain = compile("IMPORT std; main == 5 print pop;");

    assert_eq!(quoted, plain);
}

#[test]
fn quotations_push_nothing() {
    // a quotation that is never consumed contributes its code inline
    assert_eq!(run("IMPORT std; main == 2 2 + pop;"), vec![4]);
    // and consuming one with a structural match deletes the site
    assert_eq!(compile("IMPORT std; main == [false] [print] while;"), "");
}

#[test]
fn while_true_compiles_to_an_infinite_loop() {
    let code = compile("IMPORT std; main == 'y' [true] [print] while;");

    // the [true] specialisation fired
    assert!(code.contains(">+[[-]<"), "{}", code);

    // the loop really is infinite: it exhausts any budget, printing y's
    assert_eq!(
        bf::execute(&code, &[], 10_000),
        Err(bf::Error::StepLimit { limit: 10_000 })
    );
}

#[test]
fn autoperm_rules_shuffle() {
    // a user-defined shuffle through the macro, shadowing std's rot
    assert_eq!(
        run("IMPORT std; rot == {a b c -- b c a} autoperm!; main == 1 2 3 rot 3 popn;"),
        vec![1, 3, 2]
    );
}

#[test]
fn specialised_dup_avoids_the_runtime_loop() {
    let code = compile("IMPORT std; main == 10 dup + pop;");

    assert!(!code.contains("[->+>+<<]"), "{}", code);
    assert_eq!(bf::execute(&code, &[], MAX_ITERATIONS), Ok(vec![20]));
}

// ---- error paths ----

#[test]
fn unresolved_import() {
    assert_eq!(error_code("IMPORT nosuch; main == 1;", &Config::default()), "E213");
}

#[test]
fn undefined_name() {
    assert_eq!(error_code("main == nope;", &Config::default()), "E201");
}

#[test]
fn unbound_letter() {
    assert_eq!(error_code("foo == a; main == foo;", &Config::default()), "E202");
}

#[test]
fn no_match() {
    // read produces opaque code; `double` has no generic fallback
    assert_eq!(
        error_code(
            "IMPORT std; double (a) == a a; main == read double pop;",
            &Config::default()
        ),
        "E203"
    );
}

#[test]
fn no_main() {
    assert_eq!(error_code("foo == 1;", &Config::default()), "E205");
}

#[test]
fn main_has_stack() {
    assert_eq!(error_code("main (a) == a;", &Config::default()), "E206");
}

#[test]
fn reduction_overflow() {
    let mut config = Config::default();
    config.max_steps = 5;

    assert_eq!(
        error_code("IMPORT std; main == 1 2 3 4 5 5 popn;", &config),
        "E207"
    );
}

#[test]
fn staged_timeout() {
    assert_eq!(
        error_code("bad ==! `+[]`; main == bad;", &Config::default()),
        "E209"
    );
}

#[test]
fn staged_underflow() {
    assert_eq!(
        error_code("bad ==! `<`; main == bad;", &Config::default()),
        "E210"
    );
}

#[test]
fn unknown_macro() {
    assert_eq!(error_code("main == {x} nope!;", &Config::default()), "E211");
}

#[test]
fn macro_errors() {
    assert_eq!(
        error_code("main == {a b -- c} autoperm!;", &Config::default()),
        "E212"
    );
    assert_eq!(
        error_code("main == {a a -- a} autoperm!;", &Config::default()),
        "E212"
    );
}

#[test]
fn circular_import() {
    // a module importing itself is the smallest cycle
    assert_eq!(
        error_code("IMPORT test; main == 1 pop;", &Config::default()),
        "E214"
    );
}
