//! The serotonin compiler.
//!
//! `compile_file` / `compile_str` run the whole pipeline: lex, parse,
//! resolve imports, build the rule table, check it, and reduce `main` to
//! a single line of Brainfuck.

use std::fs;
use std::path::Path;
use std::time::Instant;

use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use lasso::Rodeo;

pub mod bf;
mod config;
mod emit;
mod errors;
mod gen;
mod imports;
mod macros;
mod mangle;
mod semantic;
mod stdlib;
mod table;


pub use config::{Config, DEFAULT_MAX_STEPS, DEFAULT_STAGED_STEP_LIMIT};
pub use emit::optimize;
pub use errors::CompileError;
pub use table::{Rule, RuleId, RuleTable};

pub type Files = SimpleFiles<String, String>;

/// Compiles the file at `path`. Imports resolve against the file's
/// directory, its `libraries/` subdirectory, any configured extra paths,
/// and finally the embedded libraries.
///
/// The returned [`Files`] holds every source that was loaded, for
/// rendering the diagnostics.
pub fn compile_file(
    path: &Path,
    config: &Config,
) -> (Files, Result<String, Vec<Diagnostic<usize>>>) {
    let mut files = SimpleFiles::new();

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            let diagnostic = Diagnostic::error()
                .with_message(format!("Could not read {}: {}", path.display(), e));
            return (files, Err(vec![diagnostic]));
        }
    };

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("main"));

    let mut search = Vec::new();
    if let Some(parent) = path.parent() {
        search.push(parent.to_path_buf());
        search.push(parent.join("libraries"));
    }
    search.extend(config.library_paths.iter().cloned());

    let result = compile_source(&name, source, search, config, &mut files);
    (files, result)
}

/// Compiles a source string. Imports resolve against the configured
/// extra paths and the embedded libraries only.
pub fn compile_str(
    name: &str,
    source: &str,
    config: &Config,
) -> Result<String, Vec<Diagnostic<usize>>> {
    let mut files = SimpleFiles::new();
    compile_source(
        name,
        source.to_string(),
        config.library_paths.clone(),
        config,
        &mut files,
    )
}

fn compile_source(
    name: &str,
    source: String,
    search: Vec<std::path::PathBuf>,
    config: &Config,
    files: &mut Files,
) -> Result<String, Vec<Diagnostic<usize>>> {
    let mut rodeo = Rodeo::default();

    let start = Instant::now();
    let mut loader = imports::Loader::new(search);
    loader.load_entry(name, source, files, &mut rodeo)?;
    if config.timings {
        println!("Parsing took {:?}", start.elapsed());
    }

    let mut table = RuleTable::new();
    for module in loader.modules {
        for def in module.definitions {
            table.insert(Rule::from(def));
        }
    }

    if config.verbose {
        eprintln!("Loaded {} rules", table.len());
    }

    let diagnostics = semantic::check(&table, &rodeo);
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let start = Instant::now();
    let mut generator = gen::Generator::new(table, &mut rodeo, config);
    let result = generator.compile_main();
    if config.timings {
        println!("Rewriting took {:?}", start.elapsed());
    }

    match result {
        Ok(code) => {
            if config.optimize {
                Ok(emit::optimize(&code))
            } else {
                Ok(code)
            }
        }
        Err(e) => Err(vec![e.into_diagnostic()]),
    }
}
