use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use codespan_reporting::term::{
    self,
    termcolor::{ColorChoice, StandardStream},
};

use serotonin_compiler::{compile_file, Config};

/// Compiles serotonin to Brainfuck
#[derive(Parser)]
#[command(name = "serotonin", version, author = "Christopher Mahoney @Alextopher")]
struct Cli {
    /// The serotonin source file
    input: PathBuf,

    /// Save the Brainfuck output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra directories to search for imported libraries
    #[arg(long)]
    library: Vec<PathBuf>,

    /// Disable no-op cancellation on the generated Brainfuck
    #[arg(long)]
    no_optimize: bool,

    /// Print timing information
    #[arg(short, long)]
    timings: bool,

    /// Print verbose outputs
    #[arg(short, long)]
    verbose: bool,

    /// Maximum number of rewriting steps
    #[arg(long)]
    max_steps: Option<u64>,

    /// Maximum number of instructions per compile-time evaluation
    #[arg(long)]
    staged_limit: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    if cli.input.extension().map_or(true, |ext| ext != "sero") {
        eprintln!("Error: File extension must be .sero");
        exit(1);
    }

    let mut config = Config::new(cli.verbose, cli.timings, !cli.no_optimize);
    config.library_paths = cli.library;
    if let Some(max_steps) = cli.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(staged_limit) = cli.staged_limit {
        config.staged_step_limit = staged_limit;
    }

    let (files, result) = compile_file(&cli.input, &config);

    match result {
        Ok(code) => match cli.output {
            Some(path) => {
                if let Err(e) = std::fs::write(&path, code) {
                    eprintln!("Error: Could not write {}: {}", path.display(), e);
                    exit(1);
                }
            }
            None => println!("{code}"),
        },
        Err(diagnostics) => {
            let writer = StandardStream::stderr(ColorChoice::Auto);
            let term_config = term::Config::default();

            for diagnostic in diagnostics {
                term::emit(&mut writer.lock(), &term_config, &files, &diagnostic).unwrap();
            }

            exit(1);
        }
    }
}
