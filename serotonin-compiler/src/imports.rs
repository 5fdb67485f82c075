//! `IMPORT` resolution.
//!
//! Modules load depth-first, imports before their importer, each name at
//! most once. The entry file therefore lands last in the table and its
//! rules shadow everything it imported.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use lasso::Rodeo;

use serotonin_parser::ast::Module;
use serotonin_parser::{lex, parse_module, Span};

use crate::{errors::CompileError, stdlib::LIBRARIES};

pub(crate) struct Loader {
    search: Vec<PathBuf>,
    loaded: HashSet<String>,
    building: Vec<String>,
    pub(crate) modules: Vec<Module>,
}

impl Loader {
    pub(crate) fn new(search: Vec<PathBuf>) -> Self {
        Self {
            search,
            loaded: HashSet::new(),
            building: Vec::new(),
            modules: Vec::new(),
        }
    }

    /// Loads the entry module and, recursively, everything it imports.
    pub(crate) fn load_entry(
        &mut self,
        name: &str,
        source: String,
        files: &mut SimpleFiles<String, String>,
        rodeo: &mut Rodeo,
    ) -> Result<(), Vec<Diagnostic<usize>>> {
        self.load(name, source, files, rodeo)
    }

    fn load(
        &mut self,
        name: &str,
        source: String,
        files: &mut SimpleFiles<String, String>,
        rodeo: &mut Rodeo,
    ) -> Result<(), Vec<Diagnostic<usize>>> {
        let file_id = files.add(name.to_string(), source.clone());

        let (tokens, errors) = lex(&source, file_id, rodeo);
        if !errors.is_empty() {
            return Err(errors.into_iter().map(Diagnostic::from).collect());
        }

        let spur = rodeo.get_or_intern(name);
        let module = parse_module(&tokens, file_id, spur, rodeo)
            .map_err(|e| vec![e.into_diagnostic()])?;

        self.building.push(name.to_string());
        for (import, span) in module.imports.clone() {
            let import = rodeo.resolve(&import).to_string();
            self.resolve(&import, span, files, rodeo)?;
        }
        self.building.pop();

        self.loaded.insert(name.to_string());
        self.modules.push(module);
        Ok(())
    }

    fn resolve(
        &mut self,
        name: &str,
        span: Span,
        files: &mut SimpleFiles<String, String>,
        rodeo: &mut Rodeo,
    ) -> Result<(), Vec<Diagnostic<usize>>> {
        if self.loaded.contains(name) {
            return Ok(());
        }

        // A module somewhere up the import chain is asking for itself
        if let Some(position) = self.building.iter().position(|m| m == name) {
            let mut cycle = String::new();
            for module in &self.building[position..] {
                write!(cycle, "{} -> ", module).unwrap();
            }
            write!(cycle, "{}", name).unwrap();

            return Err(vec![
                CompileError::CircularImport { cycle, span }.into_diagnostic()
            ]);
        }

        let file_name = format!("{}.sero", name);

        let found = self
            .search
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file());

        if let Some(path) = found {
            let source = fs::read_to_string(&path).map_err(|e| {
                vec![Diagnostic::error()
                    .with_message(format!("Could not read {}: {}", path.display(), e))]
            })?;

            return self.load(name, source, files, rodeo);
        }

        match LIBRARIES.get_file(&file_name) {
            Some(file) => {
                let source = file.contents_utf8().unwrap().to_string();
                self.load(name, source, files, rodeo)
            }
            None => Err(vec![CompileError::UnresolvedImport {
                name: name.to_string(),
                searched: self.search.clone(),
                span,
            }
            .into_diagnostic()]),
        }
    }
}
