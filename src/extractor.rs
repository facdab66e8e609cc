use std::path::PathBuf;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::FileLabel;
use crate::diagnostic::{Diagnostic, FailureKind};
use crate::fs::InputFile;
use crate::parse::source::SourceFile;
use crate::parse::{Dialect, ParseError, build_tree};
use crate::scrape::scrape_steps;
use crate::step::extract_steps;

/// Which extraction path every file goes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Parse each file and walk its tree.
    Ast,
    /// Skip parsing and scrape legacy `%r!...!` macros; every entry gets `label`.
    Scrape { label: String },
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub dialect: Dialect,
    pub mode: Mode,
    pub file_label: FileLabel,
}

impl ExtractOptions {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            mode: Mode::Ast,
            file_label: FileLabel::default_for(dialect),
        }
    }

    fn label_for(&self, file: &InputFile) -> String {
        match self.file_label {
            FileLabel::Basename => file.basename(),
            FileLabel::Path => file.display.to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ExtractResult {
    pub catalog: Catalog,
    pub file_count: usize,
    /// Files that contributed at least one entry, in processing order.
    pub contributing: Vec<PathBuf>,
    pub failures: Vec<Diagnostic>,
}

/// Steps in one already-loaded file. Parse failures are returned, never
/// partially applied.
pub fn extract_source(
    source: &SourceFile,
    label: &str,
    options: &ExtractOptions,
) -> Result<Catalog, ParseError> {
    match &options.mode {
        Mode::Ast => {
            let root = build_tree(options.dialect, source)?;
            Ok(extract_steps(&root, source, options.dialect, label))
        }
        Mode::Scrape { label } => Ok(scrape_steps(source, label)),
    }
}

/// Process `files` in order, folding each file's steps into one catalog.
/// A file that can't be read or parsed is recorded in `failures` and
/// contributes nothing; the run always carries on.
pub fn run_extractor(files: &[InputFile], options: &ExtractOptions) -> ExtractResult {
    files.iter().fold(ExtractResult::default(), |mut acc, file| {
        acc.file_count += 1;

        let source = match SourceFile::from_path(&file.path) {
            Ok(source) => source,
            Err(err) => {
                let failure = Diagnostic::io(&file.path.to_string_lossy(), &err);
                warn!("{failure}");
                acc.failures.push(failure);
                return acc;
            }
        };

        let label = options.label_for(file);
        match extract_source(&source, &label, options) {
            Ok(steps) => {
                debug!("{}: {} step definitions", source.path_str(), steps.len());
                if steps.is_empty() {
                    if let Mode::Scrape { .. } = options.mode {
                        warn!("no steps found in file: {}", source.path_str());
                    }
                } else {
                    acc.contributing.push(file.path.clone());
                }
                acc.catalog = acc.catalog.merge(steps);
            }
            Err(err) => {
                let failure = Diagnostic {
                    path: source.path_str().to_string(),
                    location: err.location().cloned(),
                    kind: FailureKind::Parse,
                    message: err.to_string(),
                };
                warn!("{failure}");
                acc.failures.push(failure);
            }
        }
        acc
    })
}
