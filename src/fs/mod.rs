use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use tracing::debug;

use crate::config::Config;
use crate::parse::Dialect;

/// A file queued for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Where to read it from.
    pub path: PathBuf,
    /// How to name it in the catalog: relative to the scanned directory for
    /// discovered files, as given for explicit ones.
    pub display: PathBuf,
}

impl InputFile {
    pub fn explicit(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            display: path.to_path_buf(),
        }
    }

    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

/// Resolve inputs into the ordered list of files to process.
///
/// Directories are walked for step files (sorted per directory). Anything
/// else is taken as an explicit file and kept in the order given, even if it
/// doesn't exist; the loader reports that later. `extras` go last.
pub fn discover_files(
    inputs: &[PathBuf],
    extras: &[PathBuf],
    dialect: Dialect,
    config: &Config,
) -> Result<Vec<InputFile>> {
    let mut files = Vec::new();

    for path in inputs {
        if path.is_dir() {
            let mut found = walk_directory(path, dialect, config)?;
            debug!("{}: {} step files", path.display(), found.len());
            found.sort_by(|a, b| a.path.cmp(&b.path));
            files.extend(found);
        } else {
            files.push(InputFile::explicit(path));
        }
    }

    files.extend(extras.iter().map(|p| InputFile::explicit(p)));
    Ok(files)
}

fn walk_directory(dir: &Path, dialect: Dialect, config: &Config) -> Result<Vec<InputFile>> {
    let mut builder = WalkBuilder::new(dir);
    builder.hidden(true).git_ignore(true).git_global(true);

    if !config.exclude.is_empty() {
        let mut overrides = OverrideBuilder::new(dir);
        for pattern in &config.exclude {
            // ignore crate overrides: prefix with ! to exclude
            overrides
                .add(&format!("!{pattern}"))
                .with_context(|| format!("invalid exclude pattern: {pattern}"))?;
        }
        let overrides = overrides.build().context("failed to build overrides")?;
        builder.overrides(overrides);
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("error walking directory")?;
        let path = entry.path();
        if !path.is_file() || path.extension() != Some(OsStr::new(dialect.extension())) {
            continue;
        }
        if !in_step_dir(path, &config.step_dir) {
            continue;
        }
        let display = path.strip_prefix(dir).unwrap_or(path).to_path_buf();
        files.push(InputFile {
            path: path.to_path_buf(),
            display,
        });
    }

    Ok(files)
}

/// True when some ancestor directory of `path` is named `step_dir`.
fn in_step_dir(path: &Path, step_dir: &str) -> bool {
    if step_dir.is_empty() {
        return true;
    }
    path.parent().is_some_and(|parent| {
        parent
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == OsStr::new(step_dir)))
    })
}
