use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// Default name of the catalog artifact inside the output directory.
pub const DEFAULT_OUTPUT_FILE: &str = "parsed_stepdefinitions.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEntry {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "File")]
    pub file: String,
}

impl StepEntry {
    pub fn new(code: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            file: file.into(),
        }
    }
}

/// Pattern -> entry. At most one entry per pattern; keys serialize in sorted
/// order so identical inputs give identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, StepEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any previous entry for `pattern`.
    pub fn insert(&mut self, pattern: String, entry: StepEntry) -> Option<StepEntry> {
        self.entries.insert(pattern, entry)
    }

    /// Fold `later` into `self`. Entries from `later` win on duplicate
    /// patterns; nothing is reported.
    pub fn merge(mut self, later: Catalog) -> Catalog {
        self.entries.extend(later.entries);
        self
    }

    pub fn get(&self, pattern: &str) -> Option<&StepEntry> {
        self.entries.get(pattern)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StepEntry)> {
        self.entries.iter()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Write `catalog` to `dir/file_name`, creating `dir` if needed. The JSON is
/// written to a temporary file in `dir` and renamed into place, so a failure
/// leaves any previous artifact untouched.
pub fn write_catalog(catalog: &Catalog, dir: &Path, file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;

    let json = catalog
        .to_json_pretty()
        .context("failed to serialize step catalog")?;
    let path = dir.join(file_name);

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot write to output directory {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .with_context(|| format!("error writing to file {}", path.display()))?;
    tmp.persist(&path)
        .map_err(|e| e.error)
        .with_context(|| format!("error writing to file {}", path.display()))?;

    Ok(path)
}
