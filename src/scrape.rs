//! Text-only extraction for step files written with the legacy
//! `Given(%r!pattern!) do ... end` macro form, plus the cheap line-based
//! check used to spot candidate step files.
//!
//! Scraping never builds a tree. Entries are labelled with one fixed file
//! name supplied by configuration rather than the file they came from.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Catalog, StepEntry};
use crate::parse::source::SourceFile;

/// Label used when configuration doesn't supply one.
pub const DEFAULT_SCRAPE_LABEL: &str = "resource_steps.rb";

static LEGACY_STEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(Given|Then|When|And)\s*\(\s*%r!([^!]+)!\)\s*do\s*(?:\|[^|]*\|\s*)?(.*?)end")
        .expect("legacy step pattern is valid")
});

static STEP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:this\.)?(?:Given|When|Then|And)\s*\(")
        .expect("step line pattern is valid")
});

/// One entry per `%r!...!` step macro. Key is the trimmed regex body, code is
/// the trimmed text up to the first following `end`.
pub fn scrape_steps(source: &SourceFile, label: &str) -> Catalog {
    let text = source.text();
    let mut steps = Catalog::new();
    for caps in LEGACY_STEP.captures_iter(&text) {
        let pattern = caps.get(2).map_or("", |m| m.as_str()).trim();
        let code = caps.get(3).map_or("", |m| m.as_str()).trim();
        steps.insert(pattern.to_string(), StepEntry::new(code, label));
    }
    steps
}

/// Whether any line starts with a step registration call.
pub fn looks_like_step_file(source: &SourceFile) -> bool {
    STEP_LINE.is_match(&source.text())
}
