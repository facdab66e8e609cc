use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::parse::source::SourceFile;
use crate::parse::{Dialect, build_tree};
use crate::step::extract_steps;

/// Parse `source` as `dialect` and return its step entries, labelled `label`.
///
/// Panics if the snippet doesn't parse.
pub fn steps_in(dialect: Dialect, source: &str, label: &str) -> Catalog {
    let path = PathBuf::from(format!("test.{}", dialect.extension()));
    let source = SourceFile::from_string(path, source.to_string());
    let root = build_tree(dialect, &source)
        .unwrap_or_else(|e| panic!("test snippet failed to parse: {e}"));
    extract_steps(&root, &source, dialect, label)
}

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_in_javascript() {
        let steps = steps_in(
            Dialect::Javascript,
            "this.When(/^I log in$/, function () { login(); });",
            "auth.js",
        );
        assert_eq!(
            steps.get("I log in").unwrap().code,
            "function () { login(); }"
        );
    }

    #[test]
    #[should_panic(expected = "failed to parse")]
    fn steps_in_rejects_broken_snippets() {
        steps_in(Dialect::Ruby, "Given(/x/) do\n", "x.rb");
    }
}
