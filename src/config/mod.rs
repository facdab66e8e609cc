use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use crate::catalog::DEFAULT_OUTPUT_FILE;
use crate::parse::Dialect;
use crate::scrape::DEFAULT_SCRAPE_LABEL;

/// Config file looked up in the working directory when `--config` isn't given.
pub const DEFAULT_CONFIG_FILE: &str = ".stepscan.yml";

/// How an entry's `File` field names its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileLabel {
    /// File name only (`steps.js`).
    Basename,
    /// Path relative to the scanned directory, or as given on the command line.
    Path,
}

impl FileLabel {
    pub fn default_for(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Javascript => FileLabel::Basename,
            Dialect::Ruby => FileLabel::Path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory name that marks step definition files during discovery.
    /// Empty accepts every file with the dialect's extension.
    pub step_dir: String,
    pub output_file: String,
    /// Globs (relative to each scanned directory) skipped during discovery.
    pub exclude: Vec<String>,
    /// Files appended after all inputs, e.g. a hooks file outside `step_dir`.
    pub extra_files: Vec<PathBuf>,
    pub scrape_label: String,
    pub file_label: Option<FileLabel>,
    /// Write `{}` when nothing was found instead of skipping the write.
    pub write_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_dir: "step_definitions".to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            exclude: Vec::new(),
            extra_files: Vec::new(),
            scrape_label: DEFAULT_SCRAPE_LABEL.to_string(),
            file_label: None,
            write_empty: false,
        }
    }
}

/// Load config from the given path, or from `.stepscan.yml` in the current
/// directory. A missing default file means built-in defaults; a missing
/// explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(Config::default());
            }
            default.to_path_buf()
        }
    };

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("failed to parse {}", config_path.display()))
}

fn parse_config(contents: &str) -> Result<Config> {
    // An empty file deserializes to null rather than an empty mapping.
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.step_dir, "step_definitions");
        assert_eq!(config.output_file, "parsed_stepdefinitions.json");
        assert_eq!(config.scrape_label, "resource_steps.rb");
        assert!(!config.write_empty);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = parse_config("step_dir: steps\nwrite_empty: true\nfile_label: basename\n").unwrap();
        assert_eq!(config.step_dir, "steps");
        assert!(config.write_empty);
        assert_eq!(config.file_label, Some(FileLabel::Basename));
        assert_eq!(config.output_file, "parsed_stepdefinitions.json");
    }

    #[test]
    fn lists_are_read() {
        let yaml = "exclude:\n  - vendor/**\nextra_files:\n  - features/extra/hooks.js\n";
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.exclude, vec!["vendor/**".to_string()]);
        assert_eq!(
            config.extra_files,
            vec![PathBuf::from("features/extra/hooks.js")]
        );
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_config("stepdir: oops\n").is_err());
    }

    #[test]
    fn missing_explicit_file_errors() {
        assert!(load_config(Some(Path::new("/nonexistent/.stepscan.yml"))).is_err());
    }

    #[test]
    fn reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        std::fs::write(&path, "scrape_label: legacy_steps.rb\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.scrape_label, "legacy_steps.rb");
    }

    #[test]
    fn default_labels_per_dialect() {
        assert_eq!(FileLabel::default_for(Dialect::Javascript), FileLabel::Basename);
        assert_eq!(FileLabel::default_for(Dialect::Ruby), FileLabel::Path);
    }
}
