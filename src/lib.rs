pub mod catalog;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod extractor;
pub mod fs;
pub mod parse;
pub mod scrape;
pub mod step;
pub mod syntax;

#[cfg(test)]
pub mod testutil;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use catalog::write_catalog;
use cli::Args;
use config::{Config, FileLabel, load_config};
use extractor::{ExtractOptions, Mode, run_extractor};
use fs::{InputFile, discover_files};
use parse::source::SourceFile;
use scrape::looks_like_step_file;

/// Run one harvest. Returns the exit code: 0 = done (including "nothing
/// found"), 2 = the catalog could not be written. Configuration and
/// discovery problems come back as `Err`.
pub fn run(args: Args) -> Result<i32> {
    let config = load_config(args.config.as_deref())?;
    debug!("config: {config:?}");

    let output_dir = args
        .output_dir()
        .context("no output directory given")?
        .to_path_buf();

    let mut extras = config.extra_files.clone();
    extras.extend(args.extra.iter().cloned());
    let files = discover_files(args.inputs(), &extras, args.dialect, &config)?;
    debug!("{} files to process", files.len());

    if args.list_files {
        for file in candidate_files(&files) {
            println!("{}", file.path.display());
        }
        return Ok(0);
    }

    let options = extract_options(&args, &config);
    let result = run_extractor(&files, &options);

    for path in &result.contributing {
        info!("step definitions found in {}", path.display());
    }
    info!(
        "{} files processed, {} step definitions, {} skipped",
        result.file_count,
        result.catalog.len(),
        result.failures.len()
    );

    let write_empty = args.write_empty || config.write_empty;
    if result.catalog.is_empty() && !write_empty {
        info!("no step definitions found; nothing written");
        return Ok(0);
    }

    let file_name = args.output_file.as_deref().unwrap_or(&config.output_file);
    match write_catalog(&result.catalog, &output_dir, file_name) {
        Ok(path) => {
            info!("wrote {}", path.display());
            Ok(0)
        }
        Err(e) => {
            error!("{e:#}");
            Ok(2)
        }
    }
}

fn extract_options(args: &Args, config: &Config) -> ExtractOptions {
    let mode = if args.scrape {
        Mode::Scrape {
            label: args
                .scrape_label
                .clone()
                .unwrap_or_else(|| config.scrape_label.clone()),
        }
    } else {
        Mode::Ast
    };
    ExtractOptions {
        dialect: args.dialect,
        mode,
        file_label: args
            .file_label
            .or(config.file_label)
            .unwrap_or_else(|| FileLabel::default_for(args.dialect)),
    }
}

/// Files that pass the line-based step pre-filter. Unreadable files are
/// reported and left out.
fn candidate_files(files: &[InputFile]) -> Vec<&InputFile> {
    files
        .iter()
        .filter(|file| match SourceFile::from_path(&file.path) {
            Ok(source) => looks_like_step_file(&source),
            Err(e) => {
                warn!("{}: {e}", file.path.display());
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use crate::testutil::write_file;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("stepscan").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn cli_overrides_config() {
        let config = Config {
            file_label: Some(FileLabel::Path),
            scrape_label: "cfg.rb".to_string(),
            ..Config::default()
        };
        let a = args(&["--scrape", "--scrape-label", "cli.rb", "--file-label", "basename", "x", "out"]);
        let options = extract_options(&a, &config);
        assert_eq!(options.file_label, FileLabel::Basename);
        assert_eq!(options.mode, Mode::Scrape { label: "cli.rb".to_string() });
    }

    #[test]
    fn config_fills_in_missing_flags() {
        let config = Config {
            file_label: Some(FileLabel::Basename),
            scrape_label: "cfg.rb".to_string(),
            ..Config::default()
        };
        let options = extract_options(&args(&["--scrape", "x", "out"]), &config);
        assert_eq!(options.file_label, FileLabel::Basename);
        assert_eq!(options.mode, Mode::Scrape { label: "cfg.rb".to_string() });
    }

    #[test]
    fn dialect_default_label() {
        let options = extract_options(&args(&["-d", "js", "x", "out"]), &Config::default());
        assert_eq!(options.file_label, FileLabel::Basename);
        assert_eq!(options.mode, Mode::Ast);
    }

    #[test]
    fn candidates_pass_the_prefilter() {
        let dir = tempfile::tempdir().unwrap();
        let steps = write_file(dir.path(), "steps.rb", b"Given(/x/) do\nend\n");
        let helper = write_file(dir.path(), "helper.rb", b"def helper; end\n");
        let files: Vec<InputFile> = [&steps, &helper, &PathBuf::from("/no/such.rb")]
            .iter()
            .map(|p| InputFile::explicit(p))
            .collect();
        let found: Vec<&PathBuf> = candidate_files(&files).into_iter().map(|f| &f.path).collect();
        assert_eq!(found, vec![&steps]);
    }
}
