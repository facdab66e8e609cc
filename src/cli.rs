use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::Level;

use crate::config::FileLabel;
use crate::parse::Dialect;

#[derive(Parser, Debug)]
#[command(
    name = "stepscan",
    version,
    about = "Harvest BDD step definitions into a JSON catalog"
)]
pub struct Args {
    /// Step files or directories to scan, followed by the output directory
    #[arg(required = true, num_args = 2.., value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Source dialect of the step files
    #[arg(short, long, value_enum, default_value_t = Dialect::Ruby)]
    pub dialect: Dialect,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra file processed after all inputs (repeatable)
    #[arg(long = "extra", value_name = "PATH")]
    pub extra: Vec<PathBuf>,

    /// How entries name their source file
    #[arg(long, value_enum)]
    pub file_label: Option<FileLabel>,

    /// Scrape legacy `%r!...!` step macros instead of parsing
    #[arg(long)]
    pub scrape: bool,

    /// File label used for every scraped entry
    #[arg(long, value_name = "LABEL")]
    pub scrape_label: Option<String>,

    /// Name of the catalog file inside the output directory
    #[arg(long, value_name = "NAME")]
    pub output_file: Option<String>,

    /// Write `{}` when no steps are found
    #[arg(long)]
    pub write_empty: bool,

    /// Print candidate step files, then exit
    #[arg(short = 'L', long)]
    pub list_files: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Only report errors
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,
}

impl Args {
    /// Every positional except the last.
    pub fn inputs(&self) -> &[PathBuf] {
        match self.paths.split_last() {
            Some((_, inputs)) => inputs,
            None => &[],
        }
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.paths.last().map(PathBuf::as_path)
    }

    pub fn log_level(&self) -> Level {
        if self.debug {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::INFO
        }
    }
}
