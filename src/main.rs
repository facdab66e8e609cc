use std::process;

use clap::Parser;

use stepscan::cli::Args;

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match stepscan::run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            tracing::error!("{e:#}");
            process::exit(3);
        }
    }
}
