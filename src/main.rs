use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;

/// Reports whether each file is well-formed UTF-8.
#[derive(Debug, Parser)]
#[command(name = "utf8check", version)]
struct Args {
    /// Files to check.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let stdout = io::stdout();
    match utf8check::check_files(&args.files, &mut stdout.lock()) {
        Ok(summary) if summary.all_valid() => ExitCode::SUCCESS,
        Ok(summary) => {
            log::info!(
                "{} invalid, {} unreadable",
                summary.invalid,
                summary.unreadable
            );
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("utf8check: {error}");
            ExitCode::FAILURE
        }
    }
}
