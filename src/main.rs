use clap::Parser;
use dirsift::cli::run_cli;
use dirsift::output::OutputFormatter;
use std::path::PathBuf;
use std::process::ExitCode;

/// Sort a directory's files into category folders.
#[derive(Parser)]
#[command(name = "dirsift", version, about)]
struct Args {
    /// Root directory to organize.
    root: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(message) = run_cli(&args.root) {
        OutputFormatter::error(&message);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
