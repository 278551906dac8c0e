//! Orchestration of a full organizing run.
//!
//! A run is three strictly ordered phases: the concurrent scan, the
//! concurrent move/extract pass over the scan's results, and the
//! single-threaded pruning of emptied directories. Each phase fully
//! completes before the next starts.

use crate::category::{Category, ExtensionTable};
use crate::organizer::{self, OrganizeSummary};
use crate::output::OutputFormatter;
use crate::prune;
use crate::scanner::{self, ScanReport};
use std::collections::HashMap;
use std::path::Path;

/// Runs a full organizing pass over `base_path`.
///
/// Per-file problems (an archive that will not extract, a file that cannot
/// be moved) are reported and absorbed; only a root that cannot be scanned
/// at all is an error.
///
/// # Examples
///
/// ```no_run
/// use dirsift::cli::run_cli;
/// use std::path::Path;
///
/// match run_cli(Path::new("/path/to/downloads")) {
///     Ok(()) => println!("Done"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(base_path: &Path) -> Result<(), String> {
    if !base_path.is_dir() {
        return Err(format!("{} is not a directory", base_path.display()));
    }

    OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));

    let table = ExtensionTable::new();
    let report = scanner::scan(base_path, &table)
        .map_err(|e| format!("Error scanning {}: {}", base_path.display(), e))?;

    OutputFormatter::plain(&format!(
        "Scanned {} subfolder(s): {} file(s) to organize, {} left as-is.",
        report.folders.len(),
        report.classified_total(),
        report.others.len()
    ));

    let summary = organizer::organize(base_path, &report);
    prune::prune(base_path);

    print_summary(&report, &summary);
    OutputFormatter::success("Organization complete!");
    Ok(())
}

fn print_summary(report: &ScanReport, summary: &OrganizeSummary) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for category in Category::ALL {
        let files = report.files(category);
        if !files.is_empty() {
            counts.insert(category.dir_name().to_string(), files.len());
        }
    }
    if !counts.is_empty() {
        OutputFormatter::summary_table(&counts, report.classified_total());
        OutputFormatter::plain(&format!(
            "Moved {} file(s), extracted {} archive(s).",
            summary.moved, summary.extracted
        ));
    }

    if !report.unknown_extensions.is_empty() {
        let mut unknown: Vec<&str> = report
            .unknown_extensions
            .iter()
            .map(String::as_str)
            .collect();
        unknown.sort_unstable();
        OutputFormatter::warning(&format!(
            "Unrecognized extensions left in place: {}",
            unknown.join(", ")
        ));
    }
    if !summary.archives_left.is_empty() {
        OutputFormatter::warning(&format!(
            "{} archive(s) could not be extracted and stayed where they were.",
            summary.archives_left.len()
        ));
    }
    if !summary.failures.is_empty() {
        OutputFormatter::warning(&format!(
            "{} file(s) could not be organized. Review errors above.",
            summary.failures.len()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_cli_rejects_missing_root() {
        let result = run_cli(Path::new("/nonexistent/path/12345"));
        assert!(result.is_err());
    }

    #[test]
    fn test_run_cli_rejects_file_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("file.txt");
        fs::write(&file_path, "content").expect("Failed to write file");

        let result = run_cli(&file_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_cli_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = run_cli(temp_dir.path());
        assert!(result.is_ok(), "Should succeed on empty directory");
    }
}
