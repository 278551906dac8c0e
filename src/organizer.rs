//! Concurrent relocation of classified files.
//!
//! Runs once the scan has fully completed. Every classified file becomes one
//! task on the rayon pool: plain categories are moved into their flat
//! category folder, archives are extracted into a per-archive folder and then
//! deleted. The call returns only when every task has finished.
//!
//! No lock is needed here: every task owns a distinct source path, and
//! category folder creation treats "already exists" as success so concurrent
//! siblings cannot fail each other.

use crate::archive;
use crate::category::Category;
use crate::output::OutputFormatter;
use crate::scanner::ScanReport;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while relocating a single file.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a category or extraction directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Extraction succeeded but the original archive could not be removed.
    ArchiveRemovalFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::ArchiveRemovalFailed { path, source } => {
                write!(
                    f,
                    "Extracted {} but could not remove it: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file relocation operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What the organize phase did, per outcome kind.
#[derive(Debug, Default)]
pub struct OrganizeSummary {
    /// Files moved into a category folder.
    pub moved: usize,
    /// Archives extracted (and their originals deleted).
    pub extracted: usize,
    /// Archives left at their original path, with the reason.
    pub archives_left: Vec<(PathBuf, String)>,
    /// Files whose relocation failed, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

enum TaskOutcome {
    Moved,
    Extracted,
    ArchiveLeft { path: PathBuf, reason: String },
    Failed { path: PathBuf, reason: String },
}

/// Relocates every classified file in `report` under `root`.
///
/// Failures never abort sibling tasks; they are collected into the returned
/// summary and logged as they happen.
pub fn organize(root: &Path, report: &ScanReport) -> OrganizeSummary {
    let tasks: Vec<(Category, &PathBuf)> = Category::ALL
        .iter()
        .flat_map(|category| {
            report
                .files(*category)
                .iter()
                .map(move |path| (*category, path))
        })
        .collect();

    if tasks.is_empty() {
        return OrganizeSummary::default();
    }

    let progress = OutputFormatter::create_progress_bar(tasks.len() as u64);
    let outcomes: Vec<TaskOutcome> = tasks
        .par_iter()
        .map(|(category, path)| {
            let outcome = match category {
                Category::Archive => unpack_archive(root, path),
                _ => relocate_file(root, *category, path),
            };
            progress.inc(1);
            outcome
        })
        .collect();
    progress.finish_and_clear();

    let mut summary = OrganizeSummary::default();
    for outcome in outcomes {
        match outcome {
            TaskOutcome::Moved => summary.moved += 1,
            TaskOutcome::Extracted => summary.extracted += 1,
            TaskOutcome::ArchiveLeft { path, reason } => {
                summary.archives_left.push((path, reason));
            }
            TaskOutcome::Failed { path, reason } => {
                OutputFormatter::error(&reason);
                summary.failures.push((path, reason));
            }
        }
    }
    summary
}

fn relocate_file(root: &Path, category: Category, file_path: &Path) -> TaskOutcome {
    match move_to_category(root, category, file_path) {
        Ok(()) => TaskOutcome::Moved,
        Err(err) => TaskOutcome::Failed {
            path: file_path.to_path_buf(),
            reason: err.to_string(),
        },
    }
}

/// Moves `file_path` into `<root>/<category>/`, replacing any same-named
/// file already there.
pub fn move_to_category(root: &Path, category: Category, file_path: &Path) -> OrganizeResult<()> {
    let category_dir = root.join(category.dir_name());
    ensure_dir(&category_dir)?;

    let file_name = file_path
        .file_name()
        .ok_or_else(|| OrganizeError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination: category_dir.clone(),
            source_error: io::Error::new(
                io::ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })?;
    let destination = category_dir.join(file_name);

    // Rename replaces an existing destination; a cross-device rename fails,
    // so fall back to copy-then-delete.
    if fs::rename(file_path, &destination).is_ok() {
        return Ok(());
    }
    fs::copy(file_path, &destination)
        .and_then(|_| fs::remove_file(file_path))
        .map_err(|err| OrganizeError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination,
            source_error: err,
        })?;
    Ok(())
}

fn unpack_archive(root: &Path, archive_path: &Path) -> TaskOutcome {
    match extract_to_stem_folder(root, archive_path) {
        Ok(()) => TaskOutcome::Extracted,
        Err(ArchiveFailure::Recovered(reason)) => {
            OutputFormatter::warning(&format!(
                "Leaving {} in place: {}",
                archive_path.display(),
                reason
            ));
            TaskOutcome::ArchiveLeft {
                path: archive_path.to_path_buf(),
                reason,
            }
        }
        Err(ArchiveFailure::Fatal(err)) => TaskOutcome::Failed {
            path: archive_path.to_path_buf(),
            reason: err.to_string(),
        },
    }
}

/// How an archive task can go wrong.
pub enum ArchiveFailure {
    /// Extraction failed and was rolled back; the archive stays put.
    Recovered(String),
    /// The surrounding filesystem work failed.
    Fatal(OrganizeError),
}

/// Extracts `archive_path` into `<root>/archives/<stem>/` and deletes the
/// original on success. On extraction failure the folder is removed again,
/// partial contents included, and the archive is left untouched.
pub fn extract_to_stem_folder(root: &Path, archive_path: &Path) -> Result<(), ArchiveFailure> {
    let archives_dir = root.join(Category::Archive.dir_name());
    ensure_dir(&archives_dir).map_err(ArchiveFailure::Fatal)?;

    let stem = archive_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    let extraction_dir = archives_dir.join(stem);
    ensure_dir(&extraction_dir).map_err(ArchiveFailure::Fatal)?;

    match archive::unpack(archive_path, &extraction_dir) {
        Ok(()) => fs::remove_file(archive_path).map_err(|err| {
            ArchiveFailure::Fatal(OrganizeError::ArchiveRemovalFailed {
                path: archive_path.to_path_buf(),
                source: err,
            })
        }),
        Err(err) => {
            let _ = fs::remove_dir_all(&extraction_dir);
            Err(ArchiveFailure::Recovered(err.to_string()))
        }
    }
}

fn ensure_dir(path: &Path) -> OrganizeResult<()> {
    if let Err(err) = fs::create_dir(path)
        && err.kind() != io::ErrorKind::AlreadyExists
    {
        return Err(OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: err,
        });
    }
    Ok(())
}
