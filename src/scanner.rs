//! Concurrent directory scan and classification.
//!
//! The scan walks the tree from a root directory, spawning one task per
//! discovered subdirectory into a [`rayon::scope`]. The scope bounds the
//! fan-out to the worker pool and does not return until every transitively
//! spawned task has finished, so a completed [`scan`] call means the whole
//! tree has been classified.
//!
//! All tasks mutate one shared [`ScanReport`] behind a single coarse mutex;
//! each critical section is a table lookup plus an append or two, so the
//! lock never holds across I/O.

use crate::category::{Category, ExtensionTable, normalized_extension};
use crate::output::OutputFormatter;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Everything the scan phase learns about the tree.
///
/// Populated concurrently during [`scan`], then read by the organize phase.
#[derive(Debug, Default)]
pub struct ScanReport {
    buckets: HashMap<Category, Vec<PathBuf>>,
    /// Files with no extension or an unrecognized one; these are never moved.
    pub others: Vec<PathBuf>,
    /// Extensions that matched the table at least once.
    pub matched_extensions: HashSet<String>,
    /// Extensions encountered that the table does not know.
    pub unknown_extensions: HashSet<String>,
    /// Subdirectories visited during the walk (reserved folders excluded).
    pub folders: Vec<PathBuf>,
}

impl ScanReport {
    /// The files classified into `category`.
    pub fn files(&self, category: Category) -> &[PathBuf] {
        self.buckets.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Total number of files assigned to a category (excludes "others").
    pub fn classified_total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    fn record_match(&mut self, category: Category, extension: String, path: PathBuf) {
        self.matched_extensions.insert(extension);
        self.buckets.entry(category).or_default().push(path);
    }

    fn record_unknown(&mut self, extension: String, path: PathBuf) {
        self.unknown_extensions.insert(extension);
        self.others.push(path);
    }

    fn record_extensionless(&mut self, path: PathBuf) {
        self.others.push(path);
    }
}

/// Classifies every regular file under `root` into a [`ScanReport`].
///
/// Directories named after a category folder are skipped wherever they
/// appear. Subdirectories that cannot be listed are logged and skipped; only
/// an unreadable root is an error.
pub fn scan(root: &Path, table: &ExtensionTable) -> io::Result<ScanReport> {
    // Fail fast when the root itself cannot be listed.
    fs::read_dir(root)?;

    let report = Mutex::new(ScanReport::default());
    rayon::scope(|scope| scan_directory(scope, root.to_path_buf(), table, &report));

    Ok(report
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner()))
}

fn scan_directory<'s>(
    scope: &rayon::Scope<'s>,
    dir: PathBuf,
    table: &'s ExtensionTable,
    report: &'s Mutex<ScanReport>,
) {
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) => {
            OutputFormatter::warning(&format!("Skipping {}: {}", dir.display(), err));
            return;
        }
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();

        if file_type.is_dir() {
            if Category::is_reserved_dir(&entry.file_name().to_string_lossy()) {
                continue;
            }
            lock(report).folders.push(path.clone());
            scope.spawn(move |scope| scan_directory(scope, path, table, report));
        } else if file_type.is_file() {
            classify_file(&path, table, report);
        }
    }
}

fn classify_file(path: &Path, table: &ExtensionTable, report: &Mutex<ScanReport>) {
    match normalized_extension(path) {
        None => lock(report).record_extensionless(path.to_path_buf()),
        Some(extension) => match table.lookup(&extension) {
            Some(category) => lock(report).record_match(category, extension, path.to_path_buf()),
            None => lock(report).record_unknown(extension, path.to_path_buf()),
        },
    }
}

// Append-only state; a poisoned lock is still safe to reuse.
fn lock(report: &Mutex<ScanReport>) -> MutexGuard<'_, ScanReport> {
    report.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        File::create(path).expect("Failed to create file");
    }

    #[test]
    fn test_scan_classifies_files_in_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        touch(&root.join("a.jpg"));
        touch(&root.join("b.pdf"));
        touch(&root.join("c.mp3"));
        touch(&root.join("d.mkv"));
        touch(&root.join("e.zip"));

        let report = scan(root, &ExtensionTable::new()).expect("scan failed");

        assert_eq!(report.files(Category::Image), vec![root.join("a.jpg")]);
        assert_eq!(report.files(Category::Document), vec![root.join("b.pdf")]);
        assert_eq!(report.files(Category::Audio), vec![root.join("c.mp3")]);
        assert_eq!(report.files(Category::Video), vec![root.join("d.mkv")]);
        assert_eq!(report.files(Category::Archive), vec![root.join("e.zip")]);
        assert_eq!(report.classified_total(), 5);
        assert!(report.others.is_empty());
    }

    #[test]
    fn test_scan_recurses_and_records_folders() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).expect("Failed to create nested dirs");
        touch(&nested.join("deep.png"));

        let report = scan(root, &ExtensionTable::new()).expect("scan failed");

        assert_eq!(report.files(Category::Image), vec![nested.join("deep.png")]);
        let mut folders = report.folders.clone();
        folders.sort();
        assert_eq!(folders, vec![root.join("a"), root.join("a").join("b")]);
    }

    #[test]
    fn test_scan_skips_reserved_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::create_dir(root.join("images")).expect("Failed to create dir");
        touch(&root.join("images").join("already_sorted.jpg"));
        let sub = root.join("sub");
        fs::create_dir(&sub).expect("Failed to create dir");
        fs::create_dir(sub.join("archives")).expect("Failed to create dir");
        touch(&sub.join("archives").join("stale.zip"));
        touch(&sub.join("fresh.jpg"));

        let report = scan(root, &ExtensionTable::new()).expect("scan failed");

        // Only the file outside reserved folders is seen, at any depth.
        assert_eq!(report.files(Category::Image), vec![sub.join("fresh.jpg")]);
        assert!(report.files(Category::Archive).is_empty());
        assert_eq!(report.folders, vec![sub.clone()]);
    }

    #[test]
    fn test_scan_routes_unknown_and_extensionless_to_others() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        touch(&root.join("data.xyz"));
        touch(&root.join("README"));
        touch(&root.join(".bashrc"));

        let report = scan(root, &ExtensionTable::new()).expect("scan failed");

        assert_eq!(report.classified_total(), 0);
        let mut others = report.others.clone();
        others.sort();
        assert_eq!(
            others,
            [
                root.join(".bashrc"),
                root.join("README"),
                root.join("data.xyz")
            ]
        );
        assert_eq!(
            report.unknown_extensions,
            HashSet::from(["XYZ".to_string()])
        );
    }

    #[test]
    fn test_scan_is_case_insensitive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        touch(&root.join("a.jpg"));
        touch(&root.join("b.JPG"));
        touch(&root.join("c.Jpg"));

        let report = scan(root, &ExtensionTable::new()).expect("scan failed");

        assert_eq!(report.files(Category::Image).len(), 3);
        assert_eq!(
            report.matched_extensions,
            HashSet::from(["JPG".to_string()])
        );
    }

    #[test]
    fn test_scan_missing_root_is_an_error() {
        assert!(scan(Path::new("/nonexistent/path/12345"), &ExtensionTable::new()).is_err());
    }

    #[test]
    fn test_scan_wide_tree() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        for i in 0..20 {
            let sub = root.join(format!("sub{i}"));
            fs::create_dir(&sub).expect("Failed to create dir");
            for j in 0..10 {
                touch(&sub.join(format!("track_{i}_{j}.mp3")));
            }
        }

        let report = scan(root, &ExtensionTable::new()).expect("scan failed");

        assert_eq!(report.files(Category::Audio).len(), 200);
        assert_eq!(report.folders.len(), 20);
    }
}
