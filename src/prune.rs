//! Removal of directories left empty by the organize phase.

use std::fs;
use std::path::Path;

/// Deletes every directory under `root` that is empty once its descendants
/// have been pruned. The root itself is never deleted.
///
/// Runs single-threaded; this is a cheap cleanup pass. Deletion of a
/// directory that still has content fails, and that failure is the signal to
/// keep it.
pub fn prune(root: &Path) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            prune_tree(&entry.path());
        }
    }
}

fn prune_tree(dir: &Path) {
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                prune_tree(&entry.path());
            }
        }
    }
    let _ = fs::remove_dir(dir);
}
