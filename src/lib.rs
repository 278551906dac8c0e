//! dirsift - a concurrent directory sorting utility
//!
//! This library scans a directory tree in parallel, classifies every regular
//! file by extension into a category (images, documents, audio, video,
//! archives), relocates categorized files into flat category folders under
//! the root, extracts archives into per-archive folders, and removes the
//! directories the relocation emptied.

pub mod archive;
pub mod category;
pub mod cli;
pub mod organizer;
pub mod output;
pub mod prune;
pub mod scanner;

pub use category::{Category, ExtensionTable};
pub use organizer::{OrganizeError, OrganizeSummary};
pub use scanner::ScanReport;

pub use cli::run_cli;
