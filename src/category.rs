//! File categorization by extension.
//!
//! Maps file extensions to the broad categories the tool sorts into. The
//! table is fixed for the lifetime of a run and lookups are case-insensitive:
//! extensions are normalized to uppercase before matching.

use std::collections::HashMap;
use std::path::Path;

/// A destination category for a classified file.
///
/// Each category owns one flat subfolder directly under the root being
/// organized. Files whose extension matches no category stay where they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Image files (JPG, PNG, SVG, ...)
    Image,
    /// Document files (PDF, DOCX, TXT, ...)
    Document,
    /// Audio files (MP3, OGG, WAV, ...)
    Audio,
    /// Video files (MP4, MKV, MOV, ...)
    Video,
    /// Archive files (ZIP, TAR, GZ), extracted rather than moved.
    Archive,
}

impl Category {
    /// All categories, in the order they are reported.
    pub const ALL: [Category; 5] = [
        Category::Image,
        Category::Document,
        Category::Audio,
        Category::Video,
        Category::Archive,
    ];

    /// Returns the folder name this category's files are collected under.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsift::category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Archive.dir_name(), "archives");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Document => "documents",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Archive => "archives",
        }
    }

    /// Whether `name` is one of the five category folder names.
    ///
    /// Directories carrying a reserved name are never scanned, wherever they
    /// appear in the tree; otherwise a second run would reprocess its own
    /// output.
    pub fn is_reserved_dir(name: &str) -> bool {
        Category::ALL.iter().any(|c| c.dir_name() == name)
    }
}

/// Fixed mapping from normalized (uppercase, no dot) extension to category.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    map: HashMap<&'static str, Category>,
}

impl ExtensionTable {
    /// Creates the table with the standard extension set.
    pub fn new() -> Self {
        let mut map = HashMap::new();

        for ext in ["JPEG", "PNG", "JPG", "SVG"] {
            map.insert(ext, Category::Image);
        }
        for ext in ["TXT", "DOC", "DOCX", "PDF", "XLSX", "PPTX"] {
            map.insert(ext, Category::Document);
        }
        for ext in ["MP3", "OGG", "WAV", "AMR"] {
            map.insert(ext, Category::Audio);
        }
        for ext in ["AVI", "MP4", "MOV", "MKV"] {
            map.insert(ext, Category::Video);
        }
        for ext in ["ZIP", "GZ", "TAR"] {
            map.insert(ext, Category::Archive);
        }

        Self { map }
    }

    /// Looks up a normalized extension.
    ///
    /// The argument must already be uppercase; [`normalized_extension`]
    /// produces keys in that form.
    pub fn lookup(&self, ext: &str) -> Option<Category> {
        self.map.get(ext).copied()
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the classification key for a path: the text after the last `.`
/// of the file name, uppercased.
///
/// Returns `None` when the file name has no extension. A leading dot is part
/// of the stem, so a dotfile such as `.bashrc` has no extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dirsift::category::normalized_extension;
///
/// assert_eq!(normalized_extension(Path::new("photo.jpg")), Some("JPG".to_string()));
/// assert_eq!(normalized_extension(Path::new("backup.tar.gz")), Some("GZ".to_string()));
/// assert_eq!(normalized_extension(Path::new("README")), None);
/// assert_eq!(normalized_extension(Path::new(".bashrc")), None);
/// ```
pub fn normalized_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .filter(|ext| !ext.is_empty())
}
