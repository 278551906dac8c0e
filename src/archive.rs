//! Archive extraction keyed by file name.
//!
//! Supports `.zip`, `.tar`, and `.tar.gz`. Anything else that was classified
//! as an archive (a bare `.gz`, for instance) is an unsupported format; the
//! caller leaves such files in place.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// An archive format the extractor can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Detects the format from the file name, case-insensitively.
    ///
    /// Returns `None` for names the extractor has no handler for.
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") {
            Some(ArchiveFormat::TarGz)
        } else if name.ends_with(".tar") {
            Some(ArchiveFormat::Tar)
        } else {
            None
        }
    }
}

/// Why an extraction did not produce contents.
#[derive(Debug)]
pub enum ExtractError {
    /// The archive file vanished before it could be opened.
    SourceMissing(PathBuf),
    /// The file name matches no format the extractor handles.
    UnsupportedFormat(PathBuf),
    /// The archive could not be read or decoded.
    Malformed { path: PathBuf, detail: String },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceMissing(path) => {
                write!(f, "archive {} no longer exists", path.display())
            }
            Self::UnsupportedFormat(path) => {
                write!(f, "unsupported archive format: {}", path.display())
            }
            Self::Malformed { path, detail } => {
                write!(f, "could not extract {}: {}", path.display(), detail)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extracts all of `archive`'s contents into `destination`.
///
/// `destination` must already exist. The archive file itself is left
/// untouched; deleting it after a successful extraction is the caller's
/// decision.
pub fn unpack(archive: &Path, destination: &Path) -> Result<(), ExtractError> {
    let format = ArchiveFormat::detect(archive)
        .ok_or_else(|| ExtractError::UnsupportedFormat(archive.to_path_buf()))?;

    let file = File::open(archive).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            ExtractError::SourceMissing(archive.to_path_buf())
        } else {
            malformed(archive, err)
        }
    })?;

    match format {
        ArchiveFormat::Zip => zip::ZipArchive::new(file)
            .and_then(|mut contents| contents.extract(destination))
            .map_err(|err| malformed(archive, err)),
        ArchiveFormat::Tar => tar::Archive::new(file)
            .unpack(destination)
            .map_err(|err| malformed(archive, err)),
        ArchiveFormat::TarGz => tar::Archive::new(GzDecoder::new(file))
            .unpack(destination)
            .map_err(|err| malformed(archive, err)),
    }
}

fn malformed(path: &Path, err: impl std::fmt::Display) -> ExtractError {
    ExtractError::Malformed {
        path: path.to_path_buf(),
        detail: err.to_string(),
    }
}
