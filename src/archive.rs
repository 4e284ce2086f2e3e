//! Archive Extraction Module
//!
//! EPUB publications are ZIP-based OCF containers. This module holds the
//! [ArchiveService] seam the parser extracts archives through, plus the
//! default zip-backed implementation. A custom service can be substituted
//! to change where or how archives are unpacked.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use zip::{ZipArchive, result::ZipError};

use crate::error::Error;

/// Extraction seam between the parser and the archive mechanism
///
/// Implementations unpack the archive at `archive` into a directory and
/// return that directory's path. The lifecycle of the extracted tree,
/// including its eventual deletion, belongs to the caller; the parser
/// itself never writes or removes files.
pub trait ArchiveService {
    /// Extracts the archive and returns the directory holding its contents
    ///
    /// Every failure surfaces as [Error::UnzipFailed] with the underlying
    /// reason preserved.
    fn unarchive(&self, archive: &Path) -> Result<PathBuf, Error>;
}

/// Default [ArchiveService] backed by the zip crate
///
/// Extracts into a freshly created unique directory under the system
/// temporary directory. Entry paths are sanitized by the zip crate's
/// extraction routine, so entries cannot escape the destination.
#[derive(Debug, Default)]
pub struct ZipArchiveService;

impl ArchiveService for ZipArchiveService {
    fn unarchive(&self, archive: &Path) -> Result<PathBuf, Error> {
        let file = File::open(archive).map_err(|err| Error::UnzipFailed {
            reason: ZipError::Io(err),
        })?;
        let mut zip = ZipArchive::new(BufReader::new(file))
            .map_err(|reason| Error::UnzipFailed { reason })?;

        let destination = tempfile::Builder::new()
            .prefix("folio-")
            .tempdir()
            .map_err(|err| Error::UnzipFailed {
                reason: ZipError::Io(err),
            })?
            .keep();

        zip.extract(&destination)
            .map_err(|reason| Error::UnzipFailed { reason })?;

        Ok(destination)
    }
}
