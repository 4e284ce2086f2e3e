//! Parsing Facade Module
//!
//! [EpubParser] drives the whole decode pipeline: unarchiving, content
//! location, package parsing and navigation parsing, in a fixed order,
//! reporting each milestone to an optional [ParserDelegate]. The facade
//! itself holds no publication state; every parse call is independent
//! and the sub-parsers are pure functions over XML elements.

use std::path::Path;

use crate::{
    archive::{ArchiveService, ZipArchiveService},
    content::{self, ContentService},
    error::Error,
    package,
    toc,
    types::{Document, Manifest, Metadata, Spine, TableOfContents},
};

/// Observer of parsing progress
///
/// Every method has a no-op default, so a delegate implements only the
/// milestones it cares about. Callbacks run synchronously on the calling
/// thread, in pipeline order, and must not assume anything beyond the
/// value they receive: the parse may still fail after any of them.
pub trait ParserDelegate {
    /// Called first, before any work on `path` has started
    fn did_begin_parsing(&self, path: &Path) {
        let _ = path;
    }

    /// Called once the publication's files are available in `directory`
    ///
    /// For archive input this is the freshly extracted directory; for
    /// directory input it is the input path itself.
    fn did_unzip_archive(&self, directory: &Path) {
        let _ = directory;
    }

    /// Called once the package document was found and loaded
    fn did_locate_content(&self, directory: &Path) {
        let _ = directory;
    }

    fn did_parse_spine(&self, spine: &Spine) {
        let _ = spine;
    }

    fn did_parse_metadata(&self, metadata: &Metadata) {
        let _ = metadata;
    }

    fn did_parse_manifest(&self, manifest: &Manifest) {
        let _ = manifest;
    }

    fn did_parse_table_of_contents(&self, table_of_contents: &TableOfContents) {
        let _ = table_of_contents;
    }

    /// Called last on success, after the document is fully assembled
    fn did_finish_parsing(&self, path: &Path) {
        let _ = path;
    }

    /// Called last on failure, with the error that aborted the parse
    fn did_fail_parsing(&self, path: &Path, error: &Error) {
        let _ = (path, error);
    }
}

/// Decodes EPUB publications into [Document] values
///
/// ## Example
///
/// ```no_run
/// use folio::EpubParser;
///
/// let document = EpubParser::new().parse("novel.epub")?;
/// println!("{:?}", document.title());
/// # Ok::<(), folio::Error>(())
/// ```
pub struct EpubParser<'a> {
    archive_service: Box<dyn ArchiveService>,
    delegate: Option<&'a dyn ParserDelegate>,
}

impl Default for EpubParser<'_> {
    fn default() -> Self {
        EpubParser::new()
    }
}

impl<'a> EpubParser<'a> {
    /// Creates a parser backed by the ZIP archive service, without a
    /// delegate
    pub fn new() -> Self {
        EpubParser {
            archive_service: Box::new(ZipArchiveService),
            delegate: None,
        }
    }

    /// Attaches a progress delegate
    ///
    /// The delegate is borrowed for the parser's lifetime, never owned.
    pub fn delegate(mut self, delegate: &'a dyn ParserDelegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Replaces the archive service used for non-directory input
    pub fn archive_service(mut self, service: Box<dyn ArchiveService>) -> Self {
        self.archive_service = service;
        self
    }

    /// Decodes the publication at `path`
    ///
    /// `path` may be an `.epub` archive, which is extracted first, or a
    /// directory holding an already-extracted publication, which is used
    /// in place. On failure no partial document is produced; the error is
    /// also reported to the delegate via
    /// [ParserDelegate::did_fail_parsing].
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Document, Error> {
        let path = path.as_ref();
        self.notify(|delegate| delegate.did_begin_parsing(path));

        match self.parse_publication(path) {
            Ok(document) => {
                self.notify(|delegate| delegate.did_finish_parsing(path));
                Ok(document)
            }
            Err(error) => {
                self.notify(|delegate| delegate.did_fail_parsing(path, &error));
                Err(error)
            }
        }
    }

    fn parse_publication(&self, path: &Path) -> Result<Document, Error> {
        let directory = if path.is_dir() {
            path.to_path_buf()
        } else {
            self.archive_service.unarchive(path)?
        };
        self.notify(|delegate| delegate.did_unzip_archive(&directory));

        let content = ContentService::open(&directory)?;
        self.notify(|delegate| delegate.did_locate_content(content.content_directory()));

        // Absent package sections read as empty: the sub-parsers only ever
        // look at children, so a default element yields a default value.
        let spine = content
            .spine()
            .map(package::parse_spine)
            .unwrap_or_default();
        self.notify(|delegate| delegate.did_parse_spine(&spine));

        let metadata = content
            .metadata()
            .map(package::parse_metadata)
            .unwrap_or_default();
        self.notify(|delegate| delegate.did_parse_metadata(&metadata));

        let manifest = content
            .manifest()
            .map(package::parse_manifest)
            .unwrap_or_default();
        self.notify(|delegate| delegate.did_parse_manifest(&manifest));

        let navigation_file = content::navigation_path(&spine, &manifest)?;
        let navigation = content.table_of_contents(&navigation_file)?;
        let table_of_contents = toc::parse_table_of_contents(&navigation)?;
        self.notify(|delegate| delegate.did_parse_table_of_contents(&table_of_contents));

        Ok(Document {
            directory,
            content_directory: content.content_directory().to_path_buf(),
            metadata,
            manifest,
            spine,
            table_of_contents,
        })
    }

    fn notify(&self, callback: impl FnOnce(&dyn ParserDelegate)) {
        if let Some(delegate) = self.delegate {
            callback(delegate);
        }
    }
}
