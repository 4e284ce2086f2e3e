//! Container and Content Locator Module
//!
//! Implements the OCF side of the pipeline: locating the package document
//! through the fixed `META-INF/container.xml` descriptor, loading it, and
//! later resolving the navigation document through the spine/manifest
//! cross-reference.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    types::{Manifest, Spine},
    xml::{self, Element},
};

/// Fixed location of the OCF container descriptor, relative to the
/// extraction root
const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Loaded package document plus the directory it resolves paths against
///
/// Opening the service performs the whole locate-and-load sequence; the
/// accessors then hand out the package document's sub-elements for the
/// component parsers to walk. The service is read-only after construction.
pub(crate) struct ContentService {
    /// The parsed package document root element
    package: Element,

    /// The directory containing the package document
    content_directory: PathBuf,
}

impl ContentService {
    /// Locates and loads the package document under `directory`
    ///
    /// The sequence follows the OCF container rules:
    /// 1. read `META-INF/container.xml`; failure to read or parse it is
    ///    [Error::ContainerMissing];
    /// 2. take the `full-path` attribute of the first `rootfile` element;
    ///    its absence is [Error::ContentPathMissing];
    /// 3. load and parse the package document at that path. The content
    ///    directory is the package document's parent.
    pub fn open(directory: &Path) -> Result<Self, Error> {
        let descriptor = fs::read_to_string(directory.join(CONTAINER_PATH))
            .map_err(|_| Error::ContainerMissing)?;
        let container = xml::parse(&descriptor).map_err(|_| Error::ContainerMissing)?;

        let full_path = container
            .first("rootfiles")
            .and_then(|rootfiles| rootfiles.first("rootfile"))
            .and_then(|rootfile| rootfile.attr("full-path"))
            .ok_or(Error::ContentPathMissing)?;

        let package_path = directory.join(full_path);
        let content_directory = package_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| directory.to_path_buf());

        let package = xml::parse(&fs::read_to_string(&package_path)?)?;

        Ok(ContentService {
            package,
            content_directory,
        })
    }

    pub fn content_directory(&self) -> &Path {
        &self.content_directory
    }

    /// The `<metadata>` sub-element of the package document, if present
    pub fn metadata(&self) -> Option<&Element> {
        self.package.first("metadata")
    }

    /// The `<manifest>` sub-element of the package document, if present
    pub fn manifest(&self) -> Option<&Element> {
        self.package.first("manifest")
    }

    /// The `<spine>` sub-element of the package document, if present
    pub fn spine(&self) -> Option<&Element> {
        self.package.first("spine")
    }

    /// Loads and parses the navigation document at `file`
    ///
    /// `file` is the manifest path of the navigation document, relative to
    /// the content directory. Any read or parse failure collapses into
    /// [Error::TableOfContentsMissing]: from the caller's point of view an
    /// unreadable navigation document and an absent one are the same.
    pub fn table_of_contents(&self, file: &str) -> Result<Element, Error> {
        let path = self.content_directory.join(file);
        let data = fs::read_to_string(path).map_err(|_| Error::TableOfContentsMissing)?;
        xml::parse(&data).map_err(|_| Error::TableOfContentsMissing)
    }
}

/// Resolves the navigation document's manifest path
///
/// Resolution order:
/// 1. the spine's `toc` reference, looked up in the manifest;
/// 2. the first manifest item carrying a `nav` property token, in document
///    order;
/// 3. an item literally keyed `"nav"` or `"toc"`.
///
/// When none resolves the publication has no usable table of contents and
/// [Error::TableOfContentsMissing] is returned.
pub(crate) fn navigation_path(spine: &Spine, manifest: &Manifest) -> Result<String, Error> {
    if let Some(toc) = spine.toc.as_deref() {
        if let Some(path) = manifest.path_for(toc) {
            return Ok(path.to_string());
        }
    }

    let nav_item = manifest.items.values().find(|item| {
        item.properties
            .as_deref()
            .is_some_and(|properties| properties.split_whitespace().any(|token| token == "nav"))
    });
    if let Some(item) = nav_item {
        return Ok(item.path.clone());
    }

    for key in ["nav", "toc"] {
        if let Some(path) = manifest.path_for(key) {
            return Ok(path.to_string());
        }
    }

    Err(Error::TableOfContentsMissing)
}
