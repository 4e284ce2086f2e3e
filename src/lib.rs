//! Folio
//!
//! A Rust library for decoding EPUB eBook files.
//!
//! This library parses EPUB publications into plain data structures,
//! supporting both packed `.epub` archives and already-extracted
//! directories. It locates the package document through the OCF
//! container descriptor, extracts bibliographic metadata, the resource
//! manifest, the spine reading order and the hierarchical table of
//! contents, and can report parsing progress through a delegate.
//!
//! ## Features
//!
//! - Parse EPUB container structure, extract metadata, manifest, spine
//!   and table of contents.
//! - Accept archives and extracted directories interchangeably.
//! - Tolerant of common real-world malformations: bad manifest and
//!   spine entries are skipped, unknown media types never fail.
//! - Observe parsing milestones via [ParserDelegate].
//!
//! ## Quick Start
//!
//! ```rust, ignore
//! # use folio::Document;
//! # fn main() -> Result<(), folio::Error> {
//! let document = Document::parse("path/to/file.epub")?;
//!
//! println!("Title: {:?}", document.title());
//! println!("Author: {:?}", document.author());
//!
//! // Walk the reading order
//! for item in &document.spine.items {
//!     println!("{:?}", document.manifest.path_for(&item.idref));
//! }
//!
//! # Ok(())
//! # }
//! ```

pub(crate) mod content;
pub(crate) mod package;
pub(crate) mod toc;
pub(crate) mod xml;

pub mod archive;
pub mod error;
pub mod parser;
pub mod types;

pub use archive::{ArchiveService, ZipArchiveService};
pub use error::Error;
pub use parser::{EpubParser, ParserDelegate};
pub use types::{
    Creator, Document, Manifest, ManifestItem, MediaType, Metadata, PageProgressionDirection,
    Spine, SpineItem, TableOfContents,
};
