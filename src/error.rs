//! Error Type Definition Module
//!
//! This module defines the failure taxonomy of the EPUB decode pipeline.
//! All errors are uniformly wrapped in the [Error] enumeration for
//! convenient handling by the caller.
//!
//! The pipeline never retries or recovers internally: the first failure
//! aborts parsing and is surfaced verbatim, together with a recovery
//! suggestion obtained from [Error::recovery_suggestion].

use thiserror::Error;

/// Types of errors that can occur while decoding an EPUB publication
///
/// The first four variants form the pipeline failure taxonomy; the remaining
/// variants wrap lower-level failures raised while reading or tokenizing the
/// package document itself.
#[derive(Debug, Error)]
pub enum Error {
    /// Archive extraction failure
    ///
    /// The container is not a valid or readable ZIP archive. The underlying
    /// reason from the zip module is kept for diagnostics.
    #[error("Unzip failed: the archive could not be extracted: {reason}")]
    UnzipFailed { reason: zip::result::ZipError },

    /// Missing OCF container descriptor
    ///
    /// The fixed `META-INF/container.xml` file is absent or unreadable.
    /// Without it the package document cannot be located.
    #[error("Container missing: \"META-INF/container.xml\" is absent or unreadable.")]
    ContainerMissing,

    /// Container descriptor does not name a package document
    ///
    /// The container descriptor was read, but no `rootfile` element carries
    /// a `full-path` attribute pointing at the package document.
    #[error("Content path missing: the container descriptor does not name a package document.")]
    ContentPathMissing,

    /// Navigation document cannot be resolved or read
    ///
    /// Raised when neither the spine's `toc` reference nor the manifest
    /// yields a readable navigation document.
    #[error("Table of contents missing: the navigation document could not be resolved.")]
    TableOfContentsMissing,

    /// Missing required attribute error
    ///
    /// A navigation point lacks an attribute the hierarchy depends on,
    /// such as its `id` or its content `src`. Navigation nodes are
    /// load-bearing for reading-position bookmarking, so this aborts the
    /// whole parse instead of skipping the node.
    #[error(
        "Missing required attribute: the \"{attribute}\" attribute is required on the \"{tag}\" element."
    )]
    MissingAttribute { tag: String, attribute: String },

    /// XML parsing failure error
    ///
    /// Raised when event parsing ends without a completed root element,
    /// which happens for empty input or truncated documents.
    #[error("Malformed XML: parsing ended without a complete root element.")]
    MalformedXml,

    #[error("IO error: {source}")]
    Io { source: std::io::Error },

    /// XML tokenization error raised by the quick_xml library
    #[error("XML error: {source}")]
    Xml { source: quick_xml::Error },
}

impl Error {
    /// Returns a short hint describing how the caller might recover
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Error::UnzipFailed { .. } => "Make sure the file is a valid .epub archive.",
            Error::ContainerMissing => {
                "Make sure the archive contains \"META-INF/container.xml\"."
            }
            Error::ContentPathMissing => {
                "Check that a <rootfile> element in container.xml carries a \"full-path\" attribute."
            }
            Error::TableOfContentsMissing => {
                "Check that the <spine> names a \"toc\" id that resolves through the manifest."
            }
            Error::MissingAttribute { .. } => {
                "Check the navigation document: every <navPoint> needs an id and a content src."
            }
            Error::MalformedXml => "Check that the document is complete and not truncated.",
            Error::Io { .. } => "Check that the extracted files are readable on disk.",
            Error::Xml { .. } => "Check that the package document is well-formed XML.",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io { source: value }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(value: quick_xml::Error) -> Self {
        Error::Xml { source: value }
    }
}


#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::MissingAttribute {
                    tag: l_tag,
                    attribute: l_attribute,
                },
                Self::MissingAttribute {
                    tag: r_tag,
                    attribute: r_attribute,
                },
            ) => l_tag == r_tag && l_attribute == r_attribute,

            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}
