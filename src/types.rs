use std::path::PathBuf;

use indexmap::IndexMap;

use crate::{error::Error, parser::EpubParser};

/// A fully decoded EPUB publication
///
/// The `Document` structure is the immutable aggregate produced by a single
/// parse call. It owns every sub-entity exclusively: the bibliographic
/// metadata, the resource inventory, the linear reading order and the
/// hierarchical table of contents. Sub-entities carry no back-references,
/// so the whole value is a plain tree.
///
/// Derived properties such as [Document::title] and [Document::cover] are
/// computed on demand by cross-referencing the owned components; nothing is
/// cached or mutated after assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The root directory holding the extracted publication files
    ///
    /// When the parse input was already a directory, this is that directory
    /// unchanged. Otherwise it is the directory the archive was extracted
    /// into; its lifecycle belongs to the caller.
    pub directory: PathBuf,

    /// The directory containing the package document
    ///
    /// All relative paths in the manifest resolve against this directory.
    /// It is determined by the `full-path` attribute in the OCF container
    /// descriptor.
    pub content_directory: PathBuf,

    /// Bibliographic metadata extracted from the package document
    pub metadata: Metadata,

    /// The inventory of every resource in the publication, keyed by id
    pub manifest: Manifest,

    /// The declared default linear reading order
    pub spine: Spine,

    /// The hierarchical table of contents from the navigation document
    pub table_of_contents: TableOfContents,
}

impl Document {
    /// Decodes the EPUB publication at `path` with a default parser
    ///
    /// This is a convenience shorthand for [EpubParser::parse] without a
    /// progress delegate. The path may point at an `.epub` archive or at an
    /// already-extracted directory.
    pub fn parse(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        EpubParser::new().parse(path)
    }

    /// The publication title, when the metadata declares one
    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    /// The primary creator's name, when the metadata declares one
    pub fn author(&self) -> Option<&str> {
        self.metadata
            .creator
            .as_ref()
            .and_then(|creator| creator.name.as_deref())
    }

    /// The publisher name, when the metadata declares one
    pub fn publisher(&self) -> Option<&str> {
        self.metadata.publisher.as_deref()
    }

    /// The resolved path of the cover image
    ///
    /// The cover is identified by the metadata's cover id, which must
    /// resolve to a manifest item; its path is joined onto the content
    /// directory. Returns `None` when the id is absent or dangling.
    pub fn cover(&self) -> Option<PathBuf> {
        let cover_id = self.metadata.cover_id.as_deref()?;
        let item = self.manifest.items.get(cover_id)?;
        Some(self.content_directory.join(&item.path))
    }
}

/// Bibliographic metadata of a publication
///
/// Every field maps 1:1 to a Dublin Core element in the package document's
/// `<metadata>` block. All fields are optional: real-world files omit most
/// of them, and even the title, identifier and language that the EPUB
/// standard requires must tolerate absence in malformed input. A metadata-less
/// document yields the default value with everything unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub contributor: Option<Creator>,
    pub coverage: Option<String>,
    pub creator: Option<Creator>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub identifier: Option<String>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub relation: Option<String>,
    pub rights: Option<String>,
    pub source: Option<String>,
    pub subject: Option<String>,
    pub title: Option<String>,
    pub r#type: Option<String>,

    /// The manifest id of the cover image
    ///
    /// Taken from the `content` attribute of the last `<meta name="cover">`
    /// element in document order.
    pub cover_id: Option<String>,
}

/// A creator or contributor of the publication
///
/// Represents both `dc:creator` and `dc:contributor` elements. The `role`
/// is the MARC relator code from the `opf:role` attribute, and `file_as`
/// the sort form from `opf:file-as`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Creator {
    pub name: Option<String>,
    pub role: Option<String>,
    pub file_as: Option<String>,
}

/// The resource inventory declared in the package document
///
/// Every resource that is part of the publication is declared here, keyed
/// by item id. Iteration order follows the document order of the manifest,
/// with last-writer-wins semantics on duplicate ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Optional id attribute of the `<manifest>` element itself
    pub id: Option<String>,

    /// The declared items, keyed by item id
    pub items: IndexMap<String, ManifestItem>,
}

impl Manifest {
    /// Returns the relative path of the item with the given id
    pub fn path_for(&self, id: &str) -> Option<&str> {
        self.items.get(id).map(|item| item.path.as_str())
    }
}

/// A single resource declared in the manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestItem {
    /// The unique identifier of this item within the manifest
    pub id: String,

    /// The resource path, relative to the content directory
    ///
    /// Kept verbatim from the `href` attribute: forward-slash separated and
    /// unresolved, so the same manifest parses identically on any platform.
    pub path: String,

    /// The typed media type of the resource
    pub media_type: MediaType,

    /// Optional space-separated property tokens, copied verbatim
    pub properties: Option<String>,
}

/// Media types a publication resource can declare
///
/// Closed mapping over the MIME strings commonly found in EPUB manifests.
/// Unrecognized or absent media types map to [MediaType::Unknown] rather
/// than failing, which keeps the inventory forward compatible with media
/// types this library does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Gif,
    Jpeg,
    Png,
    Svg,
    Xhtml,
    JavaScript,
    /// The NCX navigation document, `application/x-dtbncx+xml`
    Ncx,
    OpenType,
    Woff,
    /// Media overlay documents, `application/smil+xml`
    MediaOverlay,
    /// Pronunciation lexicons, `application/pls+xml`
    Pls,
    Mp3,
    Mp4,
    Css,
    Woff2,
    /// Catch-all for media types outside the closed mapping
    Unknown,
}

impl MediaType {
    /// Maps a MIME string to its typed value
    ///
    /// Never fails: strings outside the table yield [MediaType::Unknown].
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "image/gif" => MediaType::Gif,
            "image/jpeg" => MediaType::Jpeg,
            "image/png" => MediaType::Png,
            "image/svg+xml" => MediaType::Svg,
            "application/xhtml+xml" => MediaType::Xhtml,
            "application/javascript" => MediaType::JavaScript,
            "application/x-dtbncx+xml" => MediaType::Ncx,
            "application/font-sfnt" => MediaType::OpenType,
            "application/font-woff" => MediaType::Woff,
            "application/smil+xml" => MediaType::MediaOverlay,
            "application/pls+xml" => MediaType::Pls,
            "audio/mpeg" => MediaType::Mp3,
            "audio/mp4" => MediaType::Mp4,
            "text/css" => MediaType::Css,
            "font/woff2" => MediaType::Woff2,
            _ => MediaType::Unknown,
        }
    }

    /// Returns the MIME string this value was mapped from
    ///
    /// [MediaType::Unknown] carries no payload, so it yields `None`.
    pub fn as_mime(&self) -> Option<&'static str> {
        match self {
            MediaType::Gif => Some("image/gif"),
            MediaType::Jpeg => Some("image/jpeg"),
            MediaType::Png => Some("image/png"),
            MediaType::Svg => Some("image/svg+xml"),
            MediaType::Xhtml => Some("application/xhtml+xml"),
            MediaType::JavaScript => Some("application/javascript"),
            MediaType::Ncx => Some("application/x-dtbncx+xml"),
            MediaType::OpenType => Some("application/font-sfnt"),
            MediaType::Woff => Some("application/font-woff"),
            MediaType::MediaOverlay => Some("application/smil+xml"),
            MediaType::Pls => Some("application/pls+xml"),
            MediaType::Mp3 => Some("audio/mpeg"),
            MediaType::Mp4 => Some("audio/mp4"),
            MediaType::Css => Some("text/css"),
            MediaType::Woff2 => Some("font/woff2"),
            MediaType::Unknown => None,
        }
    }

    /// Whether this media type is an image type
    ///
    /// Useful for sanity-checking the cover id resolution: a cover should
    /// point at an image resource.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            MediaType::Gif | MediaType::Jpeg | MediaType::Png | MediaType::Svg
        )
    }
}

/// The declared default linear reading order of the publication
///
/// Items appear exactly in declaration order; that order is semantically
/// the reading order and must be preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spine {
    /// Optional id attribute of the `<spine>` element itself
    pub id: Option<String>,

    /// The manifest id of the navigation document, from the `toc` attribute
    pub toc: Option<String>,

    /// The global page progression direction
    pub page_progression_direction: PageProgressionDirection,

    /// The ordered reading sequence
    pub items: Vec<SpineItem>,
}

/// A single entry in the reading order
#[derive(Debug, Clone, PartialEq)]
pub struct SpineItem {
    /// Optional identifier of this spine entry
    pub id: Option<String>,

    /// The manifest item this entry references; required and non-empty
    pub idref: String,

    /// Whether this entry belongs to the linear reading flow
    ///
    /// `false` only when the source attribute is literally `"no"`;
    /// absent or unrecognized values default to `true`. Non-linear items
    /// are auxiliary content reached out of sequence, such as footnotes.
    pub linear: bool,
}

/// Direction in which pages progress when reading
///
/// Defaults to left-to-right; right-to-left is used by Arabic, Hebrew and
/// other RTL scripts. Unrecognized declarations fall back to the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageProgressionDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl PageProgressionDirection {
    /// Parses the two-value `page-progression-direction` enumeration
    pub(crate) fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("rtl") => PageProgressionDirection::RightToLeft,
            _ => PageProgressionDirection::LeftToRight,
        }
    }
}

/// One node of the hierarchical table of contents
///
/// The tree mirrors the nesting of `navPoint` elements in the navigation
/// document exactly: arbitrarily deep, arbitrarily wide, siblings in source
/// order. Each parent owns its children by value, so no cycles can exist.
///
/// The root node is synthetic: its label is the navigation document's
/// title, its id is `"0"`, and its `item` field is reused to carry the
/// document-unique-identifier cross-check value from the NCX head.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOfContents {
    /// The display text of this navigation point
    pub label: String,

    /// The unique identifier of this navigation point
    ///
    /// Callers use these ids for reading-position bookmarking, which is why
    /// a navigation point without one fails the parse instead of being
    /// skipped.
    pub id: String,

    /// The content reference this point links to, possibly with a fragment
    pub item: Option<String>,

    /// Nested navigation points, in source order
    pub sub_table: Vec<TableOfContents>,
}

#[cfg(test)]
mod tests {
    mod media_type_tests {
        use crate::types::MediaType;

        /// Every known MIME string round-trips through the table
        #[test]
        fn test_known_mime_round_trip() {
            let mimes = [
                "image/gif",
                "image/jpeg",
                "image/png",
                "image/svg+xml",
                "application/xhtml+xml",
                "application/javascript",
                "application/x-dtbncx+xml",
                "application/font-sfnt",
                "application/font-woff",
                "application/smil+xml",
                "application/pls+xml",
                "audio/mpeg",
                "audio/mp4",
                "text/css",
                "font/woff2",
            ];

            for mime in mimes {
                let media_type = MediaType::from_mime(mime);
                assert_ne!(media_type, MediaType::Unknown, "{mime} should be known");
                assert_eq!(media_type.as_mime(), Some(mime));
            }
        }

        /// Unrecognized MIME strings map to Unknown, never an error
        #[test]
        fn test_unknown_mime_maps_to_unknown() {
            assert_eq!(
                MediaType::from_mime("application/x-custom"),
                MediaType::Unknown
            );
            assert_eq!(MediaType::from_mime(""), MediaType::Unknown);
            assert_eq!(MediaType::Unknown.as_mime(), None);
        }

        #[test]
        fn test_image_classification() {
            assert!(MediaType::Jpeg.is_image());
            assert!(MediaType::Svg.is_image());
            assert!(!MediaType::Xhtml.is_image());
            assert!(!MediaType::Unknown.is_image());
        }
    }

    mod document_tests {
        use std::path::PathBuf;

        use indexmap::IndexMap;

        use crate::types::{
            Creator, Document, Manifest, ManifestItem, MediaType, Metadata, Spine, TableOfContents,
        };

        fn document_with(metadata: Metadata, manifest: Manifest) -> Document {
            Document {
                directory: PathBuf::from("/tmp/book"),
                content_directory: PathBuf::from("/tmp/book/OEBPS"),
                metadata,
                manifest,
                spine: Spine::default(),
                table_of_contents: TableOfContents::default(),
            }
        }

        /// A resolvable cover id yields content_directory joined with the item path
        #[test]
        fn test_cover_resolves_through_manifest() {
            let metadata = Metadata {
                cover_id: Some("cover-image".to_string()),
                ..Metadata::default()
            };
            let mut items = IndexMap::new();
            items.insert(
                "cover-image".to_string(),
                ManifestItem {
                    id: "cover-image".to_string(),
                    path: "images/cover.jpg".to_string(),
                    media_type: MediaType::Jpeg,
                    properties: None,
                },
            );
            let document = document_with(metadata, Manifest { id: None, items });

            assert_eq!(
                document.cover(),
                Some(PathBuf::from("/tmp/book/OEBPS/images/cover.jpg"))
            );
        }

        /// An absent or dangling cover id yields no cover
        #[test]
        fn test_cover_absent_or_dangling() {
            let document = document_with(Metadata::default(), Manifest::default());
            assert_eq!(document.cover(), None);

            let metadata = Metadata {
                cover_id: Some("missing".to_string()),
                ..Metadata::default()
            };
            let document = document_with(metadata, Manifest::default());
            assert_eq!(document.cover(), None);
        }

        #[test]
        fn test_author_is_first_creator_name() {
            let metadata = Metadata {
                creator: Some(Creator {
                    name: Some("Franz Kafka".to_string()),
                    role: Some("aut".to_string()),
                    file_as: Some("Kafka, Franz".to_string()),
                }),
                ..Metadata::default()
            };
            let document = document_with(metadata, Manifest::default());
            assert_eq!(document.author(), Some("Franz Kafka"));
        }
    }
}
