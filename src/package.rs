//! Package Document Parsing Module
//!
//! The component parsers for the three sub-elements of the package
//! document: `<metadata>`, `<manifest>` and `<spine>`. Each is a pure
//! function of its XML subtree and never fails: missing optional data
//! yields unset fields, and malformed individual items are skipped with a
//! warning rather than voiding the whole inventory.

use indexmap::IndexMap;
use log::warn;

use crate::{
    types::{
        Creator, Manifest, ManifestItem, MediaType, Metadata, PageProgressionDirection, Spine,
        SpineItem,
    },
    xml::Element,
};

/// Extracts the bibliographic metadata from the `<metadata>` subtree
///
/// Each Dublin Core child maps 1:1 to a field by taking the first matching
/// element's text; absence yields an unset field, never an error. The cover
/// id comes from scanning all `<meta>` children for `name="cover"`, with
/// the last match in document order winning.
pub(crate) fn parse_metadata(element: &Element) -> Metadata {
    let mut metadata = Metadata {
        contributor: creator_of(element, "contributor"),
        coverage: text_of(element, "coverage"),
        creator: creator_of(element, "creator"),
        date: text_of(element, "date"),
        description: text_of(element, "description"),
        format: text_of(element, "format"),
        identifier: text_of(element, "identifier"),
        language: text_of(element, "language"),
        publisher: text_of(element, "publisher"),
        relation: text_of(element, "relation"),
        rights: text_of(element, "rights"),
        source: text_of(element, "source"),
        subject: text_of(element, "subject"),
        title: text_of(element, "title"),
        r#type: text_of(element, "type"),
        cover_id: None,
    };

    for meta in element.children_named("meta") {
        if meta.attr("name") == Some("cover") {
            metadata.cover_id = meta.attr("content").map(str::to_string);
        }
    }

    metadata
}

/// Extracts the resource inventory from the `<manifest>` subtree
///
/// Items missing `id` or `href` are skipped; duplicate ids follow map
/// semantics, so the later declaration wins. Unrecognized media types
/// become [MediaType::Unknown].
pub(crate) fn parse_manifest(element: &Element) -> Manifest {
    let mut items = IndexMap::with_capacity(element.children.len());

    for item in element.children_named("item") {
        let (Some(id), Some(href)) = (item.attr("id"), item.attr("href")) else {
            warn!("Skipping manifest item without id or href.");
            continue;
        };

        items.insert(
            id.to_string(),
            ManifestItem {
                id: id.to_string(),
                path: href.to_string(),
                media_type: item
                    .attr("media-type")
                    .map(MediaType::from_mime)
                    .unwrap_or(MediaType::Unknown),
                properties: item.attr("properties").map(str::to_string),
            },
        );
    }

    Manifest {
        id: element.attr("id").map(str::to_string),
        items,
    }
}

/// Extracts the reading order from the `<spine>` subtree
///
/// Item references missing `idref` are skipped; `linear` is false only
/// when the attribute is exactly `"no"`. The `toc` reference and the page
/// progression direction are attributes of the `<spine>` element itself.
pub(crate) fn parse_spine(element: &Element) -> Spine {
    let mut items = Vec::new();

    for item in element.children_named("itemref") {
        let Some(idref) = item.attr("idref").filter(|idref| !idref.is_empty()) else {
            warn!("Skipping spine itemref without idref.");
            continue;
        };

        items.push(SpineItem {
            id: item.attr("id").map(str::to_string),
            idref: idref.to_string(),
            linear: item.attr("linear") != Some("no"),
        });
    }

    Spine {
        id: element.attr("id").map(str::to_string),
        toc: element.attr("toc").map(str::to_string),
        page_progression_direction: PageProgressionDirection::from_attribute(
            element.attr("page-progression-direction"),
        ),
        items,
    }
}

/// The first matching child element's text, or None when the element is
/// absent or empty
fn text_of(element: &Element, name: &str) -> Option<String> {
    element
        .first(name)
        .map(|child| child.text())
        .filter(|text| !text.is_empty())
}

/// Builds a Creator from the first matching child element
///
/// Present whenever the element itself is present, even with all fields
/// unset. The relator role and sort form come from the `opf:`-prefixed
/// attributes, accepting the unprefixed spellings as fallback.
fn creator_of(element: &Element, name: &str) -> Option<Creator> {
    let child = element.first(name)?;
    Some(Creator {
        name: Some(child.text()).filter(|text| !text.is_empty()),
        role: attr_of(child, "opf:role", "role"),
        file_as: attr_of(child, "opf:file-as", "file-as"),
    })
}

fn attr_of(element: &Element, qualified: &str, plain: &str) -> Option<String> {
    element
        .attr(qualified)
        .or_else(|| element.attr(plain))
        .map(str::to_string)
}
