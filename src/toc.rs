//! Navigation Document Parsing Module
//!
//! Parses NCX-style navigation documents into the recursive
//! [TableOfContents] tree. Unlike the manifest and spine parsers, this one
//! fails fast: navigation points are few and load-bearing for
//! reading-position bookmarking, so a node missing its `id` or content
//! reference aborts the parse instead of being skipped.

use log::warn;

use crate::{error::Error, types::TableOfContents, xml::Element};

/// Parses the root element of a navigation document
///
/// The root node is synthetic: its label is the `docTitle` text (empty
/// when the document omits one), its id is `"0"`, and its `item` field
/// carries the document-unique-identifier value from the head metadata.
/// The children mirror the `navMap` hierarchy exactly.
pub(crate) fn parse_table_of_contents(root: &Element) -> Result<TableOfContents, Error> {
    let label = match root.first("docTitle").and_then(|title| title.first("text")) {
        Some(text) => text.text(),
        None => {
            warn!("Navigation document has no docTitle; using an empty label.");
            String::new()
        }
    };

    // Historical quirk: the lookup key is "dtb=uid", not the NCX attribute
    // spelling "dtb:uid". Files that rely on the bug-compatible behavior
    // exist in the wild, so the literal is kept as-is.
    let item = root
        .first("head")
        .and_then(|head| {
            head.children_named("meta")
                .find(|meta| meta.attr("name") == Some("dtb=uid"))
        })
        .and_then(|meta| meta.attr("content"))
        .map(str::to_string);

    let sub_table = match root.first("navMap") {
        Some(nav_map) => parse_nav_points(nav_map)?,
        None => Vec::new(),
    };

    Ok(TableOfContents {
        label,
        id: "0".to_string(),
        item,
        sub_table,
    })
}

/// Recursively collects the `navPoint` children of `parent`
///
/// Each navigation point requires an `id` attribute and a nested
/// `<content src="...">` reference; the label falls back to an empty
/// string. Recursion terminates naturally on elements without nested
/// navigation points, so depth is bounded only by the input nesting.
fn parse_nav_points(parent: &Element) -> Result<Vec<TableOfContents>, Error> {
    let mut points = Vec::new();

    for nav_point in parent.children_named("navPoint") {
        let id = nav_point.attr("id").ok_or_else(|| Error::MissingAttribute {
            tag: "navPoint".to_string(),
            attribute: "id".to_string(),
        })?;

        let item = nav_point
            .first("content")
            .and_then(|content| content.attr("src"))
            .ok_or_else(|| Error::MissingAttribute {
                tag: "content".to_string(),
                attribute: "src".to_string(),
            })?;

        let label = nav_point
            .first("navLabel")
            .and_then(|nav_label| nav_label.first("text"))
            .map(|text| text.text())
            .unwrap_or_default();

        points.push(TableOfContents {
            label,
            id: id.to_string(),
            item: Some(item.to_string()),
            sub_table: parse_nav_points(nav_point)?,
        });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use crate::{error::Error, toc::parse_table_of_contents, types::TableOfContents, xml};

    fn parse(source: &str) -> TableOfContents {
        parse_table_of_contents(&xml::parse(source).unwrap()).unwrap()
    }

    const SIMPLE_NCX: &str = r#"
        <ncx version="2005-1">
            <head>
                <meta name="dtb=uid" content="urn:uuid:1234"/>
                <meta name="dtb:depth" content="1"/>
            </head>
            <docTitle><text>Metamorphosis</text></docTitle>
            <navMap>
                <navPoint id="np-1" playOrder="1">
                    <navLabel><text>Chapter 1</text></navLabel>
                    <content src="ch1.xhtml"/>
                </navPoint>
                <navPoint id="np-2" playOrder="2">
                    <navLabel><text>Chapter 2</text></navLabel>
                    <content src="ch2.xhtml#start"/>
                </navPoint>
            </navMap>
        </ncx>"#;

    #[test]
    fn test_root_node_shape() {
        let toc = parse(SIMPLE_NCX);
        assert_eq!(toc.label, "Metamorphosis");
        assert_eq!(toc.id, "0");
        assert_eq!(toc.item.as_deref(), Some("urn:uuid:1234"));
        assert_eq!(toc.sub_table.len(), 2);

        let second = &toc.sub_table[1];
        assert_eq!(second.label, "Chapter 2");
        assert_eq!(second.id, "np-2");
        assert_eq!(second.item.as_deref(), Some("ch2.xhtml#start"));
        assert!(second.sub_table.is_empty());
    }

    /// The uid lookup uses the legacy "dtb=uid" key, so the standard
    /// spelling is not picked up
    #[test]
    fn test_uid_lookup_ignores_standard_spelling() {
        let toc = parse(
            r#"<ncx>
                 <head><meta name="dtb:uid" content="urn:uuid:5678"/></head>
                 <docTitle><text>T</text></docTitle>
                 <navMap/>
               </ncx>"#,
        );
        assert!(toc.item.is_none());
    }

    /// A missing docTitle yields an empty label rather than a failure
    #[test]
    fn test_missing_doc_title_is_empty_label() {
        let toc = parse("<ncx><navMap/></ncx>");
        assert_eq!(toc.label, "");
        assert!(toc.sub_table.is_empty());
    }

    /// N nested navigation points produce a chain of exactly N nodes
    #[test]
    fn test_depth_mirrors_nesting() {
        const DEPTH: usize = 10;
        let mut inner = String::new();
        for level in (0..DEPTH).rev() {
            inner = format!(
                r#"<navPoint id="np-{level}">
                     <navLabel><text>Level {level}</text></navLabel>
                     <content src="level{level}.xhtml"/>
                     {inner}
                   </navPoint>"#
            );
        }
        let toc = parse(&format!(
            "<ncx><docTitle><text>Deep</text></docTitle><navMap>{inner}</navMap></ncx>"
        ));

        let mut node = &toc;
        for level in 0..DEPTH {
            assert_eq!(node.sub_table.len(), 1);
            node = &node.sub_table[0];
            assert_eq!(node.label, format!("Level {level}"));
        }
        assert!(node.sub_table.is_empty(), "chain must end after {DEPTH} nodes");
    }

    /// K sibling navigation points produce K children in source order
    #[test]
    fn test_breadth_mirrors_siblings() {
        const SIBLINGS: usize = 10;
        let points: String = (0..SIBLINGS)
            .map(|index| {
                format!(
                    r#"<navPoint id="np-{index}">
                         <navLabel><text>Part {index}</text></navLabel>
                         <content src="part{index}.xhtml"/>
                       </navPoint>"#
                )
            })
            .collect();
        let toc = parse(&format!(
            "<ncx><docTitle><text>Wide</text></docTitle><navMap>{points}</navMap></ncx>"
        ));

        assert_eq!(toc.sub_table.len(), SIBLINGS);
        assert_eq!(toc.sub_table[5].label, "Part 5");
    }

    /// A navigation point without an id aborts the parse
    #[test]
    fn test_missing_id_is_fatal() {
        let result = parse_table_of_contents(
            &xml::parse(
                r#"<ncx><navMap>
                     <navPoint>
                       <navLabel><text>Anonymous</text></navLabel>
                       <content src="x.xhtml"/>
                     </navPoint>
                   </navMap></ncx>"#,
            )
            .unwrap(),
        );

        assert_eq!(
            result.unwrap_err(),
            Error::MissingAttribute {
                tag: "navPoint".to_string(),
                attribute: "id".to_string(),
            }
        );
    }

    /// A navigation point without a content reference aborts the parse
    #[test]
    fn test_missing_content_src_is_fatal() {
        let result = parse_table_of_contents(
            &xml::parse(
                r#"<ncx><navMap>
                     <navPoint id="np-1">
                       <navLabel><text>Nowhere</text></navLabel>
                     </navPoint>
                   </navMap></ncx>"#,
            )
            .unwrap(),
        );

        assert_eq!(
            result.unwrap_err(),
            Error::MissingAttribute {
                tag: "content".to_string(),
                attribute: "src".to_string(),
            }
        );
    }

    /// A malformed node deep in the tree voids the whole parse
    #[test]
    fn test_nested_failure_propagates() {
        let result = parse_table_of_contents(
            &xml::parse(
                r#"<ncx><navMap>
                     <navPoint id="np-1">
                       <navLabel><text>Chapter 1</text></navLabel>
                       <content src="ch1.xhtml"/>
                       <navPoint>
                         <navLabel><text>Broken child</text></navLabel>
                         <content src="ch1.xhtml#sec1"/>
                       </navPoint>
                     </navPoint>
                   </navMap></ncx>"#,
            )
            .unwrap(),
        );

        assert!(matches!(result, Err(Error::MissingAttribute { .. })));
    }

    /// A missing label is tolerated as an empty string
    #[test]
    fn test_missing_label_is_empty() {
        let toc = parse(
            r#"<ncx><docTitle><text>T</text></docTitle><navMap>
                 <navPoint id="np-1"><content src="ch1.xhtml"/></navPoint>
               </navMap></ncx>"#,
        );
        assert_eq!(toc.sub_table[0].label, "");
    }
}
