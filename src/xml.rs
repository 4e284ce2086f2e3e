//! Generic XML element tree
//!
//! A small tree layer over the quick_xml event reader. The pipeline treats
//! XML as a plain tree: elements expose child lookup by local name, attribute
//! lookup by name, and a text value. Absence of an element or attribute is
//! normal, never an error.

use std::collections::HashMap;

use quick_xml::{Reader, events::BytesStart, events::Event};

use crate::error::Error;

/// An element node in an XML document
///
/// Tag names are stored as local names with the namespace prefix stripped,
/// so `dc:title` and `title` both answer to a `"title"` lookup. Attribute
/// keys keep their qualified spelling as written in the source.
#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    /// The local name of the element, excluding any namespace prefix
    pub name: String,

    /// Attribute map, keyed by the attribute name as written
    pub attributes: HashMap<String, String>,

    /// Accumulated character data directly inside this element
    text: String,

    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Element {
            name,
            ..Element::default()
        }
    }

    /// Returns the value of the named attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns the first direct child with the given local name
    pub fn first(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Iterates over the direct children with the given local name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// The text content of this element and all of its descendants, trimmed
    pub fn text(&self) -> String {
        let mut result = self.text.clone();
        for child in &self.children {
            result.push_str(&child.text());
        }
        result.trim().to_string()
    }
}

/// Parses an XML string and builds the root element
///
/// The builder keeps a stack of open elements and attaches each closed
/// element to its parent. Comments, processing instructions and the XML
/// declaration are ignored; CDATA contributes to the text value like
/// ordinary character data.
pub(crate) fn parse(content: &str) -> Result<Element, Error> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack = Vec::<Element>::new();
    let mut root = None;

    loop {
        match reader.read_event().map_err(Error::from)? {
            Event::Eof => break,

            Event::Start(start) => stack.push(element_from(&start)),

            Event::Empty(start) => {
                let element = element_from(&start);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    // A self-closing element can only lack a parent when it
                    // is the document root itself.
                    None => root = Some(element),
                }
            }

            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
            }

            Event::Text(text) => {
                if let Some(element) = stack.last_mut() {
                    element
                        .text
                        .push_str(&String::from_utf8_lossy(text.as_ref()));
                }
            }

            Event::CData(data) => {
                if let Some(element) = stack.last_mut() {
                    element
                        .text
                        .push_str(&String::from_utf8_lossy(data.as_ref()));
                }
            }

            _ => continue,
        }
    }

    root.ok_or(Error::MalformedXml)
}

/// Builds an element from a start tag, stripping the namespace prefix from
/// the tag name and dropping xmlns declarations
fn element_from(start: &BytesStart) -> Element {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).to_string();
    let mut element = Element::new(name);

    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }

        let value = String::from_utf8_lossy(&attr.value).to_string();
        element.attributes.insert(key, value);
    }

    element
}
