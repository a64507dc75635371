//! XML to tree decoding

use indexmap::IndexMap;

use super::base::{Policy, ATTRIBUTES_KEY, VALUE_KEY};
use crate::documents::{Document, Element};
use crate::error::{DecodeError, Result};
use crate::limits::Limits;
use crate::nodes::{Mapping, Node};

/// XML input for [`decode_xml`]: a parsed document or XML text
#[derive(Debug, Clone, Copy)]
pub enum XmlInput<'a> {
    /// Already-parsed document
    Document(&'a Document),
    /// XML text, parsed on use
    Text(&'a str),
}

impl<'a> From<&'a Document> for XmlInput<'a> {
    fn from(value: &'a Document) -> Self {
        XmlInput::Document(value)
    }
}

impl<'a> From<&'a str> for XmlInput<'a> {
    fn from(value: &'a str) -> Self {
        XmlInput::Text(value)
    }
}

impl<'a> From<&'a String> for XmlInput<'a> {
    fn from(value: &'a String) -> Self {
        XmlInput::Text(value)
    }
}

/// Decode an XML document into a tree.
///
/// A root without child elements decodes to its text. Text that fails to
/// parse, or a document without a root element, is
/// [`DecodeError::MalformedDocument`].
pub fn decode_xml<'a>(xml: impl Into<XmlInput<'a>>, policy: Policy) -> Result<Node> {
    decode_xml_with_limits(xml, policy, &Limits::default())
}

/// Decode an XML document into a tree, parsing text under `limits`
pub fn decode_xml_with_limits<'a>(
    xml: impl Into<XmlInput<'a>>,
    policy: Policy,
    limits: &Limits,
) -> Result<Node> {
    match xml.into() {
        XmlInput::Document(doc) => decode_document(doc, policy),
        XmlInput::Text(text) => {
            let doc = Document::parse_with_limits(text.as_bytes(), limits)?;
            decode_document(&doc, policy)
        }
    }
}

fn decode_document(doc: &Document, policy: Policy) -> Result<Node> {
    let root = doc
        .root()
        .ok_or_else(|| DecodeError::malformed_document("document has no root element"))?;
    Ok(decode_element(root, policy))
}

/// Decode one element and its descendants
pub fn decode_element(element: &Element, policy: Policy) -> Node {
    if !element.has_children() {
        return Node::text(element.text_content());
    }

    let mut occurrences: IndexMap<&str, usize> = IndexMap::new();
    for child in &element.children {
        *occurrences.entry(child.name()).or_insert(0) += 1;
    }

    let mut map = Mapping::new();
    for child in &element.children {
        let data = decode_child(child, policy);
        let repeated = occurrences.get(child.name()).copied().unwrap_or(0) > 1;
        if repeated {
            let entry = map
                .entry(child.name().to_string())
                .or_insert_with(Node::sequence);
            if let Node::Sequence(items) = entry {
                items.push(data);
            }
        } else {
            map.insert(child.name().to_string(), data);
        }
    }
    Node::Mapping(map)
}

fn decode_child(child: &Element, policy: Policy) -> Node {
    if !child.has_attributes() || policy == Policy::None {
        return decode_element(child, policy);
    }

    match policy {
        Policy::Group => {
            let value = if child.has_children() {
                decode_element(child, policy)
            } else {
                Node::text(child.text_content())
            };
            let mut data = Mapping::new();
            data.insert(ATTRIBUTES_KEY.to_string(), Node::Mapping(attributes_of(child)));
            data.insert(VALUE_KEY.to_string(), value);
            Node::Mapping(data)
        }
        Policy::Merge => {
            let mut data = if child.has_children() {
                match decode_element(child, policy) {
                    Node::Mapping(map) => map,
                    _ => Mapping::new(),
                }
            } else {
                let mut map = Mapping::new();
                map.insert(VALUE_KEY.to_string(), Node::text(child.text_content()));
                map
            };
            data.extend(attributes_of(child));
            Node::Mapping(data)
        }
        Policy::Overwrite => Node::Mapping(attributes_of(child)),
        Policy::None => decode_element(child, policy),
    }
}

fn attributes_of(element: &Element) -> Mapping {
    element
        .attributes
        .iter()
        .map(|(name, value)| (name.clone(), Node::text(value.as_str())))
        .collect()
}
