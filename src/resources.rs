//! The opaque input value accepted by every conversion

use serde_json::Value as JsonValue;

use crate::documents::Document;
use crate::nodes::{Node, Scalar};
use crate::records::Record;

/// A value in any of the supported representations.
///
/// Text and byte inputs are opaque: they may hold JSON, serialized bytes,
/// XML, or none of these. Use [`crate::kinds::classify`] to find out which.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Native ordered/keyed collection
    Collection(Node),
    /// Structured record
    Record(Record),
    /// Parsed XML document handle
    Document(Document),
    /// Text of unknown format
    Text(String),
    /// Bytes of unknown format
    Bytes(Vec<u8>),
    /// Any other primitive
    Scalar(Scalar),
}

impl Resource {
    /// Wrap a node: sequences and mappings become collections, scalars stay scalars
    pub fn from_node(node: Node) -> Self {
        match node {
            Node::Scalar(s) => Resource::Scalar(s),
            nested => Resource::Collection(nested),
        }
    }

    /// Borrow the collection
    pub fn as_collection(&self) -> Option<&Node> {
        match self {
            Resource::Collection(node) => Some(node),
            _ => None,
        }
    }

    /// Borrow the record
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Resource::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Borrow the document
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Resource::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Borrow the text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Resource::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the raw input of a text or byte resource
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Resource::Text(text) => Some(text.as_bytes()),
            Resource::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Take the collection
    pub fn into_collection(self) -> Option<Node> {
        match self {
            Resource::Collection(node) => Some(node),
            _ => None,
        }
    }

    /// Take the record
    pub fn into_record(self) -> Option<Record> {
        match self {
            Resource::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Take the text
    pub fn into_text(self) -> Option<String> {
        match self {
            Resource::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Node> for Resource {
    fn from(value: Node) -> Self {
        Resource::from_node(value)
    }
}

impl From<Record> for Resource {
    fn from(value: Record) -> Self {
        Resource::Record(value)
    }
}

impl From<Document> for Resource {
    fn from(value: Document) -> Self {
        Resource::Document(value)
    }
}

impl From<&str> for Resource {
    fn from(value: &str) -> Self {
        Resource::Text(value.to_string())
    }
}

impl From<String> for Resource {
    fn from(value: String) -> Self {
        Resource::Text(value)
    }
}

impl From<Vec<u8>> for Resource {
    fn from(value: Vec<u8>) -> Self {
        Resource::Bytes(value)
    }
}

impl From<Scalar> for Resource {
    fn from(value: Scalar) -> Self {
        Resource::Scalar(value)
    }
}

/// A JSON value is taken as an already-decoded native collection
impl From<JsonValue> for Resource {
    fn from(value: JsonValue) -> Self {
        Resource::from_node(Node::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_node() {
        assert!(matches!(Resource::from_node(Node::text("x")), Resource::Scalar(_)));
        assert!(Resource::from_node(Node::mapping()).as_collection().is_some());
    }

    #[test]
    fn test_from_json_value() {
        let resource = Resource::from(json!([1, 2]));
        assert_eq!(resource.as_collection().map(Node::len), Some(2));
        assert_eq!(Resource::from(json!(5)), Resource::Scalar(Scalar::Int(5)));
    }

    #[test]
    fn test_text_and_bytes() {
        assert_eq!(Resource::from("abc").as_bytes(), Some(&b"abc"[..]));
        assert_eq!(Resource::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert!(Resource::from(Record::new()).as_bytes().is_none());
    }
}
