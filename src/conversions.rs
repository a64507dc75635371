//! Format routing
//!
//! Every conversion classifies its input first and then either returns it
//! unchanged, hands it to the XML codec, or goes through JSON or the
//! serialized byte form. Conversions are total: input that cannot be
//! converted comes back as it was.
//!
//! [`TypeConverter`] carries the configuration; the free functions use the
//! default configuration and share the same code path.

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::converters::{
    decode_xml_with_limits, encode_xml_with_limits, ChildTags, ConverterConfig, XmlInput,
};
use crate::documents::Document;
use crate::error::{Error, Result};
use crate::kinds::{detect, Detected, Kind};
use crate::names::validate_name;
use crate::nodes::Node;
use crate::records::Record;
use crate::resources::Resource;
use crate::serialized;

/// Converter between collections, records, JSON, serialized bytes and XML
#[derive(Debug, Clone, Default)]
pub struct TypeConverter {
    config: ConverterConfig,
}

impl TypeConverter {
    /// Create a converter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with the given configuration
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Classify a value under this converter's limits
    pub fn classify(&self, resource: &Resource) -> Kind {
        detect(resource, self.config.limits()).kind()
    }

    /// Convert to a native collection.
    ///
    /// Records are walked field by field, JSON and serialized text are
    /// decoded, and XML is decoded with the configured attribute policy.
    /// A decoded value that is a scalar is returned as
    /// [`Resource::Scalar`]; anything else comes back unchanged.
    pub fn to_collection(&self, resource: &Resource) -> Resource {
        self.collect(resource, detect(resource, self.config.limits()))
    }

    fn collect(&self, resource: &Resource, detected: Detected<'_>) -> Resource {
        match detected {
            Detected::Collection(_) => resource.clone(),
            Detected::Record(record) => Resource::Collection(record.to_node()),
            Detected::Json(value) => Resource::from_node(Node::from(value)),
            Detected::Serialized(decoded) => self.to_collection(&decoded),
            Detected::Xml(doc) => match self.decode_xml(&*doc) {
                Ok(node) => Resource::from_node(node),
                Err(e) => self.disagreement(resource, Kind::Xml, &e),
            },
            Detected::Other => self.fallback(resource, "collection"),
        }
    }

    /// Convert to a structured record.
    ///
    /// XML converts to a parsed document handle. JSON that is not an object
    /// decodes to the plain value.
    pub fn to_record(&self, resource: &Resource) -> Resource {
        match detect(resource, self.config.limits()) {
            Detected::Collection(node) => match Record::from_node(node) {
                Some(record) => Resource::Record(record),
                None => self.fallback(resource, "record"),
            },
            Detected::Record(_) => resource.clone(),
            Detected::Json(value) if value.is_object() => match Record::from_json(value) {
                Some(record) => Resource::Record(record),
                None => self.fallback(resource, "record"),
            },
            Detected::Json(value) => {
                debug!("JSON input is not an object, returning the decoded value");
                Resource::from_node(Node::from(value))
            }
            Detected::Serialized(decoded) => self.to_record(&decoded),
            Detected::Xml(doc) => Resource::Document(doc.into_owned()),
            Detected::Other => self.fallback(resource, "record"),
        }
    }

    /// Convert to JSON text.
    ///
    /// JSON input is returned unchanged. Text of no known format is encoded
    /// as a JSON string.
    pub fn to_json_text(&self, resource: &Resource) -> Resource {
        let result = match detect(resource, self.config.limits()) {
            Detected::Json(_) => return resource.clone(),
            Detected::Xml(doc) => match self.decode_xml(&*doc) {
                Ok(node) => serde_json::to_string(&node).map_err(Error::from),
                Err(e) => return self.disagreement(resource, Kind::Xml, &e),
            },
            Detected::Serialized(decoded) => self.json_text(&decoded),
            _ => self.json_text(resource),
        };

        match result {
            Ok(text) => Resource::Text(text),
            Err(e) => {
                debug!(error = %e, "value cannot be encoded as JSON, returning it unchanged");
                resource.clone()
            }
        }
    }

    /// Convert to serialized bytes.
    ///
    /// The value is converted to a collection first. Output that is valid
    /// UTF-8 is returned as [`Resource::Text`], otherwise as
    /// [`Resource::Bytes`].
    pub fn to_serialized(&self, resource: &Resource) -> Resource {
        let bytes = match resource {
            Resource::Collection(_) => serialized::to_bytes(resource),
            _ => serialized::to_bytes(&self.to_collection(resource)),
        };
        match String::from_utf8(bytes) {
            Ok(text) => Resource::Text(text),
            Err(e) => Resource::Bytes(e.into_bytes()),
        }
    }

    /// Convert to XML text using the configured root and child tags.
    ///
    /// XML input, whether a document handle or text, is written out again
    /// starting with the XML declaration. Other values are converted to a collection and
    /// encoded under a new root element. An empty collection, a value that
    /// is not a collection, or a tree with keys that are not valid XML
    /// names comes back unchanged.
    pub fn to_xml_text(&self, resource: &Resource) -> Resource {
        let detected = detect(resource, self.config.limits());
        if let Detected::Xml(doc) = &detected {
            return match doc.to_xml_string() {
                Ok(text) => Resource::Text(text),
                Err(e) => self.disagreement(resource, Kind::Xml, &e),
            };
        }

        match self.collect(resource, detected) {
            Resource::Collection(node) if !node.is_empty() => {
                match self.encode_document(&node).and_then(|doc| doc.to_xml_string()) {
                    Ok(text) => Resource::Text(text),
                    Err(e) => {
                        debug!(error = %e, "collection cannot be encoded as XML");
                        resource.clone()
                    }
                }
            }
            _ => self.fallback(resource, "XML"),
        }
    }

    /// Decode an XML document with the configured policy and limits
    pub fn decode_xml<'a>(&self, xml: impl Into<XmlInput<'a>>) -> Result<Node> {
        decode_xml_with_limits(xml, self.config.policy(), self.config.limits())
    }

    /// Encode a tree into a new document under the configured root tag
    pub fn encode_document(&self, node: &Node) -> Result<Document> {
        let root_tag = self.config.root_tag();
        validate_name(root_tag)?;

        let mut doc = Document::with_root(root_tag);
        if let Some(root) = doc.root_mut() {
            encode_xml_with_limits(root, node, self.config.child_tags(), self.config.limits())?;
        }
        Ok(doc)
    }

    fn json_text(&self, resource: &Resource) -> Result<String> {
        let value = match resource {
            Resource::Collection(node) => node.to_json(),
            Resource::Record(record) => record.to_json(),
            Resource::Scalar(scalar) => scalar.to_json(),
            Resource::Text(text) => JsonValue::String(text.clone()),
            Resource::Bytes(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => JsonValue::String(text.to_string()),
                Err(e) => return Err(Error::Encode(format!("bytes are not UTF-8: {}", e))),
            },
            Resource::Document(doc) => self.decode_xml(doc)?.to_json(),
        };
        Ok(serde_json::to_string(&value)?)
    }

    fn fallback(&self, resource: &Resource, target: &str) -> Resource {
        debug!(target_format = target, "value cannot be converted, returning it unchanged");
        resource.clone()
    }

    fn disagreement(&self, resource: &Resource, kind: Kind, error: &Error) -> Resource {
        warn!(kind = %kind, error = %error, "classified value failed to convert");
        resource.clone()
    }
}

/// Convert to a native collection with the default configuration
pub fn to_collection(resource: &Resource) -> Resource {
    TypeConverter::default().to_collection(resource)
}

/// Convert to a structured record with the default configuration
pub fn to_record(resource: &Resource) -> Resource {
    TypeConverter::default().to_record(resource)
}

/// Convert to JSON text with the default configuration
pub fn to_json_text(resource: &Resource) -> Resource {
    TypeConverter::default().to_json_text(resource)
}

/// Convert to serialized bytes with the default configuration
pub fn to_serialized(resource: &Resource) -> Resource {
    TypeConverter::default().to_serialized(resource)
}

/// Convert to XML text under `root_tag`, naming sequence items by `child_tags`
pub fn to_xml_text(
    resource: &Resource,
    root_tag: &str,
    child_tags: impl Into<ChildTags>,
) -> Resource {
    let config = ConverterConfig::default()
        .with_root_tag(root_tag)
        .with_child_tags(child_tags);
    TypeConverter::with_config(config).to_xml_text(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::Policy;
    use crate::nodes::Scalar;
    use serde_json::json;

    fn text(resource: Resource) -> String {
        resource.into_text().expect("expected text")
    }

    #[test]
    fn test_to_collection_from_each_kind() {
        let expected = Resource::from(json!({"a": 1}));
        assert_eq!(to_collection(&Resource::from(r#"{"a":1}"#)), expected);
        assert_eq!(to_collection(&Resource::from("a:1:{s:1:\"a\";i:1;}")), expected);
        assert_eq!(
            to_collection(&Resource::from(Record::new().with_field("a", Node::from(json!(1))))),
            expected
        );
        assert_eq!(
            to_collection(&Resource::from("<root><a>1</a></root>")),
            Resource::from(json!({"a": "1"}))
        );
    }

    #[test]
    fn test_to_collection_passes_other_through() {
        let input = Resource::from("just text");
        assert_eq!(to_collection(&input), input);
        let input = Resource::Scalar(Scalar::Int(4));
        assert_eq!(to_collection(&input), input);
    }

    #[test]
    fn test_to_collection_uses_configured_policy() {
        let converter = TypeConverter::with_config(ConverterConfig::new().with_policy(Policy::None));
        let result = converter.to_collection(&Resource::from(r#"<r><n attr="1">5</n></r>"#));
        assert_eq!(result, Resource::from(json!({"n": "5"})));
    }

    #[test]
    fn test_to_record() {
        let record = to_record(&Resource::from(r#"{"a":{"b":1}}"#));
        let record = record.as_record().unwrap();
        assert!(record.get("a").and_then(|f| f.as_record()).is_some());

        let xml = to_record(&Resource::from("<r><a>1</a></r>"));
        assert!(xml.as_document().is_some());

        let array = to_record(&Resource::from("[1,2]"));
        assert_eq!(array, Resource::from(json!([1, 2])));
    }

    #[test]
    fn test_to_json_text() {
        let input = Resource::from(json!({"a": 1, "b": [1, 2, 3]}));
        assert_eq!(text(to_json_text(&input)), r#"{"a":1,"b":[1,2,3]}"#);

        let json = Resource::from(r#"{ "kept": "as is" }"#);
        assert_eq!(to_json_text(&json), json);

        assert_eq!(text(to_json_text(&Resource::from("<r><a>1</a></r>"))), r#"{"a":"1"}"#);
        assert_eq!(text(to_json_text(&Resource::from("plain"))), r#""plain""#);
    }

    #[test]
    fn test_to_json_text_rejects_binary() {
        let input = Resource::from(vec![0xffu8, 0x00]);
        assert_eq!(to_json_text(&input), input);
    }

    #[test]
    fn test_to_serialized() {
        let input = Resource::from(json!({"a": 1, "b": [true]}));
        assert_eq!(text(to_serialized(&input)), "a:2:{s:1:\"a\";i:1;s:1:\"b\";a:1:{i:0;b:1;}}");
        assert_eq!(text(to_serialized(&Resource::from(r#"{"a":1}"#))), "a:1:{s:1:\"a\";i:1;}");
    }

    #[test]
    fn test_to_xml_text() {
        let input = Resource::from(json!({"a": 1, "list": ["x", "y"]}));
        assert_eq!(
            text(to_xml_text(&input, "data", "entry")),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <data><a>1</a><list><entry>x</entry><entry>y</entry></list></data>\n"
        );
    }

    #[test]
    fn test_to_xml_text_fallbacks() {
        let empty = Resource::from(json!([]));
        assert_eq!(to_xml_text(&empty, "root", "item"), empty);

        let bad_key = Resource::from(json!({"not a name": 1}));
        assert_eq!(to_xml_text(&bad_key, "root", "item"), bad_key);

        let bad_root = Resource::from(json!({"a": 1}));
        assert_eq!(to_xml_text(&bad_root, "1root", "item"), bad_root);

    }

    #[test]
    fn test_xml_text_is_rewritten_with_declaration() {
        let xml = Resource::from("<r><a k=\"v\">1</a></r>");
        let output = text(to_xml_text(&xml, "root", "item"));
        assert!(output.starts_with(crate::documents::XML_DECLARATION), "{}", output);
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<r><a k=\"v\">1</a></r>\n"
        );
    }

    #[test]
    fn test_document_to_xml_text() {
        let doc = Document::from_string("<r><a>1</a></r>").unwrap();
        assert_eq!(
            text(to_xml_text(&Resource::from(doc), "ignored", "item")),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<r><a>1</a></r>\n"
        );
    }

    #[test]
    fn test_document_without_root_falls_back() {
        let input = Resource::from(Document::new());
        assert_eq!(to_collection(&input), input);
        assert_eq!(to_json_text(&input), input);
    }
}
