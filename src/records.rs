//! Structured records
//!
//! A [`Record`] is a fixed-field object: named fields in declaration order,
//! each holding either a nested record or a plain [`Node`]. Records bridge
//! to user types through serde.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::nodes::{Mapping, Node};

/// Class name given to records that were not decoded from a named class
pub const DEFAULT_CLASS_NAME: &str = "stdClass";

/// A record field
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Nested record
    Record(Record),
    /// Collection or scalar value
    Value(Node),
}

impl Field {
    /// Borrow the nested record
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Field::Record(r) => Some(r),
            Field::Value(_) => None,
        }
    }

    /// Borrow the plain value
    pub fn as_value(&self) -> Option<&Node> {
        match self {
            Field::Value(v) => Some(v),
            Field::Record(_) => None,
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            Field::Record(r) => r.to_json(),
            Field::Value(v) => v.to_json(),
        }
    }
}

impl From<Record> for Field {
    fn from(value: Record) -> Self {
        Field::Record(value)
    }
}

impl From<Node> for Field {
    fn from(value: Node) -> Self {
        Field::Value(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Value(Node::text(value))
    }
}

/// A structured record with ordered named fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    class_name: String,
    fields: IndexMap<String, Field>,
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::with_class_name(DEFAULT_CLASS_NAME)
    }

    /// Create an empty record of a named class
    pub fn with_class_name(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Get the class name
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Add a field
    pub fn with_field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.set(name, field);
        self
    }

    /// Set a field, overwriting an existing one in place
    pub fn set(&mut self, name: impl Into<String>, field: impl Into<Field>) {
        self.fields.insert(name.into(), field.into());
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Iterate fields in order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a collection node.
    ///
    /// Every nested sequence or mapping becomes a nested record (sequence
    /// positions become field names); scalars are copied. Returns `None` for
    /// a scalar node.
    pub fn from_node(node: &Node) -> Option<Self> {
        let mut record = Record::new();
        match node {
            Node::Scalar(_) => return None,
            Node::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    record.set(index.to_string(), Self::field_from_node(item));
                }
            }
            Node::Mapping(map) => {
                for (key, value) in map {
                    record.set(key.clone(), Self::field_from_node(value));
                }
            }
        }
        Some(record)
    }

    fn field_from_node(node: &Node) -> Field {
        match Self::from_node(node) {
            Some(nested) => Field::Record(nested),
            None => Field::Value(node.clone()),
        }
    }

    /// Build a mapping node from this record.
    ///
    /// Nested records recurse; plain values are copied as they are.
    pub fn to_node(&self) -> Node {
        let mut map = Mapping::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            let value = match field {
                Field::Record(r) => r.to_node(),
                Field::Value(v) => v.clone(),
            };
            map.insert(name.clone(), value);
        }
        Node::Mapping(map)
    }

    /// Build a record from a JSON object.
    ///
    /// Nested objects become nested records; arrays and scalars become plain
    /// [`Field::Value`]s. A field value is a [`Node`], which has no record
    /// variant, so objects inside arrays stay mappings: `{"a":[{"x":1}]}`
    /// gives a record whose `a` is a sequence holding one mapping. Returns
    /// `None` if the value is not an object.
    pub fn from_json(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(obj) => Some(Self::from_json_object(obj)),
            _ => None,
        }
    }

    fn from_json_object(obj: Map<String, JsonValue>) -> Self {
        let mut record = Record::new();
        for (key, value) in obj {
            let field = match value {
                JsonValue::Object(nested) => Field::Record(Self::from_json_object(nested)),
                other => Field::Value(Node::from(other)),
            };
            record.set(key, field);
        }
        record
    }

    /// Convert to a JSON object
    pub fn to_json(&self) -> JsonValue {
        let mut obj = Map::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            obj.insert(name.clone(), field.to_json());
        }
        JsonValue::Object(obj)
    }

    /// Build a record from any serializable struct or map
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)?;
        Self::from_json(json)
            .ok_or_else(|| Error::Type("value does not serialize to a record".to_string()))
    }

    /// Deserialize this record into a user type
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_json())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Address {
        city: String,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Person {
        name: String,
        tags: Vec<String>,
        address: Address,
    }

    #[test]
    fn test_record_builder() {
        let record = Record::new()
            .with_field("a", "1")
            .with_field("b", Record::new().with_field("c", "2"));

        assert_eq!(record.len(), 2);
        assert_eq!(record.class_name(), DEFAULT_CLASS_NAME);
        assert!(record.get("b").and_then(Field::as_record).is_some());
        assert_eq!(
            record.get("a").and_then(Field::as_value).and_then(Node::as_str),
            Some("1")
        );
    }

    #[test]
    fn test_from_node_turns_nested_collections_into_records() {
        let node = Node::from(json!({"a": 1, "b": [10, 20], "c": {"d": "x"}}));
        let record = Record::from_node(&node).unwrap();

        let b = record.get("b").and_then(Field::as_record).unwrap();
        let keys: Vec<&str> = b.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["0", "1"]);
        assert!(record.get("c").and_then(Field::as_record).is_some());
        assert!(Record::from_node(&Node::text("x")).is_none());
    }

    #[test]
    fn test_to_node_copies_plain_values() {
        let record = Record::new()
            .with_field("list", Node::from(json!([1, 2])))
            .with_field("nested", Record::new().with_field("k", "v"));

        assert_eq!(record.to_node(), Node::from(json!({"list": [1, 2], "nested": {"k": "v"}})));
    }

    #[test]
    fn test_from_json_keeps_arrays_as_values() {
        let record = Record::from_json(json!({"a": [{"x": 1}], "b": {"y": 2}})).unwrap();
        assert_eq!(
            record.get("a").and_then(Field::as_value),
            Some(&Node::from(json!([{"x": 1}])))
        );
        assert!(record
            .get("a")
            .and_then(Field::as_value)
            .and_then(|a| a.item(0))
            .and_then(Node::as_mapping)
            .is_some());
        assert!(record.get("b").and_then(Field::as_record).is_some());
        assert!(Record::from_json(json!([1])).is_none());
    }

    #[test]
    fn test_serde_bridge() {
        let person = Person {
            name: "Ada".to_string(),
            tags: vec!["math".to_string()],
            address: Address {
                city: "London".to_string(),
            },
        };

        let record = Record::from_serialize(&person).unwrap();
        assert!(record.get("address").and_then(Field::as_record).is_some());

        let back: Person = record.deserialize_into().unwrap();
        assert_eq!(back, person);
    }

    #[test]
    fn test_from_serialize_rejects_non_objects() {
        assert!(matches!(Record::from_serialize(&vec![1, 2]), Err(Error::Type(_))));
    }
}
