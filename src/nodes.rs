//! Tree model
//!
//! [`Node`] is the pivot representation every conversion passes through: a
//! scalar, an ordered sequence, or an ordered mapping from string keys to
//! nodes. Nodes are plain owned trees, created fresh by each conversion.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value as JsonValue};
use std::borrow::Cow;
use std::fmt;

/// Ordered mapping from key to node
///
/// Inserting an existing key overwrites the value in place and keeps the
/// key's original position.
pub type Mapping = IndexMap<String, Node>;

/// A primitive leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    String(String),
}

impl Scalar {
    /// Returns true for [`Scalar::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Borrow the text if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the scalar as element text.
    ///
    /// Null and `false` render empty, `true` renders `1`, numbers use their
    /// shortest form.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Null | Scalar::Bool(false) => Cow::Borrowed(""),
            Scalar::Bool(true) => Cow::Borrowed("1"),
            Scalar::Int(i) => Cow::Owned(i.to_string()),
            Scalar::Float(f) => Cow::Owned(format_float(*f)),
            Scalar::String(s) => Cow::Borrowed(s),
        }
    }

    /// Convert to a JSON value; non-finite floats become null
    pub fn to_json(&self) -> JsonValue {
        match self {
            Scalar::Null => JsonValue::Null,
            Scalar::Bool(b) => JsonValue::Bool(*b),
            Scalar::Int(i) => JsonValue::Number((*i).into()),
            Scalar::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Scalar::String(s) => JsonValue::String(s.clone()),
        }
    }
}

pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{}INF", sign)
    } else {
        value.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

/// A node of the generic tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf value
    Scalar(Scalar),
    /// Ordered list of nodes
    Sequence(Vec<Node>),
    /// Ordered key/value pairs with unique keys
    Mapping(Mapping),
}

impl Node {
    /// Create an empty mapping node
    pub fn mapping() -> Self {
        Node::Mapping(Mapping::new())
    }

    /// Create an empty sequence node
    pub fn sequence() -> Self {
        Node::Sequence(Vec::new())
    }

    /// Create a null scalar node
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Create a string scalar node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    /// Returns true for scalar nodes
    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    /// Number of direct children; scalars have none
    pub fn len(&self) -> usize {
        match self {
            Node::Scalar(_) => 0,
            Node::Sequence(items) => items.len(),
            Node::Mapping(map) => map.len(),
        }
    }

    /// Returns true if the node has no direct children
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the scalar
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the text of a string scalar
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Borrow the sequence items
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the mapping
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a mapping entry by key
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Look up a sequence item by position
    pub fn item(&self, index: usize) -> Option<&Node> {
        self.as_sequence().and_then(|items| items.get(index))
    }

    /// Convert to a JSON value, keeping mapping order
    pub fn to_json(&self) -> JsonValue {
        match self {
            Node::Scalar(s) => s.to_json(),
            Node::Sequence(items) => JsonValue::Array(items.iter().map(Node::to_json).collect()),
            Node::Mapping(map) => {
                let mut obj = Map::with_capacity(map.len());
                for (key, value) in map {
                    obj.insert(key.clone(), value.to_json());
                }
                JsonValue::Object(obj)
            }
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::null()
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Sequence(value)
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Node::Mapping(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::text(value)
    }
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Node::null(),
            JsonValue::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            JsonValue::Number(n) => Node::Scalar(json_number(&n)),
            JsonValue::String(s) => Node::Scalar(Scalar::String(s)),
            JsonValue::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            JsonValue::Object(obj) => {
                Node::Mapping(obj.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

fn json_number(n: &Number) -> Scalar {
    match n.as_i64() {
        Some(i) => Scalar::Int(i),
        // u64 above i64::MAX and real numbers
        None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

impl From<&Node> for JsonValue {
    fn from(value: &Node) -> Self {
        value.to_json()
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Node::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Node::Scalar(Scalar::Int(i)) => serializer.serialize_i64(*i),
            Node::Scalar(Scalar::Float(f)) => serializer.serialize_f64(*f),
            Node::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(Node::from)
    }
}
