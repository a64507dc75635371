//! Value kind classification
//!
//! Classification is ordered, first match wins: collection, record, JSON,
//! serialized bytes, XML, other. The categories overlap at the syntactic
//! level, so the order is part of the contract.
//!
//! Detection is heuristic and silent. A failed parse only means "not this
//! kind"; it is logged at trace level and never reported to the caller.
//!
//! One quirk is kept on purpose: JSON text that decodes to `null` (the
//! literal `null`) is not classified as JSON, because a null result is
//! indistinguishable from a failed decode.

use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::fmt;
use tracing::trace;

use crate::documents::Document;
use crate::limits::Limits;
use crate::nodes::Node;
use crate::records::Record;
use crate::resources::Resource;
use crate::serialized;

/// The representation a value is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Native ordered/keyed collection
    Collection,
    /// Structured record
    Record,
    /// JSON text
    Json,
    /// Serialized bytes
    Serialized,
    /// XML document handle or XML text
    Xml,
    /// None of the above
    Other,
}

impl Kind {
    /// Stable lowercase name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Collection => "collection",
            Kind::Record => "record",
            Kind::Json => "json",
            Kind::Serialized => "serialized",
            Kind::Xml => "xml",
            Kind::Other => "other",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result carrying whatever was parsed to reach it
#[derive(Debug)]
pub(crate) enum Detected<'a> {
    Collection(&'a Node),
    Record(&'a Record),
    Json(JsonValue),
    Serialized(Resource),
    Xml(Cow<'a, Document>),
    Other,
}

impl Detected<'_> {
    pub(crate) fn kind(&self) -> Kind {
        match self {
            Detected::Collection(_) => Kind::Collection,
            Detected::Record(_) => Kind::Record,
            Detected::Json(_) => Kind::Json,
            Detected::Serialized(_) => Kind::Serialized,
            Detected::Xml(_) => Kind::Xml,
            Detected::Other => Kind::Other,
        }
    }
}

pub(crate) fn detect<'a>(resource: &'a Resource, limits: &Limits) -> Detected<'a> {
    match resource {
        Resource::Collection(node) => Detected::Collection(node),
        Resource::Record(record) => Detected::Record(record),
        Resource::Document(doc) => Detected::Xml(Cow::Borrowed(doc)),
        Resource::Scalar(_) => Detected::Other,
        Resource::Text(text) => detect_bytes(text.as_bytes(), limits),
        Resource::Bytes(bytes) => detect_bytes(bytes, limits),
    }
}

fn detect_bytes<'a>(input: &[u8], limits: &Limits) -> Detected<'a> {
    if let Some(value) = parse_json(input) {
        return Detected::Json(value);
    }

    match serialized::from_bytes_with_limits(input, limits) {
        Ok(value) => return Detected::Serialized(value),
        Err(e) => trace!(error = %e, "input is not serialized bytes"),
    }

    match Document::parse_with_limits(input, limits) {
        Ok(doc) => Detected::Xml(Cow::Owned(doc)),
        Err(e) => {
            trace!(error = %e, "input is not XML");
            Detected::Other
        }
    }
}

fn parse_json(input: &[u8]) -> Option<JsonValue> {
    match serde_json::from_slice::<JsonValue>(input) {
        Ok(JsonValue::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            trace!(error = %e, "input is not JSON");
            None
        }
    }
}

/// Classify a value with default limits
pub fn classify(resource: &Resource) -> Kind {
    classify_with_limits(resource, &Limits::default())
}

/// Classify a value
pub fn classify_with_limits(resource: &Resource, limits: &Limits) -> Kind {
    detect(resource, limits).kind()
}

/// Check to see if the value is a native collection
pub fn is_collection(resource: &Resource) -> bool {
    matches!(resource, Resource::Collection(_))
}

/// Check to see if the value is a structured record
pub fn is_record(resource: &Resource) -> bool {
    matches!(resource, Resource::Record(_))
}

/// Check to see if the value is JSON text decoding to a non-null value
pub fn is_json(resource: &Resource) -> bool {
    resource.as_bytes().and_then(parse_json).is_some()
}

/// Check to see if the value is serialized bytes
pub fn is_serialized(resource: &Resource) -> bool {
    resource
        .as_bytes()
        .map_or(false, |bytes| serialized::from_bytes(bytes).is_ok())
}

/// Check to see if the value is an XML document handle or XML text
pub fn is_xml(resource: &Resource) -> bool {
    match resource {
        Resource::Document(_) => true,
        other => other
            .as_bytes()
            .map_or(false, |bytes| Document::parse(bytes).is_ok()),
    }
}
