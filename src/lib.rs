//! # typeconv
//!
//! Conversion between native collections, structured records, JSON text,
//! serialized bytes and XML documents.
//!
//! ## Features
//!
//! - Classification of an opaque value into one of six kinds
//! - Total conversions that return their input when it cannot be converted
//! - Tree to XML encoding with per-level child tags
//! - XML to tree decoding under four attribute policies
//! - A self-describing serialized byte form
//! - Protection against oversized or deeply nested input
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use typeconv::{classify, to_json_text, to_xml_text, Kind, Resource};
//!
//! let input = Resource::from("<root><name>Ada</name></root>");
//! assert_eq!(classify(&input), Kind::Xml);
//! assert_eq!(to_json_text(&input).as_text(), Some(r#"{"name":"Ada"}"#));
//!
//! let tree = Resource::from(json!({"langs": ["en", "fr"]}));
//! let xml = to_xml_text(&tree, "profile", "lang");
//! assert_eq!(
//!     xml.as_text(),
//!     Some("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<profile><langs><lang>en</lang><lang>fr</lang></langs></profile>\n")
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod names;

// Values
pub mod nodes;
pub mod records;
pub mod resources;

// Formats
pub mod documents;
pub mod serialized;

// Classification and conversion
pub mod conversions;
pub mod converters;
pub mod kinds;

// Re-exports for convenience
pub use conversions::{
    to_collection, to_json_text, to_record, to_serialized, to_xml_text, TypeConverter,
};
pub use converters::{decode_xml, encode_xml, ChildTags, ConverterConfig, Policy, XmlInput};
pub use documents::{Document, Element};
pub use error::{DecodeError, Error, Result};
pub use kinds::{
    classify, is_collection, is_json, is_record, is_serialized, is_xml, Kind,
};
pub use limits::Limits;
pub use nodes::{Mapping, Node, Scalar};
pub use records::{Field, Record};
pub use resources::Resource;

/// Version of the typeconv library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
