//! Tree/XML converters
//!
//! This module converts between the generic [`Node`](crate::nodes::Node)
//! tree and XML documents.
//!
//! Encoding ([`encode_xml`]) builds children under an existing element.
//! Two mapping keys are special on nested values:
//! - `value`: text content of the element (or its nested content)
//! - `attributes`: a mapping written as XML attributes
//!
//! Decoding ([`decode_xml`]) handles attributes under one of four policies:
//! - `None`: attributes are dropped
//! - `Merge`: attributes become keys next to the content, text under `value`
//! - `Group`: `{attributes: {...}, value: ...}`
//! - `Overwrite`: only the attributes are kept
//!
//! Sibling elements sharing a name decode to a sequence; a single
//! occurrence decodes to the value itself. The shape under a given name
//! therefore depends on how many times it occurs.

mod base;
mod decode;
mod encode;

pub use base::{
    ChildTags, ConverterConfig, Policy, ATTRIBUTES_KEY, DEFAULT_CHILD_TAG, DEFAULT_ROOT_TAG,
    VALUE_KEY,
};
pub use decode::{decode_element, decode_xml, decode_xml_with_limits, XmlInput};
pub use encode::{encode_xml, encode_xml_with_limits};
