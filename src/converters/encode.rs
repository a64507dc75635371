//! Tree to XML encoding

use tracing::debug;

use super::base::{ChildTags, ATTRIBUTES_KEY, VALUE_KEY};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::validate_name;
use crate::nodes::Node;

/// Key of one entry being encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKey<'a> {
    /// Sequence position, or a mapping key that is a canonical integer
    Index,
    /// Explicit element name
    Name(&'a str),
}

impl<'a> EntryKey<'a> {
    fn from_key(key: &'a str) -> Self {
        match key.parse::<i64>() {
            Ok(n) if n.to_string() == key => EntryKey::Index,
            _ => EntryKey::Name(key),
        }
    }
}

type Entries<'a> = Vec<(EntryKey<'a>, &'a Node)>;

fn entries_of(node: &Node) -> Entries<'_> {
    match node {
        Node::Scalar(_) => Vec::new(),
        Node::Sequence(items) => items.iter().map(|item| (EntryKey::Index, item)).collect(),
        Node::Mapping(map) => map
            .iter()
            .map(|(key, value)| (EntryKey::from_key(key), value))
            .collect(),
    }
}

/// Remove the entry named `name` unless it is null
fn take_entry<'a>(entries: &mut Entries<'a>, name: &str) -> Option<&'a Node> {
    let position = entries.iter().position(|(key, value)| {
        *key == EntryKey::Name(name) && !matches!(value, Node::Scalar(s) if s.is_null())
    })?;
    Some(entries.remove(position).1)
}

/// Encode a tree as children of `root`.
///
/// Mapping keys become element names; sequence items (and mapping keys
/// that are canonical integers) take their name from `child_tags` at the
/// current nesting level. On nested values the `value` entry becomes the
/// element content and the `attributes` entry its attributes.
///
/// Returns `root` with the new children appended.
pub fn encode_xml<'e>(
    root: &'e mut Element,
    node: &Node,
    child_tags: &ChildTags,
) -> Result<&'e mut Element> {
    encode_xml_with_limits(root, node, child_tags, &Limits::default())
}

/// Encode a tree as children of `root`, bounding nesting by `limits`
pub fn encode_xml_with_limits<'e>(
    root: &'e mut Element,
    node: &Node,
    child_tags: &ChildTags,
    limits: &Limits,
) -> Result<&'e mut Element> {
    if node.is_scalar() {
        return Err(Error::Type(
            "only sequences and mappings can be encoded as XML".to_string(),
        ));
    }

    let encoder = Encoder { child_tags, limits };
    encoder.build(root, entries_of(node), 0)?;
    Ok(root)
}

struct Encoder<'a> {
    child_tags: &'a ChildTags,
    limits: &'a Limits,
}

impl Encoder<'_> {
    fn build(&self, parent: &mut Element, entries: Entries<'_>, depth: usize) -> Result<()> {
        let depth = depth + 1;
        self.limits.check_nesting_depth(depth)?;

        for (key, value) in entries {
            let name = match key {
                EntryKey::Index => self.child_tags.tag_for_depth(depth),
                EntryKey::Name(name) => name,
            };
            validate_name(name)?;

            match value {
                Node::Scalar(scalar) => {
                    parent.add_child(Element::with_text(name, scalar.as_text()));
                }
                nested => self.build_nested(parent, name, nested, depth)?,
            }
        }
        Ok(())
    }

    fn build_nested(
        &self,
        parent: &mut Element,
        name: &str,
        value: &Node,
        depth: usize,
    ) -> Result<()> {
        let mut rest = entries_of(value);
        let child = parent.add_child(Element::new(name));

        if let Some(content) = take_entry(&mut rest, VALUE_KEY) {
            match content {
                Node::Scalar(scalar) => child.set_text(scalar.as_text().into_owned()),
                nested => self.build(child, entries_of(nested), depth)?,
            }
        }

        if let Some(attributes) = take_entry(&mut rest, ATTRIBUTES_KEY) {
            self.add_attributes(child, attributes)?;
        }

        self.build(child, rest, depth)
    }

    fn add_attributes(&self, element: &mut Element, attributes: &Node) -> Result<()> {
        let Some(map) = attributes.as_mapping() else {
            debug!(element = %element.name, "attributes entry is not a mapping, dropping it");
            return Ok(());
        };

        for (name, value) in map {
            match value {
                Node::Scalar(scalar) => {
                    validate_name(name)?;
                    element.set_attribute(name.as_str(), scalar.as_text());
                }
                _ => debug!(
                    element = %element.name,
                    attribute = %name,
                    "skipping nested attribute value"
                ),
            }
        }
        self.limits.check_attributes(element.attributes.len())
    }
}
