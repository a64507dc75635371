//! Base converter types
//!
//! This module provides the attribute policy, the child tag table and the
//! converter configuration shared by encoding, decoding and the router.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::limits::Limits;

/// Root element name used when none is given
pub const DEFAULT_ROOT_TAG: &str = "root";

/// Element name used for sequence items when none is given
pub const DEFAULT_CHILD_TAG: &str = "item";

/// Key holding an element's content
pub const VALUE_KEY: &str = "value";

/// Key holding an element's attributes
pub const ATTRIBUTES_KEY: &str = "attributes";

/// How XML attributes fold into the decoded tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    /// Disregard attributes and only return the content
    None,
    /// Merge attributes and content into one mapping; text goes under `value`
    Merge,
    /// Group attributes under `attributes` and content under `value`
    #[default]
    Group,
    /// Only the attributes are returned
    Overwrite,
}

impl Policy {
    /// Stable ordinal (0 to 3)
    pub fn ordinal(self) -> u8 {
        match self {
            Policy::None => 0,
            Policy::Merge => 1,
            Policy::Group => 2,
            Policy::Overwrite => 3,
        }
    }
}

impl TryFrom<u8> for Policy {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Policy::None),
            1 => Ok(Policy::Merge),
            2 => Ok(Policy::Group),
            3 => Ok(Policy::Overwrite),
            other => Err(Error::Value(format!("Unknown attribute policy ordinal: {}", other))),
        }
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Policy::None),
            "merge" => Ok(Policy::Merge),
            "group" => Ok(Policy::Group),
            "overwrite" => Ok(Policy::Overwrite),
            _ => Err(Error::Value(format!("Unknown attribute policy: '{}'", s))),
        }
    }
}

/// Element names for sequence items, per nesting level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildTags {
    /// One name for every level
    Single(String),
    /// One name per level; levels past the end reuse the last name
    Levels(Vec<String>),
}

impl Default for ChildTags {
    fn default() -> Self {
        ChildTags::Single(DEFAULT_CHILD_TAG.to_string())
    }
}

impl ChildTags {
    /// Tag for sequence items at `depth` (1 for the root's children)
    pub fn tag_for_depth(&self, depth: usize) -> &str {
        match self {
            ChildTags::Single(tag) => tag,
            ChildTags::Levels(tags) => {
                let index = depth.min(tags.len()).saturating_sub(1);
                tags.get(index).map_or(DEFAULT_CHILD_TAG, String::as_str)
            }
        }
    }
}

impl From<&str> for ChildTags {
    fn from(value: &str) -> Self {
        ChildTags::Single(value.to_string())
    }
}

impl From<String> for ChildTags {
    fn from(value: String) -> Self {
        ChildTags::Single(value)
    }
}

impl From<Vec<String>> for ChildTags {
    fn from(value: Vec<String>) -> Self {
        ChildTags::Levels(value)
    }
}

impl From<&[&str]> for ChildTags {
    fn from(value: &[&str]) -> Self {
        ChildTags::Levels(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ChildTags {
    fn from(value: [&str; N]) -> Self {
        ChildTags::Levels(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Configuration for converters
#[derive(Debug, Clone, Default)]
pub struct ConverterConfig {
    /// Root element name for XML output
    root_tag: Option<String>,
    /// Element names for sequence items
    child_tags: ChildTags,
    /// Attribute policy for XML input
    policy: Policy,
    /// Resource limits
    limits: Limits,
}

impl ConverterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the root tag
    pub fn root_tag(&self) -> &str {
        self.root_tag.as_deref().unwrap_or(DEFAULT_ROOT_TAG)
    }

    /// Get the child tags
    pub fn child_tags(&self) -> &ChildTags {
        &self.child_tags
    }

    /// Get the attribute policy
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Get the limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Set root tag
    pub fn with_root_tag(mut self, tag: impl Into<String>) -> Self {
        self.root_tag = Some(tag.into());
        self
    }

    /// Set child tags
    pub fn with_child_tags(mut self, tags: impl Into<ChildTags>) -> Self {
        self.child_tags = tags.into();
        self
    }

    /// Set attribute policy
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Set limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_config_builder() {
        let config = ConverterConfig::new()
            .with_root_tag("books")
            .with_child_tags(["book", "chapter"])
            .with_policy(Policy::Merge)
            .with_limits(Limits::strict());

        assert_eq!(config.root_tag(), "books");
        assert_eq!(config.child_tags().tag_for_depth(2), "chapter");
        assert_eq!(config.policy(), Policy::Merge);
        assert_eq!(config.limits(), &Limits::strict());
    }

    #[test]
    fn test_converter_config_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.root_tag(), "root");
        assert_eq!(config.child_tags().tag_for_depth(1), "item");
        assert_eq!(config.policy(), Policy::Group);
    }

    #[test]
    fn test_tag_for_depth_reuses_last_level() {
        let tags = ChildTags::from(["a", "b", "c"]);
        assert_eq!(tags.tag_for_depth(1), "a");
        assert_eq!(tags.tag_for_depth(2), "b");
        assert_eq!(tags.tag_for_depth(3), "c");
        assert_eq!(tags.tag_for_depth(9), "c");
    }

    #[test]
    fn test_empty_levels_fall_back_to_item() {
        assert_eq!(ChildTags::Levels(Vec::new()).tag_for_depth(1), DEFAULT_CHILD_TAG);
    }

    #[test]
    fn test_policy_ordinals() {
        for policy in [Policy::None, Policy::Merge, Policy::Group, Policy::Overwrite] {
            assert_eq!(Policy::try_from(policy.ordinal()).unwrap(), policy);
        }
        assert!(matches!(Policy::try_from(4), Err(Error::Value(_))));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("overwrite".parse::<Policy>().unwrap(), Policy::Overwrite);
        assert_eq!("NONE".parse::<Policy>().unwrap(), Policy::None);
        assert!("badgerfish".parse::<Policy>().is_err());
    }
}
