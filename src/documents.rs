//! XML document handling
//!
//! This module provides the parsed XML document handle used by the
//! converters: parsing with the quick-xml reader and writing back to text
//! with the quick-xml writer.

use crate::error::{DecodeError, Error, Result};
use crate::limits::Limits;
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Declaration written at the top of every serialized document
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element name
    pub name: String,
    /// Element attributes in document order
    pub attributes: IndexMap<String, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Create a new element with text content
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.set_text(text.into());
        element
    }

    /// Get the element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get an attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Set an attribute, replacing an existing value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Add a child element and return it
    pub fn add_child(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Set text content
    pub fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }

    /// Append to the text content
    pub fn append_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// Text content, empty if the element has none
    pub fn text_content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Check if the element has child elements
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if the element has attributes
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        let text = self.text.as_deref().filter(|t| !t.is_empty());
        if text.is_none() && self.children.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        if let Some(text) = text {
            write_event(writer, Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(format!("Failed to write XML: {}", e)))
}

/// XML Document representation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding an empty root element
    pub fn with_root(name: impl Into<String>) -> Self {
        Self {
            root: Some(Element::new(name)),
        }
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes with default limits
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes.
    ///
    /// The document must have exactly one root element, every element must
    /// be closed, and no text other than whitespace may appear outside the
    /// root.
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        let mut doc = Document::new();
        let mut element_stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let element = Self::parse_element(&e, limits)?;
                    doc.check_single_root(&element_stack)?;
                    element_stack.push(element);
                    limits.check_xml_depth(element_stack.len())?;
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = element_stack.pop() {
                        if let Some(parent) = element_stack.last_mut() {
                            parent.children.push(current);
                        } else {
                            doc.root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::parse_element(&e, limits)?;
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    if let Some(parent) = element_stack.last_mut() {
                        parent.children.push(element);
                    } else {
                        doc.check_single_root(&element_stack)?;
                        doc.root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| malformed(format!("Failed to unescape text: {}", e)))?;
                    match element_stack.last_mut() {
                        Some(current) => current.append_text(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(malformed("text outside of the root element")),
                    }
                }
                Ok(Event::CData(e)) => {
                    let data = e.into_inner();
                    let text = std::str::from_utf8(&data)
                        .map_err(|e| malformed(format!("Invalid CDATA: {}", e)))?;
                    match element_stack.last_mut() {
                        Some(current) => current.append_text(text),
                        None => return Err(malformed("CDATA outside of the root element")),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(malformed(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Ignore other events (comments, processing instructions, etc.)
            }
            buf.clear();
        }

        if let Some(open) = element_stack.last() {
            return Err(malformed(format!("unclosed element '{}'", open.name)));
        }
        if doc.root.is_none() {
            return Err(malformed("document has no root element"));
        }

        Ok(doc)
    }

    fn check_single_root(&self, element_stack: &[Element]) -> Result<()> {
        if element_stack.is_empty() && self.root.is_some() {
            Err(malformed("document has more than one root element"))
        } else {
            Ok(())
        }
    }

    /// Parse element from BytesStart event
    fn parse_element(start: &BytesStart, limits: &Limits) -> Result<Element> {
        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| malformed(format!("Invalid element name: {}", e)))?;

        let mut element = Element::new(name);

        for attr_result in start.attributes() {
            let attr =
                attr_result.map_err(|e| malformed(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| malformed(format!("Invalid attribute name: {}", e)))?;

            let attr_value = attr
                .unescape_value()
                .map_err(|e| malformed(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            element.set_attribute(attr_name, attr_value);
        }
        limits.check_attributes(element.attributes.len())?;

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Get the root element mutably
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.root.as_mut()
    }

    /// Serialize the document to text, starting with [`XML_DECLARATION`]
    pub fn to_xml_string(&self) -> Result<String> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| Error::Xml("document has no root element".to_string()))?;

        let mut writer = Writer::new(Vec::new());
        write_event(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;
        write_event(&mut writer, Event::Text(BytesText::new("\n")))?;
        root.write_to(&mut writer)?;
        write_event(&mut writer, Event::Text(BytesText::new("\n")))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Xml(format!("Invalid UTF-8 in output: {}", e)))
    }
}

fn malformed(message: impl Into<String>) -> Error {
    Error::Decode(DecodeError::malformed_document(message))
}
