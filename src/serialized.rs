//! Serialized byte form
//!
//! A self-describing, type-tagged text format that round-trips nested
//! collections, records, scalars and null:
//!
//! | Value      | Encoding                                         |
//! |------------|--------------------------------------------------|
//! | null       | `N;`                                             |
//! | bool       | `b:0;` / `b:1;`                                  |
//! | integer    | `i:42;`                                          |
//! | float      | `d:1.5;` (`INF`, `-INF`, `NAN`)                  |
//! | string     | `s:5:"hello";` (length in bytes)                 |
//! | collection | `a:2:{i:0;s:1:"a";s:1:"k";i:1;}`                 |
//! | record     | `O:8:"stdClass":1:{s:1:"k";i:1;}`                |
//!
//! A collection whose keys are exactly `0..n` in order decodes to a
//! sequence; any other key set decodes to a mapping.

use crate::error::{DecodeError, Error, Result};
use crate::limits::Limits;
use crate::nodes::{format_float, Mapping, Node, Scalar};
use crate::records::{Field, Record};
use crate::resources::Resource;

/// Encode a resource into serialized bytes
pub fn to_bytes(resource: &Resource) -> Vec<u8> {
    let mut out = Vec::new();
    match resource {
        Resource::Collection(node) => write_node(&mut out, node),
        Resource::Record(record) => write_record(&mut out, record),
        Resource::Scalar(scalar) => write_scalar(&mut out, scalar),
        Resource::Text(text) => write_str(&mut out, text.as_bytes()),
        Resource::Bytes(bytes) => write_str(&mut out, bytes),
        Resource::Document(doc) => match doc.to_xml_string() {
            Ok(text) => write_str(&mut out, text.as_bytes()),
            Err(_) => out.extend_from_slice(b"N;"),
        },
    }
    out
}

/// Encode a node into serialized bytes
pub fn node_to_bytes(node: &Node) -> Vec<u8> {
    let mut out = Vec::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut Vec<u8>, node: &Node) {
    match node {
        Node::Scalar(scalar) => write_scalar(out, scalar),
        Node::Sequence(items) => {
            out.extend_from_slice(format!("a:{}:{{", items.len()).as_bytes());
            for (index, item) in items.iter().enumerate() {
                out.extend_from_slice(format!("i:{};", index).as_bytes());
                write_node(out, item);
            }
            out.push(b'}');
        }
        Node::Mapping(map) => {
            out.extend_from_slice(format!("a:{}:{{", map.len()).as_bytes());
            for (key, value) in map {
                write_key(out, key);
                write_node(out, value);
            }
            out.push(b'}');
        }
    }
}

fn write_record(out: &mut Vec<u8>, record: &Record) {
    let class = record.class_name().as_bytes();
    out.extend_from_slice(format!("O:{}:\"", class.len()).as_bytes());
    out.extend_from_slice(class);
    out.extend_from_slice(format!("\":{}:{{", record.len()).as_bytes());
    for (name, field) in record.fields() {
        write_str(out, name.as_bytes());
        match field {
            Field::Record(nested) => write_record(out, nested),
            Field::Value(value) => write_node(out, value),
        }
    }
    out.push(b'}');
}

fn write_scalar(out: &mut Vec<u8>, scalar: &Scalar) {
    match scalar {
        Scalar::Null => out.extend_from_slice(b"N;"),
        Scalar::Bool(b) => out.extend_from_slice(if *b { b"b:1;" } else { b"b:0;" }),
        Scalar::Int(i) => out.extend_from_slice(format!("i:{};", i).as_bytes()),
        Scalar::Float(f) => out.extend_from_slice(format!("d:{};", format_float(*f)).as_bytes()),
        Scalar::String(s) => write_str(out, s.as_bytes()),
    }
}

fn write_str(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(format!("s:{}:\"", bytes.len()).as_bytes());
    out.extend_from_slice(bytes);
    out.extend_from_slice(b"\";");
}

// Canonical decimal keys are written as integer keys
fn write_key(out: &mut Vec<u8>, key: &str) {
    match canonical_int(key) {
        Some(i) => out.extend_from_slice(format!("i:{};", i).as_bytes()),
        None => write_str(out, key.as_bytes()),
    }
}

fn canonical_int(key: &str) -> Option<i64> {
    let value: i64 = key.parse().ok()?;
    (value.to_string() == key).then_some(value)
}

/// Decode serialized bytes with default limits
pub fn from_bytes(input: &[u8]) -> Result<Resource> {
    from_bytes_with_limits(input, &Limits::default())
}

/// Decode serialized bytes.
///
/// Top-level collections become [`Resource::Collection`], records become
/// [`Resource::Record`], strings become [`Resource::Text`] (they may hold
/// another format) and other primitives become [`Resource::Scalar`].
pub fn from_bytes_with_limits(input: &[u8], limits: &Limits) -> Result<Resource> {
    let mut parser = Parser::new(input, limits);
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    if parser.pos < input.len() {
        return Err(parser.error("unexpected trailing data"));
    }
    Ok(value.into_resource())
}

/// Intermediate decoded value
#[derive(Debug)]
enum Decoded {
    Scalar(Scalar),
    Array(Vec<(Key, Decoded)>),
    Object(String, Vec<(String, Decoded)>),
}

#[derive(Debug)]
enum Key {
    Int(i64),
    Str(String),
}

impl Decoded {
    fn into_resource(self) -> Resource {
        match self {
            Decoded::Scalar(Scalar::String(s)) => Resource::Text(s),
            Decoded::Scalar(s) => Resource::Scalar(s),
            Decoded::Object(class, props) => Resource::Record(Self::object_to_record(class, props)),
            array @ Decoded::Array(_) => Resource::Collection(array.into_node()),
        }
    }

    fn into_node(self) -> Node {
        match self {
            Decoded::Scalar(s) => Node::Scalar(s),
            Decoded::Array(entries) => {
                let is_list = entries
                    .iter()
                    .enumerate()
                    .all(|(i, (key, _))| matches!(key, Key::Int(k) if usize::try_from(*k) == Ok(i)));
                if is_list {
                    Node::Sequence(entries.into_iter().map(|(_, v)| v.into_node()).collect())
                } else {
                    let mut map = Mapping::with_capacity(entries.len());
                    for (key, value) in entries {
                        let key = match key {
                            Key::Int(i) => i.to_string(),
                            Key::Str(s) => s,
                        };
                        map.insert(key, value.into_node());
                    }
                    Node::Mapping(map)
                }
            }
            Decoded::Object(_, props) => {
                Node::Mapping(props.into_iter().map(|(k, v)| (k, v.into_node())).collect())
            }
        }
    }

    fn into_field(self) -> Field {
        match self {
            Decoded::Object(class, props) => Field::Record(Self::object_to_record(class, props)),
            other => Field::Value(other.into_node()),
        }
    }

    fn object_to_record(class: String, props: Vec<(String, Decoded)>) -> Record {
        let mut record = Record::with_class_name(class);
        for (name, value) in props {
            record.set(name, value.into_field());
        }
        record
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    limits: &'a Limits,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8], limits: &'a Limits) -> Self {
        Self { input, pos: 0, limits }
    }

    fn error(&self, message: &str) -> Error {
        Error::Decode(DecodeError::malformed_serialized(self.pos, message))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    /// Read bytes up to (not including) `terminator` and consume the terminator
    fn read_until(&mut self, terminator: u8) -> Result<&'a [u8]> {
        let rest = self.input.get(self.pos..).unwrap_or_default();
        let len = rest
            .iter()
            .position(|&b| b == terminator)
            .ok_or_else(|| self.error(&format!("missing '{}'", terminator as char)))?;
        let token = &rest[..len];
        self.pos += len + 1;
        Ok(token)
    }

    fn read_number<T: std::str::FromStr>(&mut self, terminator: u8) -> Result<T> {
        let start = self.pos;
        let token = self.read_until(terminator)?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::Decode(DecodeError::malformed_serialized(start, "invalid number")))
    }

    fn read_length_prefixed(&mut self) -> Result<&'a [u8]> {
        let len: usize = self.read_number(b':')?;
        self.expect(b'"')?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| self.error("string length exceeds input"))?;
        let bytes = &self.input[self.pos..end];
        self.pos = end;
        self.expect(b'"')?;
        Ok(bytes)
    }

    fn read_string(&mut self) -> Result<String> {
        let start = self.pos;
        let bytes = self.read_length_prefixed()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            Error::Decode(DecodeError::malformed_serialized(start, "string is not valid UTF-8"))
        })
    }

    fn parse_value(&mut self, depth: usize) -> Result<Decoded> {
        let tag = self.peek().ok_or_else(|| self.error("unexpected end of input"))?;
        self.pos += 1;
        match tag {
            b'N' => {
                self.expect(b';')?;
                Ok(Decoded::Scalar(Scalar::Null))
            }
            b'b' => {
                self.expect(b':')?;
                match self.read_number::<u8>(b';')? {
                    0 => Ok(Decoded::Scalar(Scalar::Bool(false))),
                    1 => Ok(Decoded::Scalar(Scalar::Bool(true))),
                    _ => Err(self.error("boolean must be 0 or 1")),
                }
            }
            b'i' => {
                self.expect(b':')?;
                Ok(Decoded::Scalar(Scalar::Int(self.read_number(b';')?)))
            }
            b'd' => {
                self.expect(b':')?;
                let value = match self.read_until(b';')? {
                    b"INF" => f64::INFINITY,
                    b"-INF" => f64::NEG_INFINITY,
                    b"NAN" => f64::NAN,
                    token => std::str::from_utf8(token)
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| self.error("invalid float"))?,
                };
                Ok(Decoded::Scalar(Scalar::Float(value)))
            }
            b's' => {
                self.expect(b':')?;
                let value = self.read_string()?;
                self.expect(b';')?;
                Ok(Decoded::Scalar(Scalar::String(value)))
            }
            b'a' => {
                self.enter(depth)?;
                self.expect(b':')?;
                let count: usize = self.read_number(b':')?;
                self.expect(b'{')?;
                let mut entries = Vec::new();
                for _ in 0..count {
                    let key = self.parse_key()?;
                    let value = self.parse_value(depth + 1)?;
                    entries.push((key, value));
                }
                self.expect(b'}')?;
                Ok(Decoded::Array(entries))
            }
            b'O' => {
                self.enter(depth)?;
                self.expect(b':')?;
                let class = self.read_string()?;
                self.expect(b':')?;
                let count: usize = self.read_number(b':')?;
                self.expect(b'{')?;
                let mut props = Vec::new();
                for _ in 0..count {
                    let name = match self.parse_key()? {
                        Key::Int(i) => i.to_string(),
                        Key::Str(s) => s,
                    };
                    let value = self.parse_value(depth + 1)?;
                    props.push((name, value));
                }
                self.expect(b'}')?;
                Ok(Decoded::Object(class, props))
            }
            _ => {
                self.pos -= 1;
                Err(self.error("unknown type tag"))
            }
        }
    }

    fn enter(&self, depth: usize) -> Result<()> {
        self.limits.check_nesting_depth(depth + 1)
    }

    fn parse_key(&mut self) -> Result<Key> {
        match self.peek() {
            Some(b'i') => {
                self.pos += 1;
                self.expect(b':')?;
                Ok(Key::Int(self.read_number(b';')?))
            }
            Some(b's') => {
                self.pos += 1;
                self.expect(b':')?;
                let key = self.read_string()?;
                self.expect(b';')?;
                Ok(Key::Str(key))
            }
            _ => Err(self.error("expected integer or string key")),
        }
    }
}
