//! Error types for typeconv
//!
//! This module defines all error types used throughout the library.
//! The public conversion entry points never surface these: they swallow
//! failures and fall back to pass-through values. The lower layers
//! (documents, serialized, converters, records) report them.

use thiserror::Error;

/// Result type alias using typeconv Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for typeconv operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input could not be decoded
    #[error("decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// Value could not be encoded into the target representation
    #[error("encoding error: {0}")]
    Encode(String),

    /// Value error (invalid value for the requested operation)
    #[error("value error: {0}")]
    Value(String),

    /// Type error (value has the wrong shape)
    #[error("type error: {0}")]
    Type(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML writing error
    #[error("XML error: {0}")]
    Xml(String),
}

impl Error {
    /// Returns true if this error reports a document that failed to parse
    pub fn is_malformed_document(&self) -> bool {
        matches!(self, Error::Decode(DecodeError::MalformedDocument(_)))
    }
}

/// Decoding failures for the text formats
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// XML text did not parse, or the document has no root element
    #[error("malformed XML document: {0}")]
    MalformedDocument(String),

    /// Serialized bytes did not parse
    #[error("malformed serialized data at byte {position}: {message}")]
    MalformedSerialized {
        /// Byte offset where decoding stopped
        position: usize,
        /// What was wrong at that offset
        message: String,
    },
}

impl DecodeError {
    /// Create a malformed document error
    pub fn malformed_document(message: impl Into<String>) -> Self {
        DecodeError::MalformedDocument(message.into())
    }

    /// Create a malformed serialized data error
    pub fn malformed_serialized(position: usize, message: impl Into<String>) -> Self {
        DecodeError::MalformedSerialized {
            position,
            message: message.into(),
        }
    }
}
