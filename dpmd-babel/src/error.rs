//! Error types for format operations

use crate::formats::tagged::validator::ValidationError;
use std::fmt;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during parsing
    ParseError(String),
    /// Error during serialization
    SerializationError(String),
    /// Format does not support the requested operation
    NotSupported(String),
    /// Tagged text failed validation; the import must be aborted
    StructuralImbalance(ValidationError),
    /// The host editor has no editable document yet
    HostNotReady,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            FormatError::NotSupported(msg) => write!(f, "Operation not supported: {msg}"),
            FormatError::StructuralImbalance(err) => write!(f, "Invalid tagged text: {err}"),
            FormatError::HostNotReady => write!(f, "Editable document is not available yet"),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<ValidationError> for FormatError {
    fn from(err: ValidationError) -> Self {
        FormatError::StructuralImbalance(err)
    }
}
