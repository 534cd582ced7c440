//! Error types for the field extractor
//!
//! Everything the engine can reject is recoverable at the call site: a
//! failed operation never leaves a schema or session half-mutated.

use thiserror::Error;

/// Main error type for extraction operations
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Selection is below the minimum length and is ignored
    #[error("Selection too short: {len} chars (minimum {min})")]
    SelectionTooShort { len: usize, min: usize },

    /// No element in the document contains the selection
    #[error("No enclosing element found for selection")]
    NoEnclosingElementFound,

    /// Confirm/cancel without a selection in progress
    #[error("No pending selection")]
    NoPendingSelection,

    /// User input failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration JSON could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// Configuration parsed but holds an unsupported value
    #[error("Invalid configuration value for {field}: {reason}")]
    ConfigValue { field: &'static str, reason: String },
}

/// Validation failures for field and schema input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field name must not be empty")]
    EmptyFieldName,

    #[error("schema has no fields")]
    EmptySchema,

    #[error("schema must be given a name")]
    UnnamedSchema,
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// The validation failure, if this is one
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            ExtractError::Validation(v) => Some(*v),
            _ => None,
        }
    }
}
