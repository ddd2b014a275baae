//! Core error types for recordkit.
//!
//! [`RecordError`] covers everything a record operation can fail with: writes
//! that name an undeclared field, writes whose value fails the field's
//! validator, and constructor input that is not a JSON object. Configuration
//! and serialization failures share the same enum so callers only ever match
//! on one type.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A single validator failure.
///
/// Carries a human-readable message, a short machine-readable code
/// (`"max_length"`, `"max_value"`, `"invalid_type"`, ...) and optional
/// parameters describing the constraint that was violated.
///
/// # Examples
///
/// ```
/// use recordkit_core::error::ValidationError;
///
/// let err = ValidationError::new("Ensure this value is at most 300.", "max_value")
///     .with_param("limit", "300");
/// assert_eq!(err.code, "max_value");
/// assert_eq!(err.params["limit"], "300");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error message.
    pub message: String,
    /// A short code identifying the failed rule.
    pub code: String,
    /// Extra context for the message (limits, observed lengths, ...).
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for recordkit.
#[derive(Error, Debug)]
pub enum RecordError {
    // ── Record writes ────────────────────────────────────────────────

    /// A value failed the validator of the field it was written to.
    #[error("Invalid value \"{value}\" for field \"{field}\"")]
    InvalidValue {
        /// The field being written.
        field: String,
        /// The rejected value, rendered for display.
        value: String,
        /// The validator failure behind the rejection.
        #[source]
        reason: ValidationError,
    },

    /// A write named a field the record type does not declare.
    #[error("Unknown field \"{0}\"")]
    UnknownField(String),

    /// Constructor input could not be used to build a record.
    #[error("{0}")]
    MalformedInput(String),

    // ── Schema ───────────────────────────────────────────────────────

    /// A record type was declared with an inconsistent schema.
    #[error("Schema error: {0}")]
    SchemaError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RecordError {
    /// Message used when constructor JSON decodes to something other than an object.
    pub const NOT_AN_OBJECT: &'static str = "Supplied JSON must be a dictionary";

    /// Builds an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl fmt::Display,
        reason: ValidationError,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason,
        }
    }

    /// Returns a stable short code for this error, used as a structured log field.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "invalid_value",
            Self::UnknownField(_) => "unknown_field",
            Self::MalformedInput(_) => "malformed_input",
            Self::SchemaError(_) => "schema",
            Self::SerializationError(_) => "serialization",
            Self::ConfigurationError(_) => "configuration",
            Self::IoError(_) => "io",
        }
    }

    /// Returns the field name involved in a rejected write, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { field, .. } => Some(field),
            Self::UnknownField(name) => Some(name),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, RecordError>`.
pub type RecordResult<T> = Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("This value is too long.", "max_length");
        assert_eq!(err.to_string(), "This value is too long.");
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Too big.", "max_value").with_param("limit", "300");
        assert_eq!(err.params.get("limit").unwrap(), "300");
    }

    #[test]
    fn test_invalid_value_display() {
        let err = RecordError::invalid_value("height", 500, ValidationError::new("x", "max_value"));
        assert_eq!(err.to_string(), "Invalid value \"500\" for field \"height\"");
        assert_eq!(err.field(), Some("height"));
    }

    #[test]
    fn test_unknown_field_display() {
        let err = RecordError::UnknownField("favourite_joke".into());
        assert_eq!(err.to_string(), "Unknown field \"favourite_joke\"");
        assert_eq!(err.field(), Some("favourite_joke"));
    }

    #[test]
    fn test_malformed_input_display() {
        let err = RecordError::MalformedInput(RecordError::NOT_AN_OBJECT.into());
        assert_eq!(err.to_string(), "Supplied JSON must be a dictionary");
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(RecordError::UnknownField("x".into()).kind(), "unknown_field");
        assert_eq!(RecordError::MalformedInput("x".into()).kind(), "malformed_input");
        assert_eq!(
            RecordError::invalid_value("f", "v", ValidationError::new("m", "c")).kind(),
            "invalid_value"
        );
        assert_eq!(RecordError::ConfigurationError("x".into()).kind(), "configuration");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RecordError = io_err.into();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("file missing"));
    }
}
