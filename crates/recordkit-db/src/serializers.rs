//! Serializers for record JSON.
//!
//! - [`JsonSerializer`] - Compact JSON
//! - [`PrettyJsonSerializer`] - Pretty-printed JSON
//!
//! Objects keep their key order, so a record serializes in schema order.

use recordkit_core::{RecordError, RecordResult};

/// Converts JSON values to and from text.
pub trait Serializer: Send + Sync {
    /// Serializes a JSON value into a string.
    fn serialize(&self, value: &serde_json::Value) -> RecordResult<String>;

    /// Deserializes a string into a JSON value.
    fn deserialize(&self, data: &str) -> RecordResult<serde_json::Value> {
        serde_json::from_str(data).map_err(|e| RecordError::SerializationError(e.to_string()))
    }
}

/// Compact JSON serializer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &serde_json::Value) -> RecordResult<String> {
        serde_json::to_string(value).map_err(|e| RecordError::SerializationError(e.to_string()))
    }
}

/// Pretty-printed JSON serializer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyJsonSerializer;

impl Serializer for PrettyJsonSerializer {
    fn serialize(&self, value: &serde_json::Value) -> RecordResult<String> {
        serde_json::to_string_pretty(value)
            .map_err(|e| RecordError::SerializationError(e.to_string()))
    }
}

/// Picks the serializer matching the `pretty_json` setting.
pub fn serializer_for(pretty: bool) -> &'static dyn Serializer {
    if pretty {
        &PrettyJsonSerializer
    } else {
        &JsonSerializer
    }
}
