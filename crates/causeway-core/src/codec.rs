//! The `ErrorCodec` trait: implemented by each record format crate.

use serde_json::Value;
use thiserror::Error;

use crate::record::ErrorRecord;
use crate::types::ErrorValue;

/// Errors at the text boundary of a codec.
///
/// Interpreting a record never fails; only parsing the text it came in can.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expected an error record object, got {found}")]
    NotARecord { found: &'static str },

    #[error("Expected an array of error records, got {found}")]
    NotAChain { found: &'static str },
}

/// Converts error values to transport-safe records and back.
///
/// Implementations must be `Send + Sync` and hold no mutable state between
/// calls.
pub trait ErrorCodec: Send + Sync {
    /// Short name of the record format (e.g. `"json"`).
    fn format(&self) -> &'static str;

    /// Serialize an error and its cause chain, bounded by the walker's depth
    /// rule.
    fn serialize(&self, error: &ErrorValue) -> ErrorRecord;

    /// Serialize any error type, following `source()` links.
    fn serialize_foreign(&self, error: &(dyn std::error::Error + 'static)) -> ErrorRecord;

    /// Rebuild an error from one record, reconstructing its nested causes up to
    /// the depth bound. Never fails: malformed fields take defaults.
    fn deserialize(&self, record: &Value) -> ErrorValue;

    /// Rebuild a chain from an ordered sequence of records, ignoring any
    /// embedded `cause` fields. An empty slice yields `"Empty error chain"`.
    fn reconstruct_chain(&self, records: &[Value]) -> ErrorValue;

    /// Convenience: serialize straight to JSON text.
    fn encode_json(&self, error: &ErrorValue) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&self.serialize(error))?)
    }

    /// Convenience: parse JSON text holding one record object.
    fn decode_json(&self, text: &str) -> Result<ErrorValue, CodecError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(CodecError::NotARecord {
                found: json_kind(&value),
            });
        }
        Ok(self.deserialize(&value))
    }

    /// Convenience: parse JSON text holding an array of records.
    fn decode_chain_json(&self, text: &str) -> Result<ErrorValue, CodecError> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Array(records) => Ok(self.reconstruct_chain(&records)),
            other => Err(CodecError::NotAChain {
                found: json_kind(&other),
            }),
        }
    }
}

/// Name of a JSON value's kind, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
