//! `JsonErrorCodec`: the JSON record format.
//!
//! Serialize:   walk (bounded, identity-guarded) → flat records → nest from the tail
//! Deserialize: follow cause links (bounded) → create instances → stitch from the tail

use std::error::Error;

use causeway_core::codec::ErrorCodec;
use causeway_core::config::CodecConfig;
use causeway_core::record::{ErrorRecord, RecordNode};
use causeway_core::types::ErrorValue;
use serde_json::Value;

use crate::deserialize as de;
use crate::serialize as ser;

/// JSON error codec.
///
/// # Usage
/// ```rust
/// use causeway_core::{ErrorCodec, ErrorValue};
/// use causeway_json::JsonErrorCodec;
///
/// let codec = JsonErrorCodec::new();
/// let record = codec.serialize(&ErrorValue::not_found("User not found"));
/// let back = codec.deserialize(&record.to_value());
/// assert_eq!(back.status_code(), 404);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonErrorCodec {
    config: CodecConfig,
}

impl JsonErrorCodec {
    /// Codec with default depth bound and stack filter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Deserialize from any record view, including cyclic
    /// [`RecordGraph`](causeway_core::RecordGraph) nodes.
    pub fn deserialize_node<N: RecordNode>(&self, node: N) -> ErrorValue {
        de::deserialize_node(node, &self.config)
    }
}

impl ErrorCodec for JsonErrorCodec {
    fn format(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, error: &ErrorValue) -> ErrorRecord {
        ser::serialize_value(error, &self.config)
    }

    fn serialize_foreign(&self, error: &(dyn Error + 'static)) -> ErrorRecord {
        ser::serialize_foreign(error, &self.config)
    }

    fn deserialize(&self, record: &Value) -> ErrorValue {
        de::deserialize_node(record, &self.config)
    }

    fn reconstruct_chain(&self, records: &[Value]) -> ErrorValue {
        de::reconstruct_chain(records, &self.config)
    }
}

// ─── Free functions ───────────────────────────────────────────────────────────

/// Serialize with default settings.
pub fn serialize(error: &ErrorValue) -> ErrorRecord {
    ser::serialize_value(error, &CodecConfig::default())
}

/// Deserialize with default settings.
pub fn deserialize(record: &Value) -> ErrorValue {
    de::deserialize_node(record, &CodecConfig::default())
}

/// Reconstruct a chain from head-first records with default settings.
pub fn reconstruct_error_chain(records: &[Value]) -> ErrorValue {
    de::reconstruct_chain(records, &CodecConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_core::codec::CodecError;
    use causeway_core::taxonomy::SubtypeTag;
    use causeway_core::types::{DetailValue, Details};
    use serde_json::json;

    #[test]
    fn format_name() {
        assert_eq!(JsonErrorCodec::new().format(), "json");
    }

    #[test]
    fn value_roundtrip_preserves_classification() {
        let codec = JsonErrorCodec::new();
        let original = ErrorValue::builder(SubtypeTag::Validation, "Invalid email")
            .detail("field", "email")
            .detail("attempts", 3)
            .build();
        let back = codec.deserialize(&codec.serialize(&original).to_value());
        assert_eq!(back.subtype(), Some(SubtypeTag::Validation));
        assert_eq!(back.message(), "Invalid email");
        assert_eq!(back.status_code(), 400);
        assert_eq!(back.code(), "VALIDATION_ERROR");
        assert_eq!(back.details(), original.details());
        assert!(back.is_operational());
    }

    #[test]
    fn every_subtype_roundtrips_through_text() {
        let codec = JsonErrorCodec::new();
        for tag in SubtypeTag::ALL {
            let original = ErrorValue::builder(tag, format!("{tag} happened"))
                .detail("missing", DetailValue::Null)
                .build();
            let back = codec.decode_json(&codec.encode_json(&original).unwrap()).unwrap();
            assert_eq!(back.subtype(), Some(tag));
            assert_eq!(back.name(), original.name());
            assert_eq!(back.message(), original.message());
            assert_eq!(back.status_code(), original.status_code());
            assert_eq!(back.code(), original.code());
            assert_eq!(back.details(), original.details());
            assert_eq!(back.is_operational(), original.is_operational());
        }
    }

    #[test]
    fn non_finite_details_survive_json_text() {
        let codec = JsonErrorCodec::new();
        let details = Details::new()
            .with("nan", f64::NAN)
            .with("inf", f64::INFINITY)
            .with("neg", f64::NEG_INFINITY);
        let original = ErrorValue::builder(SubtypeTag::InternalServer, "bad math")
            .details(details)
            .build();
        let text = codec.encode_json(&original).unwrap();
        let back = codec.decode_json(&text).unwrap();
        assert!(back.details().get("nan").and_then(DetailValue::as_f64).unwrap().is_nan());
        assert_eq!(
            back.details().get("inf").and_then(DetailValue::as_f64),
            Some(f64::INFINITY)
        );
        assert_eq!(
            back.details().get("neg").and_then(DetailValue::as_f64),
            Some(f64::NEG_INFINITY)
        );
    }

    #[test]
    fn status_codes_roundtrip_at_range_edges() {
        let codec = JsonErrorCodec::new();
        for status in [0, 42, 99, 100, 999, 1000, u16::MAX] {
            let original = ErrorValue::builder(SubtypeTag::Base, "x").status_code(status).build();
            let back = codec.deserialize(&codec.serialize(&original).to_value());
            assert_eq!(back.status_code(), original.status_code(), "status {status}");
        }
    }

    #[test]
    fn caused_by_survives_roundtrip_when_cause_header_is_a_prefix() {
        let codec = JsonErrorCodec::new();
        let back = codec.deserialize(&json!({
            "subtypeTag": "ValidationError",
            "message": "Invalid email",
            "cause": { "subtypeTag": "ValidationError", "message": "Invalid" }
        }));
        assert_eq!(
            back.stack(),
            Some("ValidationError: Invalid email\nCaused by: ValidationError: Invalid")
        );

        let back = codec.deserialize(&json!({
            "subtypeTag": "NotFoundError",
            "message": "user",
            "cause": { "name": "Error", "message": "" }
        }));
        assert_eq!(back.stack(), Some("NotFoundError: user\nCaused by: Error"));
        assert_eq!(back.error_chain().len(), 2);
    }

    #[test]
    fn chain_roundtrip_with_depth_bound() {
        let codec = JsonErrorCodec::with_config(CodecConfig::default().with_max_depth(3));
        let mut e = ErrorValue::generic("Error", "root");
        for i in 0..6 {
            e = ErrorValue::internal(format!("wrap {i}")).with_cause(e);
        }
        let record = codec.serialize(&e);
        assert_eq!(record.depth(), 3);
        let back = codec.deserialize(&record.to_value());
        assert_eq!(back.error_chain().len(), 3);
        assert_eq!(back.message(), "wrap 5");
    }

    #[test]
    fn flatten_then_reconstruct() {
        let codec = JsonErrorCodec::new();
        let e = ErrorValue::forbidden("no access")
            .with_cause(ErrorValue::unauthorized("expired token"));
        let records: Vec<Value> = codec
            .serialize(&e)
            .flatten()
            .iter()
            .map(ErrorRecord::to_value)
            .collect();
        let back = reconstruct_error_chain(&records);
        let chain = back.error_chain();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].subtype(), Some(SubtypeTag::Forbidden));
        assert_eq!(chain[1].subtype(), Some(SubtypeTag::Unauthorized));
    }

    #[test]
    fn text_boundary_errors() {
        let codec = JsonErrorCodec::new();
        assert!(matches!(codec.decode_json("{"), Err(CodecError::InvalidJson(_))));
        assert!(matches!(
            codec.decode_json("[1]"),
            Err(CodecError::NotARecord { found: "array" })
        ));
        assert!(matches!(
            codec.decode_chain_json("{}"),
            Err(CodecError::NotAChain { found: "object" })
        ));
        let empty = codec.decode_chain_json("[]").unwrap();
        assert_eq!(empty.message(), "Empty error chain");
    }

    #[test]
    fn free_functions_use_defaults() {
        let record = serialize(&ErrorValue::not_found("gone"));
        assert_eq!(record.status_code, 404);
        let back = deserialize(&json!({ "subtypeTag": "NotFound", "message": "gone" }));
        assert_eq!(back.subtype(), Some(SubtypeTag::NotFound));
    }

    #[test]
    fn codec_is_usable_as_trait_object() {
        let codec: Box<dyn ErrorCodec> = Box::new(JsonErrorCodec::new());
        let record = codec.serialize_foreign(&std::fmt::Error);
        assert_eq!(record.name, "Error");
        assert_eq!(record.code, "UNKNOWN_ERROR");
    }
}
