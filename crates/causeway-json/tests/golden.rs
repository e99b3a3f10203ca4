//! Golden fixture integration tests for causeway-json.
//!
//! Each test loads a fixture JSON from `fixtures/records/`, rebuilds the
//! `record` (or `records`) field using `JsonErrorCodec`, and asserts the
//! result matches the expected values in the fixture.

use causeway_core::{DetailValue, ErrorCodec, ErrorValue};
use causeway_json::JsonErrorCodec;
use serde_json::Value;

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn fixture_path(name: &str) -> std::path::PathBuf {
    let mut p = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("../../fixtures/records");
    p.push(name);
    p
}

fn load_fixture(name: &str) -> Value {
    let content = std::fs::read_to_string(fixture_path(name)).expect("fixture not found");
    serde_json::from_str(&content).expect("invalid fixture JSON")
}

fn decode_fixture(fixture: &Value) -> ErrorValue {
    JsonErrorCodec::new().deserialize(&fixture["record"])
}

/// Assert the head of the rebuilt chain against the fixture's `expected*` fields.
fn assert_head(fixture: &Value, decoded: &ErrorValue) {
    let expected_subtype = fixture["expectedSubtype"].as_str();
    assert_eq!(
        decoded.subtype().map(|t| t.name()),
        expected_subtype,
        "subtype mismatch"
    );
    assert_eq!(decoded.name(), fixture["expectedName"].as_str().unwrap(), "name mismatch");
    assert_eq!(
        decoded.message(),
        fixture["expectedMessage"].as_str().unwrap(),
        "message mismatch"
    );
    assert_eq!(
        u64::from(decoded.status_code()),
        fixture["expectedStatusCode"].as_u64().unwrap(),
        "status code mismatch"
    );
    assert_eq!(decoded.code(), fixture["expectedCode"].as_str().unwrap(), "code mismatch");
    assert_eq!(
        decoded.is_operational(),
        fixture["expectedOperational"].as_bool().unwrap(),
        "operational mismatch"
    );
    assert_eq!(
        decoded.error_chain().len() as u64,
        fixture["expectedChainLength"].as_u64().unwrap(),
        "chain length mismatch"
    );
}

fn chain_names(error: &ErrorValue) -> Vec<String> {
    error.error_chain().iter().map(|e| e.name().to_string()).collect()
}

fn expected_names(fixture: &Value) -> Vec<String> {
    fixture["expectedChainNames"]
        .as_array()
        .expect("missing expectedChainNames")
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// ─── Single records ───────────────────────────────────────────────────────────

#[test]
fn golden_validation_basic() {
    let f = load_fixture("validation-basic.json");
    let decoded = decode_fixture(&f);
    assert_head(&f, &decoded);
    assert_eq!(decoded.details().get("field"), Some(&DetailValue::from("email")));
    assert_eq!(decoded.stack(), f["record"]["stack"].as_str());
}

#[test]
fn golden_malformed_validation() {
    let f = load_fixture("malformed-validation.json");
    let decoded = decode_fixture(&f);
    assert_head(&f, &decoded);
    assert!(decoded.details().is_empty());
    assert_eq!(decoded.stack(), Some("ValidationError"));
}

#[test]
fn golden_unknown_subtype() {
    let f = load_fixture("unknown-subtype.json");
    let decoded = decode_fixture(&f);
    assert_head(&f, &decoded);
}

#[test]
fn golden_legacy_type_field() {
    let f = load_fixture("legacy-type-field.json");
    let decoded = decode_fixture(&f);
    assert_head(&f, &decoded);
}

#[test]
fn golden_non_finite_details() {
    let f = load_fixture("non-finite-details.json");
    let decoded = decode_fixture(&f);
    assert_head(&f, &decoded);

    let details = decoded.details();
    assert!(details.get("ratio").and_then(DetailValue::as_f64).unwrap().is_nan());
    assert_eq!(details.get("upper").and_then(DetailValue::as_f64), Some(f64::INFINITY));
    assert_eq!(details.get("lower").and_then(DetailValue::as_f64), Some(f64::NEG_INFINITY));
    assert_eq!(details.get("samples"), Some(&DetailValue::Int(3)));

    // Re-encoding restores the sentinel form.
    let reencoded = JsonErrorCodec::new().serialize(&decoded).to_value();
    assert_eq!(reencoded["details"]["ratio"], f["record"]["details"]["ratio"]);
    assert_eq!(reencoded["details"]["lower"], f["record"]["details"]["lower"]);
}

#[test]
fn golden_plain_error_with_node_modules_stack() {
    let f = load_fixture("plain-error-with-node-modules-stack.json");
    let decoded = decode_fixture(&f);
    assert_head(&f, &decoded);
    assert_eq!(
        decoded.clean_stack(),
        f["expectedCleanStack"].as_str().unwrap(),
        "clean stack mismatch"
    );
}

// ─── Chains ───────────────────────────────────────────────────────────────────

#[test]
fn golden_nested_chain() {
    let f = load_fixture("nested-chain.json");
    let decoded = decode_fixture(&f);
    assert_head(&f, &decoded);
    assert_eq!(chain_names(&decoded), expected_names(&f));
    assert_eq!(decoded.stack(), f["expectedStack"].as_str());
}

#[test]
fn golden_nested_chain_reserializes_to_same_shape() {
    let f = load_fixture("nested-chain.json");
    let codec = JsonErrorCodec::new();
    let decoded = decode_fixture(&f);
    let record = codec.serialize(&decoded);
    assert_eq!(record.depth(), 3);

    let again = codec.deserialize(&record.to_value());
    assert_eq!(chain_names(&again), expected_names(&f));
    assert_eq!(again.stack(), decoded.stack(), "stack grew on round trip");
}

#[test]
fn golden_chain_array() {
    let f = load_fixture("chain-array.json");
    let records = f["records"].as_array().expect("missing records");
    let decoded = JsonErrorCodec::new().reconstruct_chain(records);

    assert_eq!(
        decoded.error_chain().len() as u64,
        f["expectedChainLength"].as_u64().unwrap()
    );
    assert_eq!(chain_names(&decoded), expected_names(&f));
    assert_eq!(
        decoded.root_cause().message(),
        f["expectedRootMessage"].as_str().unwrap()
    );
    assert!(!decoded.stack().unwrap().contains("should not appear"));
}

#[test]
fn golden_chain_array_text_entry_point() {
    let f = load_fixture("chain-array.json");
    let text = serde_json::to_string(&f["records"]).unwrap();
    let decoded = JsonErrorCodec::new().decode_chain_json(&text).unwrap();
    assert_eq!(chain_names(&decoded), expected_names(&f));
}
