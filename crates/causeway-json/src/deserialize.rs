//! Record → error value.
//!
//! Dispatch order for one record:
//! 1. Tag found in the taxonomy        → that subtype
//! 2. Meaningful `code` present        → `BaseError` carrying the code, named after the tag
//! 3. Fallback                         → generic error (name, message, stack only)
//!
//! Cause links are followed iteratively and never past the depth bound, so
//! cyclic or absurdly deep input always terminates.

use causeway_core::config::CodecConfig;
use causeway_core::record::RecordNode;
use causeway_core::stack;
use causeway_core::taxonomy::{self, SubtypeTag};
use causeway_core::types::{ErrorParts, ErrorValue, DEFAULT_STATUS_CODE, UNKNOWN_ERROR_CODE};
use serde_json::Value;
use tracing::debug;

use crate::coerce;

/// Message of the value returned for an empty chain.
pub const EMPTY_CHAIN_MESSAGE: &str = "Empty error chain";

/// Build one error value from one record, ignoring its cause.
pub fn create_instance<N: RecordNode>(node: &N) -> ErrorValue {
    let raw_tag = coerce::raw_tag(node);
    let message = coerce::message(node);

    if let Some(entry) = raw_tag.and_then(taxonomy::lookup) {
        let defaults = entry.defaults;
        let stack = coerce::stack(node)
            .unwrap_or_else(|| stack::synthetic_header(entry.name, &message));
        return (entry.construct)(ErrorParts {
            name: coerce::name(node),
            status_code: Some(coerce::status_code(node, defaults.status_code)),
            code: Some(coerce::code(node, defaults.code)),
            details: coerce::details(node),
            is_operational: Some(coerce::operational(node, defaults.is_operational)),
            stack: Some(stack),
            cause: None,
            message,
        });
    }

    if coerce::has_meaningful_code(node) {
        debug!(
            tag = raw_tag.unwrap_or("<none>"),
            "unrecognised subtype tag, falling back to a generic classified error"
        );
        let name = raw_tag.map(str::to_string);
        let display_name = name.as_deref().unwrap_or(SubtypeTag::Base.name());
        let stack = coerce::stack(node)
            .unwrap_or_else(|| stack::synthetic_header(display_name, &message));
        return ErrorValue::from_parts(
            SubtypeTag::Base,
            ErrorParts {
                name,
                status_code: Some(coerce::status_code(node, DEFAULT_STATUS_CODE)),
                code: Some(coerce::code(node, UNKNOWN_ERROR_CODE)),
                details: coerce::details(node),
                is_operational: Some(coerce::operational(
                    node,
                    SubtypeTag::Base.classification().is_operational,
                )),
                stack: Some(stack),
                cause: None,
                message,
            },
        );
    }

    let name = coerce::name(node).unwrap_or_else(|| "Error".to_string());
    let stack = coerce::stack(node).unwrap_or_else(|| stack::synthetic_header(&name, &message));
    ErrorValue::generic(name, message).with_stack(stack)
}

/// Rebuild `node` and its cause links, at most `max_depth` levels deep.
pub fn deserialize_node<N: RecordNode>(node: N, config: &CodecConfig) -> ErrorValue {
    let max_depth = config.effective_max_depth();
    let mut nodes = vec![node];
    while nodes.len() < max_depth {
        let Some(next) = nodes.last().and_then(RecordNode::cause) else {
            break;
        };
        nodes.push(next);
    }
    if nodes.last().is_some_and(|tail| tail.cause().is_some()) {
        debug!(max_depth, "cause reconstruction stopped at depth bound");
    }
    stitch(nodes.iter().map(create_instance))
        .unwrap_or_else(|| ErrorValue::generic("Error", ""))
}

/// Rebuild a chain from head-first records, trusting none of their embedded
/// `cause` fields.
pub fn reconstruct_chain(records: &[Value], config: &CodecConfig) -> ErrorValue {
    if records.is_empty() {
        return ErrorValue::generic("Error", EMPTY_CHAIN_MESSAGE);
    }
    let max_depth = config.effective_max_depth();
    if records.len() > max_depth {
        debug!(
            records = records.len(),
            max_depth, "error chain truncated during reconstruction"
        );
    }
    stitch(records.iter().take(max_depth).map(|record| create_instance(&record)))
        .unwrap_or_else(|| ErrorValue::generic("Error", EMPTY_CHAIN_MESSAGE))
}

/// Link head-first values so each one's cause is the next.
fn stitch(values: impl DoubleEndedIterator<Item = ErrorValue>) -> Option<ErrorValue> {
    values.rev().fold(None, |cause, value| {
        Some(match cause {
            Some(cause) => value.with_cause(cause),
            None => value,
        })
    })
}
