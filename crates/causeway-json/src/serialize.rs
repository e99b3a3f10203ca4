//! Error value → record.
//!
//! The chain is collected first with the walker's depth and identity rules,
//! then nested from the tail up, so serialization never recurses and always
//! terminates.

use std::error::Error;

use causeway_core::chain::walk_with_depth;
use causeway_core::config::CodecConfig;
use causeway_core::record::ErrorRecord;
use causeway_core::stack::{self, StackFilter};
use causeway_core::types::{Details, ErrorValue, DEFAULT_STATUS_CODE, UNKNOWN_ERROR_CODE};
use tracing::debug;

/// Name given to foreign errors, which carry no name of their own.
pub const FOREIGN_ERROR_NAME: &str = "Error";

/// Serialize `error` and up to `max_depth - 1` of its causes.
pub fn serialize_value(error: &ErrorValue, config: &CodecConfig) -> ErrorRecord {
    let chain = walk_with_depth(error, config.effective_max_depth());
    if chain.last().is_some_and(|tail| tail.cause().is_some()) {
        debug!(
            max_depth = config.effective_max_depth(),
            "error chain truncated during serialization"
        );
    }
    nest(
        chain
            .into_iter()
            .map(|node| flat_record(node, &config.stack_filter)),
    )
    .unwrap_or_else(|| flat_record(error, &config.stack_filter))
}

/// Serialize any error, following `source()` with the same bounds. Nodes that
/// are [`ErrorValue`]s keep their classification.
pub fn serialize_foreign(error: &(dyn Error + 'static), config: &CodecConfig) -> ErrorRecord {
    let chain = walk_with_depth(error, config.effective_max_depth());
    let records = chain.into_iter().map(|node| match node.downcast_ref::<ErrorValue>() {
        Some(value) => flat_record(value, &config.stack_filter),
        None => foreign_record(node),
    });
    nest(records).unwrap_or_else(|| foreign_record(error))
}

/// One record without its cause.
fn flat_record(error: &ErrorValue, filter: &StackFilter) -> ErrorRecord {
    ErrorRecord {
        subtype_tag: error.subtype(),
        name: error.name().to_string(),
        message: error.message().to_string(),
        status_code: error.status_code(),
        code: error.code().to_string(),
        details: error.details().clone(),
        is_operational: error.is_operational(),
        stack: Some(error.clean_stack_with(filter)),
        cause: None,
    }
}

fn foreign_record(error: &(dyn Error + 'static)) -> ErrorRecord {
    let message = error.to_string();
    ErrorRecord {
        subtype_tag: None,
        name: FOREIGN_ERROR_NAME.to_string(),
        stack: Some(stack::synthetic_header(FOREIGN_ERROR_NAME, &message)),
        message,
        status_code: DEFAULT_STATUS_CODE,
        code: UNKNOWN_ERROR_CODE.to_string(),
        details: Details::new(),
        is_operational: false,
        cause: None,
    }
}

/// Fold a head-first sequence of flat records into one nested record.
fn nest(records: impl DoubleEndedIterator<Item = ErrorRecord>) -> Option<ErrorRecord> {
    records.rev().fold(None, |cause, mut record| {
        record.cause = cause.map(Box::new);
        Some(record)
    })
}
