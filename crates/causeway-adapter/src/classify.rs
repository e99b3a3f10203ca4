//! Classification of arbitrary errors for transport.

use std::error::Error;

use causeway_core::chain::walk;
use causeway_core::stack::{self, CAUSED_BY};
use causeway_core::taxonomy::SubtypeTag;
use causeway_core::types::{Details, ErrorValue};
use serde::Serialize;

/// Transport attributes of one error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorClassification {
    pub status_code: u16,
    pub code: String,
    pub details: Details,
    pub is_operational: bool,
}

/// Status, code, details and operational flag of `error`. Anything that is not
/// an [`ErrorValue`] is an internal server error.
pub fn classify(error: &(dyn Error + 'static)) -> ErrorClassification {
    match error.downcast_ref::<ErrorValue>() {
        Some(value) => ErrorClassification {
            status_code: value.status_code(),
            code: value.code().to_string(),
            details: value.details().clone(),
            is_operational: value.is_operational(),
        },
        None => {
            let defaults = SubtypeTag::InternalServer.classification();
            ErrorClassification {
                status_code: defaults.status_code,
                code: defaults.code.to_string(),
                details: Details::new(),
                is_operational: false,
            }
        }
    }
}

/// Clean display stack of `error`. Foreign errors have no stack of their own,
/// so they get the `"Error: <message>"` header.
pub fn clean_stack(error: &(dyn Error + 'static)) -> String {
    match error.downcast_ref::<ErrorValue>() {
        Some(value) => value.clean_stack(),
        None => stack::synthetic_header("Error", &error.to_string()),
    }
}

/// Convert a foreign error and its bounded `source()` chain into an owned
/// [`ErrorValue`] chain. Nodes that already are `ErrorValue`s are cloned
/// without their own causes.
pub fn adopt(error: &(dyn Error + 'static)) -> ErrorValue {
    walk(error)
        .into_iter()
        .map(|node| match node.downcast_ref::<ErrorValue>() {
            Some(value) => detach(value),
            None => {
                let message = node.to_string();
                let header = stack::synthetic_header("Error", &message);
                ErrorValue::generic("Error", message).with_stack(header)
            }
        })
        .rev()
        .fold(None, |cause: Option<ErrorValue>, value| {
            Some(match cause {
                Some(cause) => value.with_cause(cause),
                None => value,
            })
        })
        .unwrap_or_else(|| ErrorValue::generic("Error", error.to_string()))
}

fn detach(value: &ErrorValue) -> ErrorValue {
    let own_stack = value
        .stack()
        .and_then(|s| s.split(&format!("\n{CAUSED_BY}")).next())
        .map(str::to_string)
        .unwrap_or_else(|| value.header());
    match value.subtype() {
        Some(tag) => ErrorValue::builder(tag, value.message())
            .name(value.name())
            .status_code(value.status_code())
            .code(value.code())
            .details(value.details().clone())
            .operational(value.is_operational())
            .stack(own_stack)
            .build(),
        None => ErrorValue::generic(value.name(), value.message()).with_stack(own_stack),
    }
}
