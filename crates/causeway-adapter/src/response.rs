//! User-facing error response body.

use causeway_core::types::{Details, ErrorValue};
use serde::Serialize;

use crate::context::RequestContext;

/// `{ "success": false, "error": { .. }, "requestContext"?: { .. } }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    pub fn with_context(mut self, context: Option<RequestContext>) -> Self {
        self.request_context = context;
        self
    }
}

/// Response body for `error`. Empty details are omitted; the clean stack is
/// included only when `include_stack` is set.
pub fn format_error(error: &ErrorValue, include_stack: bool) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: ErrorBody {
            message: error.message().to_string(),
            code: error.code().to_string(),
            details: Some(error.details().clone()).filter(|d| !d.is_empty()),
            stack: include_stack.then(|| error.clean_stack()),
        },
        request_context: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_core::taxonomy::SubtypeTag;
    use serde_json::json;

    #[test]
    fn minimal_body() {
        let body = serde_json::to_value(format_error(&ErrorValue::not_found("User not found"), false))
            .unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": { "message": "User not found", "code": "NOT_FOUND" }
            })
        );
    }

    #[test]
    fn details_and_stack_when_present() {
        let e = ErrorValue::builder(SubtypeTag::Validation, "Invalid input")
            .detail("field", "email")
            .stack("ValidationError: Invalid input")
            .build();
        let body = serde_json::to_value(format_error(&e, true)).unwrap();
        assert_eq!(body["error"]["details"]["field"], "email");
        assert_eq!(body["error"]["stack"], "ValidationError: Invalid input");
    }

    #[test]
    fn context_is_attached_camel_case() {
        let ctx = RequestContext::new("POST", "/api/test").header("x-request-id", "rid");
        let body = format_error(&ErrorValue::internal("boom"), false).with_context(Some(ctx));
        let v = serde_json::to_value(body).unwrap();
        assert_eq!(v["requestContext"]["requestId"], "rid");
        assert_eq!(v["requestContext"]["method"], "POST");
    }
}
