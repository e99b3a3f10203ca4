//! causeway-adapter: framework-agnostic glue between Causeway errors and a
//! request/response host.
//!
//! - [`classify`] / [`clean_stack`]: transport attributes of any error
//! - [`RequestContext`]: request metadata with sensitive headers removed
//! - [`format_error`]: the `{ success: false, error: { .. } }` body
//! - [`ErrorHandler`]: classification, logging and response in one call
//! - [`init_tracing`]: subscriber setup from a [`LogConfig`]
//!
//! ```rust
//! use causeway_adapter::{ErrorHandler, HandlerOptions, NoopLogger, RequestContext};
//! use causeway_core::ErrorValue;
//! use std::sync::Arc;
//!
//! let handler = ErrorHandler::new(HandlerOptions::default()).with_logger(Arc::new(NoopLogger));
//! let ctx = RequestContext::new("GET", "/users/7").header("x-request-id", "abc");
//! let handled = handler.handle(&ErrorValue::not_found("User not found"), Some(ctx));
//! assert_eq!(handled.status_code, 404);
//! ```

pub mod classify;
pub mod context;
pub mod handler;
pub mod response;
pub mod tracing_setup;

pub use classify::{adopt, classify, clean_stack, ErrorClassification};
pub use context::RequestContext;
pub use handler::{
    ErrorHandler, ErrorLogger, ErrorTransform, HandledError, HandlerOptions, NoopLogger,
    TracingErrorLogger,
};
pub use response::{format_error, ErrorBody, ErrorResponse};
pub use tracing_setup::{init_tracing, LogConfig};
