//! `ErrorHandler`: turns any error raised while serving a request into a
//! status code and response body.
//!
//! Handling order:
//! 1. `ErrorValue`         → used as is
//! 2. Transform configured → transform output
//! 3. Fallback             → `InternalServerError("Internal Server Error")`, with
//!                           the original error adopted as its cause

use std::error::Error;
use std::sync::Arc;

use causeway_core::types::ErrorValue;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::classify::adopt;
use crate::context::RequestContext;
use crate::response::{format_error, ErrorResponse};

/// Environment variable consulted for the default of
/// [`HandlerOptions::include_stack_trace`].
pub const ENV_VAR: &str = "CAUSEWAY_ENV";

/// Message of the substitute error for unrecognised failures.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

// ─── Logging hook ─────────────────────────────────────────────────────────────

/// Receives every handled error before the response is built.
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &ErrorValue, context: Option<&RequestContext>);
}

/// Logs through `tracing`: `warn!` for operational errors, `error!` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {
    fn log_error(&self, err: &ErrorValue, context: Option<&RequestContext>) {
        let path = context.map(|c| c.path.as_str()).unwrap_or_default();
        let request_id = context
            .and_then(|c| c.request_id.as_deref())
            .unwrap_or_default();
        if err.is_operational() {
            warn!(
                status = err.status_code(),
                code = err.code(),
                path,
                request_id,
                "{err}"
            );
        } else {
            error!(
                status = err.status_code(),
                code = err.code(),
                path,
                request_id,
                stack = %err.clean_stack(),
                "{err}"
            );
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl ErrorLogger for NoopLogger {
    fn log_error(&self, _error: &ErrorValue, _context: Option<&RequestContext>) {}
}

// ─── Options ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerOptions {
    /// Put the clean stack into response bodies.
    #[serde(default = "default_include_stack_trace")]
    pub include_stack_trace: bool,
    /// Pass handled errors to the logger.
    #[serde(default = "default_log_errors")]
    pub log_errors: bool,
}

/// `true` only when `CAUSEWAY_ENV=development`.
fn default_include_stack_trace() -> bool {
    std::env::var(ENV_VAR).is_ok_and(|v| v == "development")
}

fn default_log_errors() -> bool {
    true
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            include_stack_trace: default_include_stack_trace(),
            log_errors: default_log_errors(),
        }
    }
}

// ─── Handler ──────────────────────────────────────────────────────────────────

/// Maps foreign errors to error values.
pub type ErrorTransform = Box<dyn Fn(&(dyn Error + 'static)) -> ErrorValue + Send + Sync>;

/// What the host framework should send back.
#[derive(Debug, Clone, PartialEq)]
pub struct HandledError {
    pub status_code: u16,
    pub body: ErrorResponse,
    pub context: Option<RequestContext>,
}

pub struct ErrorHandler {
    options: HandlerOptions,
    logger: Arc<dyn ErrorLogger>,
    transform: Option<ErrorTransform>,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new(HandlerOptions::default())
    }
}

impl ErrorHandler {
    /// Handler that logs through [`TracingErrorLogger`].
    pub fn new(options: HandlerOptions) -> Self {
        Self {
            options,
            logger: Arc::new(TracingErrorLogger),
            transform: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&(dyn Error + 'static)) -> ErrorValue + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    pub fn handle(
        &self,
        error: &(dyn Error + 'static),
        context: Option<RequestContext>,
    ) -> HandledError {
        let processed = self.process(error);
        if self.options.log_errors {
            self.logger.log_error(&processed, context.as_ref());
        }
        let body = format_error(&processed, self.options.include_stack_trace)
            .with_context(context.clone());
        HandledError {
            status_code: processed.status_code(),
            body,
            context,
        }
    }

    fn process(&self, error: &(dyn Error + 'static)) -> ErrorValue {
        if let Some(value) = error.downcast_ref::<ErrorValue>() {
            return value.clone();
        }
        match &self.transform {
            Some(transform) => transform(error),
            None => ErrorValue::internal(INTERNAL_SERVER_ERROR_MESSAGE).with_cause(adopt(error)),
        }
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("options", &self.options)
            .field("transform", &self.transform.is_some())
            .finish_non_exhaustive()
    }
}
