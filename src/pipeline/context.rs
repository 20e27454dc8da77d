//! Request context management.
//!
//! Provides a per-request id for log correlation.

use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Context for one validation request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    pub fn new() -> Self {
        let request_id = format!("req-{}", &Uuid::new_v4().simple().to_string()[..8]);
        Self { request_id }
    }

    /// Reuse an id assigned upstream (e.g. an `X-Request-Id` header).
    pub fn with_id(request_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.request_id)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
