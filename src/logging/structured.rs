//! Context-tagged log events.
//!
//! Every event is one line: the context tags, an upper-case event name,
//! then `key=value` pairs rendered with `Debug`.
//!
//! ```text
//! [request=req-1a2b3c4d] [schema=ApiKey] VALIDATION_REJECTED errors=2 fields=["id", "scopes[1]"]
//! ```

use std::fmt;

/// Tags attached to a log event. Work that is not tied to a request
/// (building schemas at startup, inline validation) uses [`LogContext::detached`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    pub request_id: Option<String>,
    pub schema: Option<String>,
}

impl LogContext {
    pub fn new(request_id: &str) -> Self {
        Self {
            request_id: Some(request_id.to_string()),
            schema: None,
        }
    }

    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_schema(&self, schema: &str) -> Self {
        Self {
            request_id: self.request_id.clone(),
            schema: Some(schema.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.request_id, &self.schema) {
            (Some(id), Some(schema)) => write!(f, "[request={}] [schema={}]", id, schema),
            (Some(id), None) => write!(f, "[request={}]", id),
            (None, Some(schema)) => write!(f, "[schema={}]", schema),
            (None, None) => f.write_str("[detached]"),
        }
    }
}

/// Emit one event at `$level` (a [`log::Level`] variant name).
#[doc(hidden)]
#[macro_export]
macro_rules! log_event {
    ($level:ident, $ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::log!(
            log::Level::$level,
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($($event:tt)+) => { $crate::log_event!(Info, $($event)+) };
}

#[macro_export]
macro_rules! log_warn {
    ($($event:tt)+) => { $crate::log_event!(Warn, $($event)+) };
}

#[macro_export]
macro_rules! log_error {
    ($($event:tt)+) => { $crate::log_event!(Error, $($event)+) };
}

#[macro_export]
macro_rules! log_debug {
    ($($event:tt)+) => { $crate::log_event!(Debug, $($event)+) };
}
