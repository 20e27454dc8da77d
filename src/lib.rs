//! Chainhook Core - request validation for blockchain event subscriptions
//!
//! This crate checks untrusted payloads before they reach subscription,
//! API key and webhook handling. The implementation prioritizes:
//!
//! 1. **Strict contracts** - Closed schemas, fixed-width hex formats, bounded filters
//! 2. **Errors as data** - Every violation is reported with its field path and rule
//! 3. **Logging** - Every rejection logged with request context
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `validation` - Format rules, the filter combinator and the named schemas
//! - `config` - Closed token sets injected at schema construction
//! - `models` - Typed views of accepted payloads
//! - `pipeline` - Raw body validation for request handlers
//! - `logging` - Structured logging with request context
//!
//! ## Example
//!
//! ```
//! use chainhook_core::validation::{default_schemas, SchemaName};
//! use serde_json::json;
//!
//! let accepted = default_schemas()
//!     .validate(
//!         SchemaName::SubscriptionLogFilter,
//!         &json!({"address": "0x00000000000000000000000000000000000000AB"}),
//!     )
//!     .unwrap();
//! assert_eq!(accepted["address"], "0x00000000000000000000000000000000000000ab");
//! ```

pub mod config;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod validation;

#[cfg(feature = "python")]
mod python;

pub use config::TokenSets;
pub use pipeline::{validate_batch, validate_body, RequestContext, ValidationOutcome};
pub use validation::{
    default_schemas, ErrorKind, FieldError, SchemaError, SchemaName, SchemaSet, ValidationErrors,
};

/// Initialize the process logger.
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
