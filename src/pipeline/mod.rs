//! Request boundary module.
//!
//! Entry points used by request handlers:
//! - Raw JSON body parsing
//! - Validation against a named schema
//! - Serializable outcomes for error responses
//! - Batch validation

pub mod context;
pub mod request;

pub use context::*;
pub use request::*;
