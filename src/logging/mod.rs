//! Structured logging with request context.
//!
//! Provides logging macros and utilities that include the request id and
//! schema name in every log message for easy correlation.

pub mod structured;

pub use structured::*;
