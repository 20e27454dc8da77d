//! Configuration module.
//!
//! Closed token vocabularies injected into the schemas at construction.

pub mod tokens;

pub use tokens::*;
