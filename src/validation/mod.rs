//! Schema validation module.
//!
//! Declarative rules for untrusted request payloads:
//! - Primitive formats (hex tokens, URIs, UUIDs)
//! - The filter-value combinator
//! - Closed object schemas with `type`-discriminated filters
//! - The named schema set shared by request handlers

pub mod error;
pub mod filter;
pub mod formats;
pub mod object;
pub mod rules;
pub mod schema;

pub use error::*;
pub use filter::*;
pub use formats::*;
pub use object::*;
pub use rules::*;
pub use schema::*;
