//! Typed views of validated payloads.
//!
//! These models are deserialized from the normalized value a schema
//! returns, so they only ever hold accepted data.

pub mod api_key;
pub mod filter;
pub mod subscription;
pub mod webhook;

pub use api_key::*;
pub use filter::*;
pub use subscription::*;
pub use webhook::*;
