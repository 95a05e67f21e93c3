//! Shared request and response types for the Paysheet back office.
//!
//! Enable the `client` feature for a typed HTTP client.

#![forbid(unsafe_code)]

pub mod objects;

#[cfg(feature = "client")]
pub mod client;
