//! Adapters layer
//!
//! Inbound adapters that translate HTTP requests into use case calls.

pub mod http;
