//! Infrastructure layer
//!
//! Concrete implementations of the domain ports: PostgreSQL persistence,
//! identity providers and configuration loading.

pub mod config;
pub mod identity;
pub mod persistence;
