//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows. Use cases take raw input from the
//! adapters, parse it into domain value objects and call the domain services.

pub mod identity;
pub mod users;
