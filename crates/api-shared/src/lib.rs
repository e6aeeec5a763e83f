//! # API Shared
//!
//! Shared definitions for the trajectory HTTP API.
//!
//! Contains:
//! - Wire types for requests and responses (`schema` module), with OpenAPI schemas
//! - Conversions between wire types and `trajectory-core` domain types
//! - `HealthService`
//!
//! Used by `api-rest` and by the `trajectory-run` binary.

pub mod health;
pub mod schema;

pub use health::HealthService;
pub use schema::*;
