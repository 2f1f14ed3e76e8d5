//! # API Shared
//!
//! Shared definitions for the CRM task APIs.
//!
//! Contains:
//! - Request/response types with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the CLI so both surfaces report conversions the same way.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
