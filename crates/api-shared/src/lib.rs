//! # API Shared
//!
//! Shared definitions for the OTA firmware repository APIs.
//!
//! Contains:
//! - Request/response bodies (`types` module), serialisable and documented for OpenAPI
//! - Shared services like `HealthService`
//!
//! Used by `ota-core` and `api-rest`.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
