//! # OTA Core
//!
//! Core business logic for the OTA firmware repository.
//!
//! This crate contains configuration and firmware operations:
//! - Startup configuration (`CoreConfig`) resolved once and shared by reference
//! - `FirmwareService`, presenting stored artifacts as `Firmware` records
//! - Size and time formatting for listings
//!
//! Storage itself lives in `ota_files`. **No API concerns**: HTTP routing, multipart decoding,
//! rate limiting and headers belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod firmware;
pub mod format;

pub use api_shared::Firmware;
pub use config::{CoreConfig, RateLimits};
pub use constants::*;
pub use error::{CoreError, CoreResult};
pub use firmware::{FirmwareService, UploadRequest};
pub use ota_files::{
    ArtifactId, ArtifactMeta, ArtifactStore, FilesError, Operation as FilesOperation,
    MAX_PAYLOAD_BYTES,
};
