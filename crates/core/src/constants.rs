//! Constants used throughout the OTA core crate.
//!
//! Defaults for settings resolved at startup, and the public route under which
//! artifacts are downloaded.

/// Default artifact directory when `UPLOAD_DIR` is not set.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default location of the prebuilt web frontend.
pub const DEFAULT_FRONTEND_DIST_DIR: &str = "frontend/dist";

/// Default listen address of the REST server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Route prefix under which artifacts are downloaded.
pub const DOWNLOAD_ROUTE_PREFIX: &str = "/firmwares";

/// General requests allowed per client in one [`GENERAL_RATE_WINDOW_SECS`] window.
pub const DEFAULT_GENERAL_RATE_LIMIT: u32 = 100;

/// Length of the general rate-limit window (15 minutes).
pub const GENERAL_RATE_WINDOW_SECS: u64 = 15 * 60;

/// Uploads allowed per client in one [`UPLOAD_RATE_WINDOW_SECS`] window.
pub const DEFAULT_UPLOAD_RATE_LIMIT: u32 = 5;

/// Length of the upload rate-limit window (1 minute).
pub const UPLOAD_RATE_WINDOW_SECS: u64 = 60;
