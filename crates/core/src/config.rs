//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Environment variables are read by the binaries only; the helpers
//! here take the raw `Option<String>` values so they can be tested without touching process
//! state.

use crate::constants::{
    DEFAULT_FRONTEND_DIST_DIR, DEFAULT_GENERAL_RATE_LIMIT, DEFAULT_UPLOAD_DIR,
    DEFAULT_UPLOAD_RATE_LIMIT,
};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Per-client request limits applied by the transport layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimits {
    /// Requests per client in the general window
    pub general: u32,
    /// Uploads per client in the upload window
    pub upload: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            general: DEFAULT_GENERAL_RATE_LIMIT,
            upload: DEFAULT_UPLOAD_RATE_LIMIT,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    upload_dir: PathBuf,
    frontend_dir: Option<PathBuf>,
    rate_limits: RateLimits,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if `upload_dir` is empty or a rate limit is zero.
    pub fn new(
        upload_dir: PathBuf,
        frontend_dir: Option<PathBuf>,
        rate_limits: RateLimits,
    ) -> CoreResult<Self> {
        if upload_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput("upload_dir cannot be empty".into()));
        }

        if rate_limits.general == 0 || rate_limits.upload == 0 {
            return Err(CoreError::InvalidInput(
                "rate limits must be greater than zero".into(),
            ));
        }

        Ok(Self {
            upload_dir,
            frontend_dir,
            rate_limits,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Directory of the prebuilt frontend, if one was configured.
    pub fn frontend_dir(&self) -> Option<&Path> {
        self.frontend_dir.as_deref()
    }

    pub fn rate_limits(&self) -> RateLimits {
        self.rate_limits
    }
}

/// Returns the trimmed value, or `None` if it is missing or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the artifact directory from an optional `UPLOAD_DIR` value.
pub fn upload_dir_from_env_value(value: Option<String>) -> PathBuf {
    PathBuf::from(non_blank(value).unwrap_or_else(|| DEFAULT_UPLOAD_DIR.into()))
}

/// Resolve the frontend directory from an optional `FRONTEND_DIST_DIR` value.
///
/// Returns `None` when the resolved directory does not exist; the server then answers unknown
/// routes with a JSON 404 instead of the single-page app.
pub fn frontend_dir_from_env_value(value: Option<String>) -> Option<PathBuf> {
    let dir = PathBuf::from(non_blank(value).unwrap_or_else(|| DEFAULT_FRONTEND_DIST_DIR.into()));
    if dir.is_dir() {
        Some(dir)
    } else {
        None
    }
}

/// Parse a rate limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidInput`] if the value is not a positive integer.
pub fn rate_limit_from_env_value(name: &str, value: Option<String>, default: u32) -> CoreResult<u32> {
    match non_blank(value) {
        None => Ok(default),
        Some(v) => match v.parse::<u32>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => Err(CoreError::InvalidInput(format!(
                "{} must be a positive integer, got '{}'",
                name, v
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upload_dir_default_and_override() {
        assert_eq!(upload_dir_from_env_value(None), PathBuf::from("uploads"));
        assert_eq!(
            upload_dir_from_env_value(Some("   ".into())),
            PathBuf::from("uploads")
        );
        assert_eq!(
            upload_dir_from_env_value(Some(" /srv/firmware ".into())),
            PathBuf::from("/srv/firmware")
        );
    }

    #[test]
    fn test_frontend_dir_only_when_present() {
        let temp = TempDir::new().unwrap();
        let dist = temp.path().join("dist");

        assert_eq!(
            frontend_dir_from_env_value(Some(dist.display().to_string())),
            None
        );

        std::fs::create_dir(&dist).unwrap();
        assert_eq!(
            frontend_dir_from_env_value(Some(dist.display().to_string())),
            Some(dist)
        );
    }

    #[test]
    fn test_rate_limit_parsing() {
        assert_eq!(rate_limit_from_env_value("X", None, 5).unwrap(), 5);
        assert_eq!(rate_limit_from_env_value("X", Some("".into()), 5).unwrap(), 5);
        assert_eq!(rate_limit_from_env_value("X", Some(" 12 ".into()), 5).unwrap(), 12);

        for bad in ["0", "-1", "ten", "1.5"] {
            assert!(matches!(
                rate_limit_from_env_value("OTA_RATE_LIMIT", Some(bad.into()), 5),
                Err(CoreError::InvalidInput(msg)) if msg.contains("OTA_RATE_LIMIT")
            ));
        }
    }

    #[test]
    fn test_core_config_validation() {
        assert!(CoreConfig::new(PathBuf::new(), None, RateLimits::default()).is_err());
        assert!(CoreConfig::new(
            PathBuf::from("uploads"),
            None,
            RateLimits {
                general: 0,
                upload: 5
            }
        )
        .is_err());

        let cfg = CoreConfig::new(PathBuf::from("uploads"), None, RateLimits::default()).unwrap();
        assert_eq!(cfg.upload_dir(), Path::new("uploads"));
        assert_eq!(cfg.frontend_dir(), None);
        assert_eq!(cfg.rate_limits().general, 100);
        assert_eq!(cfg.rate_limits().upload, 5);
    }
}
