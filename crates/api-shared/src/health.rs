use crate::types::HealthRes;
use chrono::{SecondsFormat, Utc};
use std::time::Instant;

/// Health service used by the REST API and the CLI
///
/// Records when the process started so health responses can report uptime.
#[derive(Clone, Debug)]
pub struct HealthService {
    started_at: Instant,
}

impl HealthService {
    /// Creates a new instance of HealthService, starting the uptime clock now.
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Builds a health response
    ///
    /// # Arguments
    /// * `server` - Base URL the request reached the server on
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health(&self, server: &str) -> HealthRes {
        HealthRes {
            ok: true,
            message: "OTA firmware repository is running".into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            uptime_seconds: self.started_at.elapsed().as_secs(),
            server: server.to_owned(),
        }
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}
