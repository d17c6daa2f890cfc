use crate::rate_limit::{FixedWindowLimiter, RateLimiters};
use api_shared::HealthService;
use ota_core::{
    CoreConfig, CoreResult, FirmwareService, GENERAL_RATE_WINDOW_SECS, UPLOAD_RATE_WINDOW_SECS,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Application state for the REST API server
///
/// Shared by every handler. The firmware service holds no locks; the only mutable state is
/// the rate limiter counters.
#[derive(Clone)]
pub struct AppState {
    pub firmware_service: Arc<FirmwareService>,
    pub health: HealthService,
    pub limiters: Arc<RateLimiters>,
    pub frontend_dir: Option<PathBuf>,
}

impl AppState {
    /// Builds the state from the startup configuration, opening the artifact directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact directory cannot be created.
    pub fn new(cfg: Arc<CoreConfig>) -> CoreResult<Self> {
        let limits = cfg.rate_limits();
        let limiters = RateLimiters {
            general: FixedWindowLimiter::new(
                limits.general,
                Duration::from_secs(GENERAL_RATE_WINDOW_SECS),
            ),
            upload: FixedWindowLimiter::new(
                limits.upload,
                Duration::from_secs(UPLOAD_RATE_WINDOW_SECS),
            ),
        };
        let frontend_dir = cfg.frontend_dir().map(PathBuf::from);

        Ok(Self {
            firmware_service: Arc::new(FirmwareService::new(cfg)?),
            health: HealthService::new(),
            limiters: Arc::new(limiters),
            frontend_dir,
        })
    }
}
