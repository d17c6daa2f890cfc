//! Per-client fixed-window rate limiting.
//!
//! Counters are keyed by peer IP address. Requests whose peer is unknown (no
//! `ConnectInfo`, as in in-process tests) share the bucket of the unspecified address.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Counts requests per client in fixed windows of `window` length.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    buckets: Mutex<HashMap<IpAddr, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Records one request from `client` and returns whether it is within the limit.
    pub fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        // A panic while holding the lock leaves the counters usable.
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let window = self.window;
        buckets.retain(|_, w| now.duration_since(w.started_at) < window);

        let entry = buckets.entry(client).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if entry.count >= self.limit {
            return false;
        }
        entry.count += 1;
        true
    }
}

/// The two limiters applied by the router.
#[derive(Debug)]
pub struct RateLimiters {
    pub general: FixedWindowLimiter,
    pub upload: FixedWindowLimiter,
}

fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware applying the general request limit.
pub async fn limit_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let client = client_ip(&req);
    if !state.limiters.general.check(client) {
        tracing::warn!("general rate limit exceeded for {}", client);
        return ApiError::RateLimited("Too many requests from this IP, please try again later")
            .into_response();
    }
    next.run(req).await
}

/// Middleware applying the upload limit.
pub async fn limit_uploads(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let client = client_ip(&req);
    if !state.limiters.upload.check(client) {
        tracing::warn!("upload rate limit exceeded for {}", client);
        return ApiError::RateLimited("Too many uploads, please try again later").into_response();
    }
    next.run(req).await
}
