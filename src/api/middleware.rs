//! Request-safety middleware: timeout enforcement and rate limiting.
//!
//! Two independent guards wrap every inbound request before it reaches
//! the service layer. The rate-limit guard is a single process-wide
//! admission gate; the timeout guard races each admitted request against
//! a deadline. Per request: `Admitted -> {Completed | TimedOut}` or
//! `Rejected` (rate-limited, never runs).

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use governor::{Quota, RateLimiter};
use tracing::warn;

use crate::domain::{ErrorDetail, ErrorResponse, RateLimitResponse};

/// Request-safety configuration.
#[derive(Debug, Clone)]
pub struct RequestSafetyConfig {
    /// Deadline applied to every admitted request.
    pub timeout: Duration,
    /// Sustained refill rate of the global token bucket, per second.
    pub rate_limit_rps: u32,
    /// Burst capacity of the global token bucket.
    pub rate_limit_burst: u32,
}

impl Default for RequestSafetyConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            rate_limit_rps: 100,
            rate_limit_burst: 100,
        }
    }
}

impl RequestSafetyConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout.as_secs());
        let rate_limit_rps = std::env::var("RATE_LIMIT_RPS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_rps);
        let rate_limit_burst = std::env::var("RATE_LIMIT_BURST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_burst);

        Self {
            timeout: Duration::from_secs(timeout_secs),
            rate_limit_rps,
            rate_limit_burst,
        }
    }
}

/// Shared guard state: one token bucket for the whole process.
///
/// The bucket is owned here and injected into the guards through
/// `middleware::from_fn_with_state`; there is no package-level singleton.
/// No per-client partitioning: every request draws from the same bucket.
pub struct RequestSafetyState {
    limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
    config: RequestSafetyConfig,
}

impl RequestSafetyState {
    pub fn new(config: RequestSafetyConfig) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(config.rate_limit_rps).unwrap())
            .allow_burst(NonZeroU32::new(config.rate_limit_burst).unwrap());

        Self {
            limiter: RateLimiter::direct(quota),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RequestSafetyConfig {
        &self.config
    }
}

/// Admission-control guard: one token per request, acquired synchronously
/// and without blocking. On exhaustion the request is rejected with 429
/// immediately and never reaches the layers below.
pub async fn rate_limit_middleware(
    State(state): State<Arc<RequestSafetyState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    match state.limiter.check() {
        Ok(_) => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(
                "X-RateLimit-Limit",
                state.config.rate_limit_rps.to_string().parse().unwrap(),
            );
            response
        }
        Err(not_until) => {
            let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                &governor::clock::DefaultClock::default(),
            ));
            let retry_after = wait_time.as_secs();
            warn!(retry_after, "Request rejected by rate limiter");

            let body = RateLimitResponse {
                error: ErrorDetail {
                    r#type: "rate_limited".to_string(),
                    message: "Rate limit exceeded. Please slow down your requests.".to_string(),
                },
                retry_after,
            };

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            let headers = response.headers_mut();
            headers.insert(
                "X-RateLimit-Limit",
                state.config.rate_limit_rps.to_string().parse().unwrap(),
            );
            headers.insert("X-RateLimit-Remaining", "0".parse().unwrap());
            headers.insert("Retry-After", retry_after.to_string().parse().unwrap());
            response
        }
    }
}

/// Timeout guard: races the rest of the request pipeline against a fixed
/// deadline. If the deadline elapses first the guarded future is dropped,
/// which cancels any in-flight storage call it was awaiting, and a 408 is
/// returned without waiting for the straggler.
pub async fn timeout_middleware(
    State(state): State<Arc<RequestSafetyState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    match tokio::time::timeout(state.config.timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(timeout = ?state.config.timeout, "Request deadline elapsed");

            let body = ErrorResponse {
                error: ErrorDetail {
                    r#type: "timeout".to_string(),
                    message: "request timeout".to_string(),
                },
            };
            (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response()
        }
    }
}
