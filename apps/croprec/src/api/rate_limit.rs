//! Request rate limiting for the prediction and report routes.
//!
//! A single process-wide token bucket (governor, not keyed by client). The
//! limiter is lock-free, so it is the only shared mutable state the server
//! needs.

use super::{ApiError, AppState};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::warn;

/// Build a limiter admitting `per_second` requests per second.
///
/// Returns `None` for 0, which disables limiting.
pub fn build_limiter(per_second: u32) -> Option<Arc<DefaultDirectRateLimiter>> {
    NonZeroU32::new(per_second).map(|n| Arc::new(RateLimiter::direct(Quota::per_second(n))))
}

/// Middleware rejecting requests once the bucket is empty.
pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let exhausted = state
        .limiter
        .as_deref()
        .is_some_and(|limiter| limiter.check().is_err());
    if exhausted {
        warn!(path = %request.uri().path(), "rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}
